//! Edmonds-Karp 最大流
//!
//! 复用 Ford-Fulkerson 的增广编排，仅把路径搜索换成
//! 显式队列的广度优先，保证每次找到边数最少的增广路径，
//! 增广总次数被 O(V·E) 约束，与容量大小无关。
//! 等长路径间的选取顺序未定义，调用方不应依赖。

use super::feasible::FeasibleFlow;
use super::ford_fulkerson::{AlgorithmState, MaxFlowReport};
use super::network::{FlowNetwork, FLOW_EPSILON};
use super::residual::{
    drive_augmentation, reconstruct_path, Direction, PathStep, ResidualPath,
};
use crate::collections::Queue;
use crate::error::Result;
use crate::metrics::OpCounter;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Edmonds-Karp 算法实例
#[derive(Debug)]
pub struct EdmondsKarp {
    state: AlgorithmState,
    counter: OpCounter,
}

impl Default for EdmondsKarp {
    fn default() -> Self {
        Self::new()
    }
}

impl EdmondsKarp {
    /// 创建算法实例
    pub fn new() -> Self {
        Self {
            state: AlgorithmState::AwaitingFeasible,
            counter: OpCounter::new(),
        }
    }

    /// 当前状态
    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    /// 操作计数器
    pub fn counter(&self) -> &OpCounter {
        &self.counter
    }

    /// 运行：先保证可行流，再最大化流量
    ///
    /// 契约与 `FordFulkerson::run` 相同。
    pub fn run<N>(&mut self, network: &mut FlowNetwork<N>) -> Result<MaxFlowReport>
    where
        N: Clone + Eq + Hash + Debug,
    {
        self.counter.reset();
        self.state = AlgorithmState::AwaitingFeasible;
        if network.has_unassigned_flow() {
            let feasible = FeasibleFlow::new();
            let feasibility = feasible.solve(network)?;
            self.counter.absorb(&feasible.counter().snapshot());
            if !feasibility.success {
                self.state = AlgorithmState::Infeasible;
                debug!("可行流构造失败，放弃最大流搜索");
                return Ok(MaxFlowReport {
                    success: false,
                    max_flow: 0.0,
                    augmentations: 0,
                    state: self.state,
                    ops: self.counter.snapshot(),
                });
            }
        }
        Ok(self.search(network))
    }

    /// 纯最大流搜索，不做可行流委托
    pub fn max_flow<N>(&mut self, network: &mut FlowNetwork<N>) -> Result<MaxFlowReport>
    where
        N: Clone + Eq + Hash + Debug,
    {
        self.counter.reset();
        Ok(self.search(network))
    }

    fn search<N>(&mut self, network: &mut FlowNetwork<N>) -> MaxFlowReport
    where
        N: Clone + Eq + Hash + Debug,
    {
        self.state = AlgorithmState::Searching;
        let augmentations = drive_augmentation(network, &self.counter, bfs_find_path);
        self.state = AlgorithmState::MaxFlowReached;
        debug!(
            augmentations,
            max_flow = network.current_flow(),
            "最大流搜索完成"
        );
        MaxFlowReport {
            success: true,
            max_flow: network.current_flow(),
            augmentations,
            state: self.state,
            ops: self.counter.snapshot(),
        }
    }
}

/// 广度优先搜索一条最短增广路径
fn bfs_find_path<N>(network: &FlowNetwork<N>, counter: &OpCounter) -> Option<ResidualPath<N>>
where
    N: Clone + Eq + Hash + Debug,
{
    let source = network.source().clone();
    let sink = network.sink().clone();

    let mut queue: Queue<N> = Queue::new();
    let mut visited: HashSet<N> = HashSet::new();
    let mut parents: HashMap<N, PathStep<N>> = HashMap::new();

    visited.insert(source.clone());
    queue.enqueue(source.clone());

    while let Some(current) = queue.dequeue() {
        for (dst, edge) in network.outgoing(&current) {
            counter.record_edge_examined();
            if edge.forward_residual() > FLOW_EPSILON && !visited.contains(dst) {
                visited.insert(dst.clone());
                parents.insert(
                    dst.clone(),
                    PathStep {
                        from: current.clone(),
                        to: dst.clone(),
                        direction: Direction::Forward,
                    },
                );
                if *dst == sink {
                    return reconstruct_path(&parents, &source, &sink);
                }
                queue.enqueue(dst.clone());
            }
        }
        for (src, edge) in network.incoming(&current) {
            counter.record_edge_examined();
            if edge.backward_residual() > FLOW_EPSILON && !visited.contains(src) {
                visited.insert(src.clone());
                parents.insert(
                    src.clone(),
                    PathStep {
                        from: current.clone(),
                        to: src.clone(),
                        direction: Direction::Backward,
                    },
                );
                if *src == sink {
                    return reconstruct_path(&parents, &source, &sink);
                }
                queue.enqueue(src.clone());
            }
        }
    }
    None
}
