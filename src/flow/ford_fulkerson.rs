//! Ford-Fulkerson 最大流
//!
//! 通用的增广路径搜索，使用显式栈做深度优先探索，
//! 并刻意偏向长路径：直达汇的残量步总是最后探索，
//! `VisitOrder::Alternating` 在相邻两次搜索间反转邻居访问顺序，
//! 以复现经典的容量依赖最坏情形。偏好只影响增广次数，不影响正确性。

use super::feasible::FeasibleFlow;
use super::network::{FlowNetwork, FLOW_EPSILON};
use super::residual::{
    drive_augmentation, reconstruct_path, Direction, PathStep, ResidualPath,
};
use crate::collections::Stack;
use crate::error::Result;
use crate::metrics::{CounterSnapshot, OpCounter};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 邻居访问顺序策略
///
/// 显式的实例参数，取代进程级的交替生成器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitOrder {
    /// 始终按邻接表顺序访问
    Stable,
    /// 相邻两次搜索间反转访问顺序（默认，制造最坏情形）
    Alternating,
}

/// 算法状态机
///
/// `AwaitingFeasible -> Searching -> MaxFlowReached`，
/// 可行流构造失败时从 `AwaitingFeasible` 进入终态 `Infeasible`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmState {
    AwaitingFeasible,
    Searching,
    Augmenting,
    MaxFlowReached,
    Infeasible,
}

/// 一次最大流运行的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowReport {
    /// 是否成功（仅可行流构造失败时为 false）
    pub success: bool,
    /// 最终总流量
    pub max_flow: f64,
    /// 增广次数
    pub augmentations: u64,
    /// 终止状态
    pub state: AlgorithmState,
    /// 操作计数快照
    pub ops: CounterSnapshot,
}

/// Ford-Fulkerson 算法实例
///
/// 计数器与访问顺序都是实例私有状态，每次 `run` 开始时计数归零。
#[derive(Debug)]
pub struct FordFulkerson {
    visit_order: VisitOrder,
    flip: bool,
    state: AlgorithmState,
    counter: OpCounter,
}

impl FordFulkerson {
    /// 创建默认实例（交替访问顺序）
    pub fn new() -> Self {
        Self::with_visit_order(VisitOrder::Alternating)
    }

    /// 指定访问顺序创建实例
    pub fn with_visit_order(visit_order: VisitOrder) -> Self {
        Self {
            visit_order,
            flip: false,
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
    /// 网络存在未赋值流量时委托可行流构造；
    /// 构造失败则返回 `success == false` 且网络保持不变。
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
    ///
    /// 假定流量已全部赋值（未赋值的按 0 处理并在首次更新时赋值）。
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
        let alternating = self.visit_order == VisitOrder::Alternating;
        let mut flip = self.flip;
        let augmentations = drive_augmentation(network, &self.counter, |net, counter| {
            let reversed = flip;
            if alternating {
                flip = !flip;
            }
            dfs_find_path(net, reversed, counter)
        });
        self.flip = flip;
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

impl Default for FordFulkerson {
    fn default() -> Self {
        Self::new()
    }
}

/// 深度优先搜索一条增广路径
///
/// 显式栈实现，辅助内存 O(V+E)。每个可行步的检查都计数。
fn dfs_find_path<N>(
    network: &FlowNetwork<N>,
    reversed: bool,
    counter: &OpCounter,
) -> Option<ResidualPath<N>>
where
    N: Clone + Eq + Hash + Debug,
{
    let source = network.source().clone();
    let sink = network.sink().clone();

    let mut stack: Stack<PathStep<N>> = Stack::new();
    let mut visited: HashSet<N> = HashSet::new();
    let mut parents: HashMap<N, PathStep<N>> = HashMap::new();

    visited.insert(source.clone());
    for step in admissible_steps(network, &source, &sink, reversed, &visited, counter)
        .into_iter()
        .rev()
    {
        stack.push(step);
    }

    while let Some(step) = stack.pop() {
        if visited.contains(&step.to) {
            continue;
        }
        visited.insert(step.to.clone());
        parents.insert(step.to.clone(), step.clone());
        if step.to == sink {
            return reconstruct_path(&parents, &source, &sink);
        }
        for next in admissible_steps(network, &step.to, &sink, reversed, &visited, counter)
            .into_iter()
            .rev()
        {
            stack.push(next);
        }
    }
    None
}

/// 从节点出发的所有可行残量步，按期望的探索顺序排列
fn admissible_steps<N>(
    network: &FlowNetwork<N>,
    node: &N,
    sink: &N,
    reversed: bool,
    visited: &HashSet<N>,
    counter: &OpCounter,
) -> Vec<PathStep<N>>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut steps = Vec::new();
    for (dst, edge) in network.outgoing(node) {
        counter.record_edge_examined();
        if edge.forward_residual() > FLOW_EPSILON && !visited.contains(dst) {
            steps.push(PathStep {
                from: node.clone(),
                to: dst.clone(),
                direction: Direction::Forward,
            });
        }
    }
    for (src, edge) in network.incoming(node) {
        counter.record_edge_examined();
        if edge.backward_residual() > FLOW_EPSILON && !visited.contains(src) {
            steps.push(PathStep {
                from: node.clone(),
                to: src.clone(),
                direction: Direction::Backward,
            });
        }
    }
    if reversed {
        steps.reverse();
    }
    // 长路径偏好：直达汇的步排到最后（稳定排序保持其余顺序）
    steps.sort_by_key(|step| step.to == *sink);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowEdge;

    /// 场景 A：1..5 的链式网络，每条边容量 10
    fn line_network() -> FlowNetwork<u32> {
        let mut net = FlowNetwork::new([1, 2, 3, 4, 5], 1, 5).unwrap();
        for n in 1..5 {
            net.add_edge(n, n + 1, FlowEdge::with_capacity(10.0));
        }
        net
    }

    /// 场景 B：最大流 14
    fn branching_network() -> FlowNetwork<&'static str> {
        let mut net = FlowNetwork::new(["s", "u", "v", "w", "t"], "s", "t").unwrap();
        net.add_edge("s", "u", FlowEdge::with_capacity(5.0));
        net.add_edge("s", "v", FlowEdge::with_capacity(7.0));
        net.add_edge("s", "w", FlowEdge::with_capacity(3.0));
        net.add_edge("u", "t", FlowEdge::with_capacity(6.0));
        net.add_edge("v", "t", FlowEdge::with_capacity(5.0));
        net.add_edge("v", "u", FlowEdge::with_capacity(2.0));
        net.add_edge("w", "t", FlowEdge::with_capacity(8.0));
        net
    }

    #[test]
    fn test_line_network_max_flow() {
        let mut net = line_network();
        let report = FordFulkerson::new().run(&mut net).unwrap();

        assert!(report.success);
        assert!((report.max_flow - 10.0).abs() < FLOW_EPSILON);
        assert!((net.current_flow() - 10.0).abs() < FLOW_EPSILON);
    }

    #[test]
    fn test_branching_network_max_flow() {
        let mut net = branching_network();
        let report = FordFulkerson::new().run(&mut net).unwrap();

        assert!(report.success);
        assert!((report.max_flow - 14.0).abs() < FLOW_EPSILON);
    }

    #[test]
    fn test_run_preserves_bounds_and_conservation() {
        let mut net = branching_network();
        FordFulkerson::new().run(&mut net).unwrap();

        net.check_flow_validity().unwrap();
        for (_, _, edge) in net.edges() {
            let flow = edge.flow.unwrap();
            assert!(flow >= edge.lower - FLOW_EPSILON);
            assert!(flow <= edge.upper + FLOW_EPSILON);
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut algorithm = FordFulkerson::new();
        assert_eq!(algorithm.state(), AlgorithmState::AwaitingFeasible);

        let mut net = line_network();
        let report = algorithm.run(&mut net).unwrap();
        assert_eq!(algorithm.state(), AlgorithmState::MaxFlowReached);
        assert_eq!(report.state, AlgorithmState::MaxFlowReached);
    }

    #[test]
    fn test_infeasible_network_reports_failure_untouched() {
        // v 的入流下界 2 超过其出流上界 1，必然不可行
        let mut net = FlowNetwork::new(["s", "u", "v", "t"], "s", "t").unwrap();
        net.add_edge("s", "u", FlowEdge::with_capacity(5.0));
        net.add_edge("u", "v", FlowEdge::new(2.0, 2.0));
        net.add_edge("v", "t", FlowEdge::with_capacity(1.0));

        let mut algorithm = FordFulkerson::new();
        let report = algorithm.run(&mut net).unwrap();

        assert!(!report.success);
        assert_eq!(algorithm.state(), AlgorithmState::Infeasible);
        // 失败时网络未被修改
        assert!(net.has_unassigned_flow());
    }

    #[test]
    fn test_stable_visit_order_also_correct() {
        let mut net = branching_network();
        let report = FordFulkerson::with_visit_order(VisitOrder::Stable)
            .run(&mut net)
            .unwrap();
        assert!((report.max_flow - 14.0).abs() < FLOW_EPSILON);
    }

    #[test]
    fn test_run_ops_include_feasibility_work() {
        let mut net = FlowNetwork::new(["s", "u", "t"], "s", "t").unwrap();
        net.add_edge("s", "u", FlowEdge::new(1.0, 3.0));
        net.add_edge("u", "t", FlowEdge::new(1.0, 3.0));

        let mut algorithm = FordFulkerson::new();
        let report = algorithm.run(&mut net).unwrap();

        assert!(report.success);
        // 可行流阶段的搜索与写回也计入报告
        assert!(report.ops.path_searches > report.augmentations + 1);
        assert!(report.ops.flow_updates >= 2);
    }

    #[test]
    fn test_counter_reset_between_runs() {
        let mut algorithm = FordFulkerson::new();

        let mut first = line_network();
        algorithm.run(&mut first).unwrap();
        let after_first = algorithm.counter().snapshot();
        assert!(after_first.augmentations > 0);

        let mut second = line_network();
        let report = algorithm.run(&mut second).unwrap();
        assert_eq!(report.augmentations, report.ops.augmentations);
    }
}
