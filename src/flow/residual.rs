//! 残量图语义与增广编排
//!
//! 对边 (u,v,[lo,flow,hi])：
//! - 正向步 u->v 可行当 `flow < hi`，残量 `hi - flow`
//! - 反向步 v->u（沿同一条存储边）可行当 `flow > lo`，残量 `flow - lo`
//!
//! Ford-Fulkerson 与 Edmonds-Karp 共用这里的增广循环，
//! 只注入各自的路径搜索策略。

use super::network::{FlowNetwork, FLOW_EPSILON};
use crate::metrics::OpCounter;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

/// 残量步的遍历方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// 沿存储方向走未饱和边
    Forward,
    /// 逆着存储方向退还高于下界的流量
    Backward,
}

/// 增广路径上的一步
///
/// `from -> to` 是遍历方向；`Backward` 步对应的存储边是 `(to, from)`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep<N> {
    pub from: N,
    pub to: N,
    pub direction: Direction,
}

/// 增广路径：源到汇的有序残量步序列
pub(crate) type ResidualPath<N> = SmallVec<[PathStep<N>; 8]>;

/// 单步残量容量
pub(crate) fn step_residual<N>(network: &FlowNetwork<N>, step: &PathStep<N>) -> f64
where
    N: Clone + Eq + Hash + Debug,
{
    match step.direction {
        Direction::Forward => network
            .get_edge(&step.from, &step.to)
            .map_or(0.0, |edge| edge.forward_residual()),
        Direction::Backward => network
            .get_edge(&step.to, &step.from)
            .map_or(0.0, |edge| edge.backward_residual()),
    }
}

/// 路径瓶颈：所有步的最小残量
pub(crate) fn bottleneck<N>(network: &FlowNetwork<N>, path: &ResidualPath<N>) -> f64
where
    N: Clone + Eq + Hash + Debug,
{
    path.iter()
        .map(|step| step_residual(network, step))
        .fold(f64::INFINITY, f64::min)
}

/// 沿路径增广：正向步加流量，反向步减流量
pub(crate) fn augment<N>(
    network: &mut FlowNetwork<N>,
    path: &ResidualPath<N>,
    amount: f64,
    counter: &OpCounter,
) where
    N: Clone + Eq + Hash + Debug,
{
    for step in path {
        let (src, dst, delta) = match step.direction {
            Direction::Forward => (&step.from, &step.to, amount),
            Direction::Backward => (&step.to, &step.from, -amount),
        };
        let current = network
            .get_edge(src, dst)
            .and_then(|edge| edge.flow)
            .unwrap_or(0.0);
        network.change_flow_between_nodes(src, dst, current + delta);
        counter.record_flow_update();
    }
}

/// 从 parent 映射重构源到汇的路径
pub(crate) fn reconstruct_path<N>(
    parents: &HashMap<N, PathStep<N>>,
    source: &N,
    sink: &N,
) -> Option<ResidualPath<N>>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut path = ResidualPath::new();
    let mut current = sink.clone();
    while current != *source {
        let step = parents.get(&current)?;
        current = step.from.clone();
        path.push(step.clone());
    }
    path.reverse();
    Some(path)
}

/// 共享的增广循环
///
/// 反复调用路径搜索直到残量图中不再有增广路径，返回增广次数。
pub(crate) fn drive_augmentation<N, F>(
    network: &mut FlowNetwork<N>,
    counter: &OpCounter,
    mut find_path: F,
) -> u64
where
    N: Clone + Eq + Hash + Debug,
    F: FnMut(&FlowNetwork<N>, &OpCounter) -> Option<ResidualPath<N>>,
{
    let mut augmentations = 0;
    loop {
        counter.record_path_search();
        let Some(path) = find_path(network, counter) else {
            break;
        };
        let amount = bottleneck(network, &path);
        if amount <= FLOW_EPSILON {
            break;
        }
        trace!(steps = path.len(), bottleneck = amount, "沿增广路径推流");
        augment(network, &path, amount, counter);
        counter.record_augmentation();
        augmentations += 1;
    }
    augmentations
}
