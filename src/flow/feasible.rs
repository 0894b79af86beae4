//! 可行流构造
//!
//! 把"找任意满足上下界的流"归约为辅助网络上的最大流：
//! 超级源/超级汇吸收下界造成的节点失衡，原汇经中继节点
//! 回到原源的无界回边允许循环流。超级源出边全部饱和
//! 当且仅当存在可行流。

use super::ford_fulkerson::{FordFulkerson, VisitOrder};
use super::network::{FlowEdge, FlowNetwork, FLOW_EPSILON};
use crate::error::Result;
use crate::metrics::OpCounter;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// 辅助网络的节点：原节点加一对超级源汇
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum AuxNode<N> {
    Orig(N),
    SuperSource,
    SuperSink,
    /// 循环回边的中继；原图本身可能已有汇到源的边，
    /// 回边必须绕开那对有序节点以免覆盖其松弛边
    Relay,
}

/// 可行流构造的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeasibleReport {
    /// 是否找到可行流
    pub success: bool,
    /// 是否动用了辅助网络归约（全零下界时走快速路径）
    pub used_reduction: bool,
}

/// 可行流构造算法
///
/// 成功时就地写回流量赋值；失败时网络保持不变，
/// 以布尔值而非错误报告不可行。
#[derive(Debug, Default)]
pub struct FeasibleFlow {
    counter: OpCounter,
}

impl FeasibleFlow {
    /// 创建算法实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 操作计数器（含内部最大流搜索与写回的计数）
    pub fn counter(&self) -> &OpCounter {
        &self.counter
    }

    /// 构造可行流
    pub fn solve<N>(&self, network: &mut FlowNetwork<N>) -> Result<FeasibleReport>
    where
        N: Clone + Eq + Hash + Debug,
    {
        // 快速路径：下界全零时零流量平凡可行
        if network.max_lower_bound() == 0.0 {
            let pairs: Vec<(N, N)> = network
                .edges()
                .map(|(src, dst, _)| (src.clone(), dst.clone()))
                .collect();
            for (src, dst) in pairs {
                network.change_flow_between_nodes(&src, &dst, 0.0);
                self.counter.record_flow_update();
            }
            return Ok(FeasibleReport {
                success: true,
                used_reduction: false,
            });
        }

        let edges: Vec<(N, N, FlowEdge)> = network
            .edges()
            .map(|(src, dst, edge)| (src.clone(), dst.clone(), *edge))
            .collect();

        // 辅助网络：原边只保留下界之上的松弛容量
        let mut aux: FlowNetwork<AuxNode<N>> = FlowNetwork::new(
            [AuxNode::SuperSource, AuxNode::SuperSink],
            AuxNode::SuperSource,
            AuxNode::SuperSink,
        )?;
        for (src, dst, edge) in &edges {
            aux.add_edge(
                AuxNode::Orig(src.clone()),
                AuxNode::Orig(dst.clone()),
                FlowEdge::with_capacity(edge.upper - edge.lower),
            );
        }

        // 节点失衡：入边下界之和减出边下界之和
        let mut balances: HashMap<N, f64> = HashMap::new();
        for (src, dst, edge) in &edges {
            *balances.entry(dst.clone()).or_insert(0.0) += edge.lower;
            *balances.entry(src.clone()).or_insert(0.0) -= edge.lower;
        }
        for (node, balance) in &balances {
            if *balance > FLOW_EPSILON {
                aux.add_edge(
                    AuxNode::SuperSource,
                    AuxNode::Orig(node.clone()),
                    FlowEdge::with_capacity(*balance),
                );
            } else if *balance < -FLOW_EPSILON {
                aux.add_edge(
                    AuxNode::Orig(node.clone()),
                    AuxNode::SuperSink,
                    FlowEdge::with_capacity(-*balance),
                );
            }
        }

        // 原汇经中继回到原源的无界回边，允许循环流；
        // 不直接连 (汇, 源)，那对节点间可能已有原边的松弛边
        aux.add_edge(
            AuxNode::Orig(network.sink().clone()),
            AuxNode::Relay,
            FlowEdge::unbounded(),
        );
        aux.add_edge(
            AuxNode::Relay,
            AuxNode::Orig(network.source().clone()),
            FlowEdge::unbounded(),
        );

        // 辅助网络下界全零，零流量即可行起点；纯最大流搜索，无递归可行流委托
        aux.assign_zero_flow();
        let report = FordFulkerson::with_visit_order(VisitOrder::Stable).max_flow(&mut aux)?;
        self.counter.absorb(&report.ops);
        debug!(aux_flow = report.max_flow, "辅助网络最大流完成");

        // 可行当且仅当超级源出边全部饱和
        let saturated = aux
            .outgoing(&AuxNode::SuperSource)
            .all(|(_, edge)| edge.flow.unwrap_or(0.0) + FLOW_EPSILON >= edge.upper);
        if !saturated {
            debug!("超级源出边未饱和，网络不可行");
            return Ok(FeasibleReport {
                success: false,
                used_reduction: true,
            });
        }

        // 写回：原边流量 = 下界 + 辅助边流量
        for (src, dst, edge) in &edges {
            let aux_flow = aux
                .get_edge(&AuxNode::Orig(src.clone()), &AuxNode::Orig(dst.clone()))
                .and_then(|aux_edge| aux_edge.flow)
                .unwrap_or(0.0);
            network.change_flow_between_nodes(src, dst, edge.lower + aux_flow);
            self.counter.record_flow_update();
        }
        Ok(FeasibleReport {
            success: true,
            used_reduction: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 场景 C 的带下界网络
    fn lower_bound_network() -> FlowNetwork<&'static str> {
        let mut net = FlowNetwork::new(["s", "u", "v", "t"], "s", "t").unwrap();
        net.add_edge("s", "u", FlowEdge::new(1.0, 3.0));
        net.add_edge("s", "v", FlowEdge::new(2.0, 3.0));
        net.add_edge("v", "u", FlowEdge::new(1.0, 3.0));
        net.add_edge("u", "t", FlowEdge::new(2.0, 4.0));
        net.add_edge("v", "t", FlowEdge::new(0.0, 2.0));
        net
    }

    #[test]
    fn test_zero_lower_bounds_skip_reduction() {
        // 场景 D：下界全零时直接赋零流量
        let mut net = FlowNetwork::new(["s", "a", "t"], "s", "t").unwrap();
        net.add_edge("s", "a", FlowEdge::with_capacity(5.0));
        net.add_edge("a", "t", FlowEdge::with_capacity(5.0));

        let report = FeasibleFlow::new().solve(&mut net).unwrap();

        assert!(report.success);
        assert!(!report.used_reduction);
        for (_, _, edge) in net.edges() {
            assert_eq!(edge.flow, Some(0.0));
        }
    }

    #[test]
    fn test_lower_bounds_yield_valid_flow() {
        let mut net = lower_bound_network();
        let report = FeasibleFlow::new().solve(&mut net).unwrap();

        assert!(report.success);
        assert!(report.used_reduction);
        // 可行流满足所有上下界与守恒律
        net.check_flow_validity().unwrap();
        for (_, _, edge) in net.edges() {
            let flow = edge.flow.unwrap();
            assert!(flow >= edge.lower - FLOW_EPSILON);
            assert!(flow <= edge.upper + FLOW_EPSILON);
        }
    }

    #[test]
    fn test_infeasible_leaves_network_untouched() {
        // v 的入流下界 2 超过其出流上界 1
        let mut net = FlowNetwork::new(["s", "u", "v", "t"], "s", "t").unwrap();
        net.add_edge("s", "u", FlowEdge::with_capacity(5.0));
        net.add_edge("u", "v", FlowEdge::new(2.0, 2.0));
        net.add_edge("v", "t", FlowEdge::with_capacity(1.0));

        let report = FeasibleFlow::new().solve(&mut net).unwrap();

        assert!(!report.success);
        assert!(report.used_reduction);
        assert!(net.has_unassigned_flow());
    }

    #[test]
    fn test_sink_to_source_edge_keeps_bounds() {
        // 原图自带汇到源的边，回边不得覆盖其松弛边
        let mut net = FlowNetwork::new(["s", "t"], "s", "t").unwrap();
        net.add_edge("s", "t", FlowEdge::new(2.0, 4.0));
        net.add_edge("t", "s", FlowEdge::with_capacity(1.0));

        let report = FeasibleFlow::new().solve(&mut net).unwrap();

        assert!(report.success);
        net.check_flow_validity().unwrap();
        let back = net.get_edge(&"t", &"s").unwrap();
        assert!(back.flow.unwrap() <= 1.0 + FLOW_EPSILON);
        assert!(net.get_edge(&"s", &"t").unwrap().flow.unwrap() >= 2.0 - FLOW_EPSILON);
    }

    #[test]
    fn test_counter_covers_reduction_and_write_back() {
        let mut net = lower_bound_network();
        let algorithm = FeasibleFlow::new();
        algorithm.solve(&mut net).unwrap();

        let snapshot = algorithm.counter().snapshot();
        assert!(snapshot.path_searches > 0);
        assert!(snapshot.flow_updates >= 5); // 写回每条原边各计一次
    }

    #[test]
    fn test_solve_is_repeatable() {
        let mut net = lower_bound_network();
        FeasibleFlow::new().solve(&mut net).unwrap();
        let first = net.current_flow();

        // 已有赋值的网络重新求解仍得到可行流
        let report = FeasibleFlow::new().solve(&mut net).unwrap();
        assert!(report.success);
        net.check_flow_validity().unwrap();
        assert!(first >= 0.0);
    }
}
