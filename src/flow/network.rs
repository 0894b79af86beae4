//! 流网络
//!
//! 载荷为上下界流量三元组的有向图，附加源汇节点、
//! 流量守恒校验与聚合查询。

use crate::error::{Error, Result};
use crate::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// 浮点流量比较容差
pub const FLOW_EPSILON: f64 = 1e-9;

/// 边的流量数据：下界、当前流量、上界
///
/// 不变量（流量已赋值时）：`lower <= flow <= upper`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// 流量下界
    pub lower: f64,
    /// 当前流量，`None` 表示尚未赋值
    pub flow: Option<f64>,
    /// 流量上界
    pub upper: f64,
}

impl FlowEdge {
    /// 创建未赋流量的边
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            flow: None,
            upper,
        }
    }

    /// 创建下界为 0 的边
    pub fn with_capacity(upper: f64) -> Self {
        Self::new(0.0, upper)
    }

    /// 创建上界无穷的边
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// 设置初始流量
    pub fn with_flow(mut self, flow: f64) -> Self {
        self.flow = Some(flow);
        self
    }

    /// 正向残量：`upper - flow`，未赋值的流量按 0 计
    pub fn forward_residual(&self) -> f64 {
        self.upper - self.flow.unwrap_or(0.0)
    }

    /// 反向残量：`flow - lower`，未赋值的流量按 0 计
    pub fn backward_residual(&self) -> f64 {
        self.flow.unwrap_or(0.0) - self.lower
    }
}

/// 流网络
///
/// 源汇在构造时固定，必须已在节点集内。
/// 流量守恒（基尔霍夫定律）按需校验，不持续强制。
#[derive(Debug, Clone)]
pub struct FlowNetwork<N> {
    graph: DiGraph<N, FlowEdge>,
    source: N,
    sink: N,
    /// 历史上出现过的最大下界，单调维护，
    /// 用于可行流构造的 O(1) 快速判定
    max_lower_bound: f64,
}

impl<N> FlowNetwork<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// 以节点集创建空网络
    pub fn new(nodes: impl IntoIterator<Item = N>, source: N, sink: N) -> Result<Self> {
        let mut graph = DiGraph::new();
        for node in nodes {
            graph.add_node(node);
        }
        Self::from_graph(graph, source, sink, false)
    }

    /// 从已有的有向图构造
    ///
    /// 源或汇不在节点集内返回配置错误；
    /// `validate` 为真时额外执行一次初始流量校验。
    pub fn from_graph(graph: DiGraph<N, FlowEdge>, source: N, sink: N, validate: bool) -> Result<Self> {
        if !graph.contains_node(&source) {
            return Err(Error::Configuration(format!(
                "源节点 {:?} 不在节点集内",
                source
            )));
        }
        if !graph.contains_node(&sink) {
            return Err(Error::Configuration(format!(
                "汇节点 {:?} 不在节点集内",
                sink
            )));
        }
        if source == sink {
            return Err(Error::Configuration(format!(
                "源节点与汇节点不能相同: {:?}",
                source
            )));
        }
        let max_lower_bound = graph
            .edges()
            .filter_map(|(_, _, payload)| payload.as_single())
            .map(|edge| edge.lower)
            .fold(0.0, f64::max);
        let network = Self {
            graph,
            source,
            sink,
            max_lower_bound,
        };
        if validate {
            network.check_flow_validity()?;
        }
        Ok(network)
    }

    /// 源节点
    pub fn source(&self) -> &N {
        &self.source
    }

    /// 汇节点
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// 底层有向图
    pub fn graph(&self) -> &DiGraph<N, FlowEdge> {
        &self.graph
    }

    /// 历史最大下界
    pub fn max_lower_bound(&self) -> f64 {
        self.max_lower_bound
    }

    // ==================== 结构操作 ====================

    /// 添加节点（幂等）
    pub fn add_node(&mut self, node: N) {
        self.graph.add_node(node);
    }

    /// 添加边；缺失的端点会被静默创建
    pub fn add_edge(&mut self, src: N, dst: N, edge: FlowEdge) {
        self.max_lower_bound = self.max_lower_bound.max(edge.lower);
        self.graph.add_edge(src, dst, edge);
    }

    /// 查询边；端点或边不存在时为 `None`
    pub fn get_edge(&self, src: &N, dst: &N) -> Option<&FlowEdge> {
        self.graph
            .edge_payload(src, dst)
            .and_then(|payload| payload.as_single())
    }

    /// 迭代所有边
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &FlowEdge)> {
        self.graph
            .edges()
            .filter_map(|(src, dst, payload)| payload.as_single().map(|edge| (src, dst, edge)))
    }

    /// 出边及其流量数据
    pub fn outgoing<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, &'a FlowEdge)> + 'a {
        self.graph
            .neighbor_payloads(node)
            .filter_map(|(dst, payload)| payload.as_single().map(|edge| (dst, edge)))
    }

    /// 入边及其流量数据
    pub fn incoming<'a>(&'a self, node: &'a N) -> impl Iterator<Item = (&'a N, &'a FlowEdge)> + 'a {
        self.graph
            .predecessors(node)
            .filter_map(move |src| {
                self.graph
                    .edge_payload(src, node)
                    .and_then(|payload| payload.as_single())
                    .map(|edge| (src, edge))
            })
    }

    // ==================== 流量操作 ====================

    /// 修改两节点间的流量
    ///
    /// 算法修改流量的唯一原语。边不存在时为空操作，
    /// 不做越界检查（由调用方负责）。
    pub fn change_flow_between_nodes(&mut self, src: &N, dst: &N, new_flow: f64) {
        if let Some(payload) = self.graph.edge_payload_mut(src, dst) {
            if let Some(edge) = payload.as_single_mut() {
                edge.flow = Some(new_flow);
            }
        }
    }

    /// 给所有边赋零流量
    pub fn assign_zero_flow(&mut self) {
        let pairs: Vec<(N, N)> = self
            .edges()
            .map(|(src, dst, _)| (src.clone(), dst.clone()))
            .collect();
        for (src, dst) in pairs {
            self.change_flow_between_nodes(&src, &dst, 0.0);
        }
    }

    /// 是否还有未赋值的流量
    pub fn has_unassigned_flow(&self) -> bool {
        self.edges().any(|(_, _, edge)| edge.flow.is_none())
    }

    // ==================== 聚合查询 ====================

    /// 节点净流量：入流减出流，未赋值的流量按 0 计
    pub fn get_node_balance(&self, node: &N) -> f64 {
        let inflow: f64 = self
            .incoming(node)
            .map(|(_, edge)| edge.flow.unwrap_or(0.0))
            .sum();
        let outflow: f64 = self
            .outgoing(node)
            .map(|(_, edge)| edge.flow.unwrap_or(0.0))
            .sum();
        inflow - outflow
    }

    /// 当前总流量：源节点的净流出
    pub fn current_flow(&self) -> f64 {
        -self.get_node_balance(&self.source)
    }

    /// 流量有效性校验
    ///
    /// 逐边检查 `lower <= flow <= upper`（未赋值的流量视为通过），
    /// 逐个非源汇节点检查净流量在容差内为零。不修改任何状态。
    pub fn check_flow_validity(&self) -> Result<()> {
        for (src, dst, edge) in self.edges() {
            if let Some(flow) = edge.flow {
                if flow < edge.lower - FLOW_EPSILON || flow > edge.upper + FLOW_EPSILON {
                    return Err(Error::FlowOutOfBounds {
                        edge: format!("{:?} -> {:?}", src, dst),
                        flow,
                        lower: edge.lower,
                        upper: edge.upper,
                    });
                }
            }
        }
        for node in self.graph.nodes() {
            if *node == self.source || *node == self.sink {
                continue;
            }
            let balance = self.get_node_balance(node);
            if balance.abs() > FLOW_EPSILON {
                return Err(Error::ConservationViolated {
                    node: format!("{:?}", node),
                    balance,
                });
            }
        }
        Ok(())
    }
}
