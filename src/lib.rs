//! FlowGraph - 内存图结构与最大流算法库
//!
//! 提供可复用的图计算内核：
//! - 有向/无向邻接表存储，惰性重建的邻接矩阵视图
//! - 带上下界的流网络（FlowNetwork）与流量守恒校验
//! - 可行流构造（下界归约）、Ford-Fulkerson 与 Edmonds-Karp 最大流
//! - 用于基准测试的操作计数器

pub mod collections;
pub mod error;
pub mod flow;
pub mod graph;
pub mod metrics;

// 重导出常用类型
pub use collections::{Queue, Stack};
pub use error::{Error, Result};
pub use flow::{
    AlgorithmState, Direction, EdmondsKarp, FeasibleFlow, FeasibleReport, FlowEdge, FlowNetwork,
    FordFulkerson, MaxFlowReport, PathStep, VisitOrder, FLOW_EPSILON,
};
pub use graph::{AdjacencyMatrix, DiGraph, EdgePayload, UnGraph};
pub use metrics::{CounterSnapshot, OpCounter};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
