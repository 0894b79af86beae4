//! 流网络与最大流算法模块
//!
//! `FlowNetwork` 在有向图之上附加上下界流量与源汇节点；
//! 可行流构造、Ford-Fulkerson 与 Edmonds-Karp 共用同一套
//! 残量图语义与增广编排，仅路径搜索策略不同。

mod edmonds_karp;
mod feasible;
mod ford_fulkerson;
mod network;
mod residual;
pub mod worst_case;

pub use edmonds_karp::EdmondsKarp;
pub use feasible::{FeasibleFlow, FeasibleReport};
pub use ford_fulkerson::{AlgorithmState, FordFulkerson, MaxFlowReport, VisitOrder};
pub use network::{FlowEdge, FlowNetwork, FLOW_EPSILON};
pub use residual::{Direction, PathStep};
