//! 图核心模块
//!
//! 有向邻接表为基础结构，无向语义由镜像包装层保证，
//! 邻接矩阵作为惰性重建的派生视图

mod digraph;
mod matrix;
mod ungraph;

pub use digraph::{DiGraph, EdgePayload};
pub use matrix::AdjacencyMatrix;
pub use ungraph::UnGraph;
