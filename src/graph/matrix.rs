//! 邻接矩阵视图
//!
//! 从邻接表派生的稠密 V×V 视图，行列下标即节点插入顺序。
//! 缓存一致性由 `DiGraph` 的失效逻辑保证。

use super::digraph::{DiGraph, EdgePayload};
use std::fmt::Debug;
use std::hash::Hash;

/// 邻接矩阵
///
/// 单元格为 `Some(载荷)` 或 `None`（无边标记）。
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix<N, E> {
    /// 行列顺序（节点插入顺序）
    nodes: Vec<N>,
    /// 行优先的单元格
    cells: Vec<Vec<Option<EdgePayload<E>>>>,
}

impl<N, E> AdjacencyMatrix<N, E>
where
    N: Clone + Eq + Hash + Debug,
    E: Clone + PartialEq,
{
    /// 从邻接表重建，O(V²)
    pub(crate) fn from_graph(graph: &DiGraph<N, E>) -> Self {
        let nodes: Vec<N> = graph.nodes().cloned().collect();
        let cells = nodes
            .iter()
            .map(|src| {
                nodes
                    .iter()
                    .map(|dst| graph.edge_payload(src, dst).cloned())
                    .collect()
            })
            .collect();
        Self { nodes, cells }
    }

    /// 行列对应的节点顺序
    pub fn order(&self) -> &[N] {
        &self.nodes
    }

    /// 矩阵边长
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// 按下标访问单元格；越界或无边均为 `None`
    pub fn get(&self, row: usize, col: usize) -> Option<&EdgePayload<E>> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// 按节点访问单元格
    pub fn get_between(&self, src: &N, dst: &N) -> Option<&EdgePayload<E>> {
        let row = self.index_of(src)?;
        let col = self.index_of(dst)?;
        self.get(row, col)
    }

    /// 节点对应的行列下标
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.nodes.iter().position(|n| n == node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_shape_and_sentinel() {
        let mut graph: DiGraph<u32, f64> = DiGraph::new();
        graph.add_edge(1, 2, 0.5);
        graph.add_node(3);

        let matrix = graph.adjacency_matrix();
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.index_of(&3), Some(2));
        assert!(matrix.get(0, 1).is_some());
        assert!(matrix.get(2, 0).is_none());
        assert!(matrix.get(9, 9).is_none());
    }
}
