//! 无向图
//!
//! 基于有向核心的对称包装层。
//! 不变量：每条存储的边 (u,v,data) 都有载荷相同的镜像边 (v,u,data)，
//! 删除对两个方向原子生效。

use super::digraph::{DiGraph, EdgePayload};
use super::matrix::AdjacencyMatrix;
use crate::error::Result;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// 无向图
#[derive(Debug, Clone)]
pub struct UnGraph<N, E> {
    inner: DiGraph<N, E>,
}

impl<N, E> UnGraph<N, E>
where
    N: Clone + Eq + Hash + Debug,
    E: Clone + PartialEq,
{
    /// 创建空的简单无向图
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
        }
    }

    /// 创建空的多重无向图
    pub fn new_multi() -> Self {
        Self {
            inner: DiGraph::new_multi(),
        }
    }

    /// 添加节点（幂等）
    pub fn add_node(&mut self, node: N) {
        self.inner.add_node(node);
    }

    /// 添加边并镜像到反方向
    pub fn add_edge(&mut self, u: N, v: N, data: E) {
        if u == v {
            self.inner.add_edge(u, v, data);
            return;
        }
        self.inner.add_edge(u.clone(), v.clone(), data.clone());
        self.inner.add_edge(v, u, data);
    }

    /// 对称删除边（两个方向一起移除）
    pub fn remove_edge(&mut self, u: &N, v: &N, values: &[E]) -> Result<()> {
        self.inner.remove_edge(u, v, values)?;
        if u != v {
            self.inner.remove_edge(v, u, values)?;
        }
        Ok(())
    }

    /// 删除节点及其所有关联边
    pub fn remove_node(&mut self, node: &N) {
        self.inner.remove_node(node);
    }

    /// 查询边载荷；语义同有向核心
    pub fn get_edge_data(&self, u: &N, v: &N) -> Result<Option<&EdgePayload<E>>> {
        self.inner.get_edge_data(u, v)
    }

    /// 邻居；节点不存在时为空迭代
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.inner.neighbors(node)
    }

    /// 度数；节点不存在时为 0
    pub fn degree(&self, node: &N) -> usize {
        self.inner.degree(node)
    }

    /// 节点是否存在
    pub fn contains_node(&self, node: &N) -> bool {
        self.inner.contains_node(node)
    }

    /// 边是否存在（任一方向等价）
    pub fn contains_edge(&self, u: &N, v: &N) -> bool {
        self.inner.contains_edge(u, v)
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// 按插入顺序迭代所有节点
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.inner.nodes()
    }

    /// 邻接矩阵视图（对称矩阵）
    pub fn adjacency_matrix(&self) -> Arc<AdjacencyMatrix<N, E>> {
        self.inner.adjacency_matrix()
    }
}

impl<N, E> Default for UnGraph<N, E>
where
    N: Clone + Eq + Hash + Debug,
    E: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_symmetry() {
        let mut graph = UnGraph::new();
        graph.add_edge("a", "b", 10);
        graph.add_edge("b", "c", 20);

        for (u, v) in [("a", "b"), ("b", "c")] {
            let forward = graph.get_edge_data(&u, &v).unwrap().cloned();
            let backward = graph.get_edge_data(&v, &u).unwrap().cloned();
            assert_eq!(forward, backward);
            assert!(graph.neighbors(&u).any(|n| *n == v));
            assert!(graph.neighbors(&v).any(|n| *n == u));
        }
    }

    #[test]
    fn test_symmetric_removal() {
        let mut graph = UnGraph::new();
        graph.add_edge(1, 2, "x");

        graph.remove_edge(&2, &1, &[]).unwrap();
        assert!(!graph.contains_edge(&1, &2));
        assert!(!graph.contains_edge(&2, &1));
    }

    #[test]
    fn test_multi_undirected_mirrors_value_set() {
        let mut graph = UnGraph::new_multi();
        graph.add_edge("a", "b", 1);
        graph.add_edge("b", "a", 2); // 任一方向添加都进入同一集合

        let forward = graph.get_edge_data(&"a", &"b").unwrap().unwrap();
        let backward = graph.get_edge_data(&"b", &"a").unwrap().unwrap();
        assert_eq!(forward.values(), backward.values());
        assert_eq!(forward.values().len(), 2);

        // 删除一个值，两个方向同步
        graph.remove_edge(&"a", &"b", &[1]).unwrap();
        assert_eq!(
            graph.get_edge_data(&"b", &"a").unwrap().unwrap().values(),
            &[2]
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut graph = UnGraph::new();
        graph.add_edge("a", "b", 1);

        let snapshot = graph.clone();
        graph.add_edge("b", "c", 2);

        assert_eq!(snapshot.node_count(), 2);
        assert!(!snapshot.contains_node(&"c"));
        assert!(snapshot.contains_edge(&"b", &"a"));
    }

    #[test]
    fn test_remove_node_clears_both_directions() {
        let mut graph = UnGraph::new();
        graph.add_edge("a", "b", 1);
        graph.add_edge("b", "c", 2);

        graph.remove_node(&"b");
        assert_eq!(graph.degree(&"a"), 0);
        assert_eq!(graph.degree(&"c"), 0);
    }
}
