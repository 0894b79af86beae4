//! 有向图
//!
//! 邻接表存储的有向图核心，节点插入顺序可观测。
//! 简单图与多重图在构造时确定，载荷存储策略随之选择。

use super::matrix::AdjacencyMatrix;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// 边载荷
///
/// 简单图每条有向边存一个值，多重图存值的集合
/// （以 `Vec` 实现集合语义，载荷只需 `PartialEq`，浮点载荷也可用）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgePayload<E> {
    /// 简单图的单个载荷
    One(E),
    /// 多重图的载荷集合
    Many(Vec<E>),
}

impl<E> EdgePayload<E> {
    /// 以切片形式访问所有载荷值
    pub fn values(&self) -> &[E] {
        match self {
            EdgePayload::One(data) => std::slice::from_ref(data),
            EdgePayload::Many(values) => values,
        }
    }

    /// 简单图载荷
    pub fn as_single(&self) -> Option<&E> {
        match self {
            EdgePayload::One(data) => Some(data),
            EdgePayload::Many(_) => None,
        }
    }

    pub(crate) fn as_single_mut(&mut self) -> Option<&mut E> {
        match self {
            EdgePayload::One(data) => Some(data),
            EdgePayload::Many(_) => None,
        }
    }
}

/// 有向图
///
/// 不变量：邻接表对节点集封闭——任何作为邻居出现的节点
/// 一定也是顶层键（可能带空邻居表）。
#[derive(Debug)]
pub struct DiGraph<N, E> {
    /// 邻接表：源节点 -> (目标节点 -> 载荷)
    adjacency: IndexMap<N, IndexMap<N, EdgePayload<E>>>,
    /// 反向索引：目标节点 -> 源节点集合
    predecessors: IndexMap<N, IndexSet<N>>,
    /// 多重图标志（构造时确定）
    multi: bool,
    /// 邻接矩阵缓存，结构性变更时失效
    matrix_cache: RwLock<Option<Arc<AdjacencyMatrix<N, E>>>>,
}

impl<N, E> DiGraph<N, E>
where
    N: Clone + Eq + Hash + Debug,
    E: Clone + PartialEq,
{
    /// 创建空的简单有向图
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
            predecessors: IndexMap::new(),
            multi: false,
            matrix_cache: RwLock::new(None),
        }
    }

    /// 创建空的多重有向图
    pub fn new_multi() -> Self {
        Self {
            multi: true,
            ..Self::new()
        }
    }

    /// 从初始邻接表构造简单图
    pub fn from_adjacency(init: IndexMap<N, IndexMap<N, E>>) -> Self {
        let mut graph = Self::new();
        for (src, neighbors) in init {
            graph.add_node(src.clone());
            for (dst, data) in neighbors {
                graph.add_edge(src.clone(), dst, data);
            }
        }
        graph
    }

    /// 是否为多重图
    pub fn is_multigraph(&self) -> bool {
        self.multi
    }

    // ==================== 节点操作 ====================

    /// 添加节点（幂等）
    pub fn add_node(&mut self, node: N) {
        if !self.adjacency.contains_key(&node) {
            self.adjacency.insert(node.clone(), IndexMap::new());
            self.predecessors.entry(node).or_default();
            self.invalidate_matrix();
        }
    }

    /// 删除节点及其所有关联边；节点不存在时为空操作
    pub fn remove_node(&mut self, node: &N) {
        let Some(neighbors) = self.adjacency.shift_remove(node) else {
            return;
        };
        for dst in neighbors.keys() {
            if let Some(preds) = self.predecessors.get_mut(dst) {
                preds.shift_remove(node);
            }
        }
        if let Some(preds) = self.predecessors.shift_remove(node) {
            for src in &preds {
                if let Some(out) = self.adjacency.get_mut(src) {
                    out.shift_remove(node);
                }
            }
        }
        self.invalidate_matrix();
    }

    /// 节点是否存在
    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// 按插入顺序迭代所有节点
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    // ==================== 边操作 ====================

    /// 添加边；缺失的端点节点会被静默创建
    ///
    /// 简单图覆盖同一有序点对的已有载荷，多重图将载荷并入集合。
    pub fn add_edge(&mut self, src: N, dst: N, data: E) {
        self.add_node(src.clone());
        self.add_node(dst.clone());

        let neighbors = self.adjacency.entry(src.clone()).or_default();
        if self.multi {
            match neighbors.get_mut(&dst) {
                Some(EdgePayload::Many(values)) => {
                    if !values.contains(&data) {
                        values.push(data);
                    }
                }
                _ => {
                    neighbors.insert(dst.clone(), EdgePayload::Many(vec![data]));
                }
            }
        } else {
            neighbors.insert(dst.clone(), EdgePayload::One(data));
        }
        self.predecessors.entry(dst).or_default().insert(src);
        self.invalidate_matrix();
    }

    /// 删除边
    ///
    /// `values` 为空时无条件删除；给定一个值时仅在载荷匹配时删除；
    /// 多重图删除匹配的子集。对简单图给定多个值是配置错误。
    /// 任一端点不存在时为空操作。
    pub fn remove_edge(&mut self, src: &N, dst: &N, values: &[E]) -> Result<()> {
        if !self.multi && values.len() > 1 {
            return Err(Error::Configuration(
                "简单图的边删除最多只能给定一个载荷值".to_string(),
            ));
        }
        let Some(neighbors) = self.adjacency.get_mut(src) else {
            return Ok(());
        };
        let (changed, now_empty) = match neighbors.get_mut(dst) {
            None => (false, false),
            Some(EdgePayload::One(existing)) => {
                if values.is_empty() || *existing == values[0] {
                    (true, true)
                } else {
                    (false, false)
                }
            }
            Some(EdgePayload::Many(stored)) => {
                let before = stored.len();
                if values.is_empty() {
                    stored.clear();
                } else {
                    stored.retain(|data| !values.contains(data));
                }
                (stored.len() != before, stored.is_empty())
            }
        };
        if now_empty {
            neighbors.shift_remove(dst);
            if let Some(preds) = self.predecessors.get_mut(dst) {
                preds.shift_remove(src);
            }
        }
        if changed {
            self.invalidate_matrix();
        }
        Ok(())
    }

    /// 查询两节点间的边载荷
    ///
    /// 任一节点不在图中返回查找错误；节点都存在但无边时
    /// 返回 `Ok(None)` 作为显式的"无边"标记。
    pub fn get_edge_data(&self, src: &N, dst: &N) -> Result<Option<&EdgePayload<E>>> {
        if !self.adjacency.contains_key(src) {
            return Err(Error::NodeNotFound(format!("{:?}", src)));
        }
        if !self.adjacency.contains_key(dst) {
            return Err(Error::NodeNotFound(format!("{:?}", dst)));
        }
        Ok(self.edge_payload(src, dst))
    }

    /// 边是否存在
    pub fn contains_edge(&self, src: &N, dst: &N) -> bool {
        self.edge_payload(src, dst).is_some()
    }

    /// 边数量（多重图按有序点对计）
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|neighbors| neighbors.len()).sum()
    }

    /// 迭代所有边
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &EdgePayload<E>)> {
        self.adjacency
            .iter()
            .flat_map(|(src, neighbors)| neighbors.iter().map(move |(dst, data)| (src, dst, data)))
    }

    pub(crate) fn neighbor_payloads<'a>(
        &'a self,
        node: &N,
    ) -> impl Iterator<Item = (&'a N, &'a EdgePayload<E>)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter())
    }

    pub(crate) fn edge_payload(&self, src: &N, dst: &N) -> Option<&EdgePayload<E>> {
        self.adjacency.get(src).and_then(|neighbors| neighbors.get(dst))
    }

    pub(crate) fn edge_payload_mut(&mut self, src: &N, dst: &N) -> Option<&mut EdgePayload<E>> {
        *self.matrix_cache.get_mut() = None;
        self.adjacency.get_mut(src).and_then(|neighbors| neighbors.get_mut(dst))
    }

    // ==================== 邻居查询 ====================

    /// 出边邻居；节点不存在时为空迭代
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.keys())
    }

    /// 入边来源节点；节点不存在时为空迭代
    pub fn predecessors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.predecessors
            .get(node)
            .into_iter()
            .flat_map(|preds| preds.iter())
    }

    /// 出度；节点不存在时为 0
    pub fn degree(&self, node: &N) -> usize {
        self.adjacency.get(node).map_or(0, |neighbors| neighbors.len())
    }

    /// 入度；节点不存在时为 0
    pub fn in_degree(&self, node: &N) -> usize {
        self.predecessors.get(node).map_or(0, |preds| preds.len())
    }

    // ==================== 邻接矩阵 ====================

    /// 获取邻接矩阵视图
    ///
    /// 失效后的首次访问以 O(V²) 重建，之后返回同一份缓存。
    pub fn adjacency_matrix(&self) -> Arc<AdjacencyMatrix<N, E>> {
        if let Some(cached) = self.matrix_cache.read().as_ref() {
            return Arc::clone(cached);
        }
        let matrix = Arc::new(AdjacencyMatrix::from_graph(self));
        *self.matrix_cache.write() = Some(Arc::clone(&matrix));
        matrix
    }

    fn invalidate_matrix(&self) {
        *self.matrix_cache.write() = None;
    }
}

impl<N, E> Default for DiGraph<N, E>
where
    N: Clone + Eq + Hash + Debug,
    E: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Clone for DiGraph<N, E>
where
    N: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            adjacency: self.adjacency.clone(),
            predecessors: self.predecessors.clone(),
            multi: self.multi,
            matrix_cache: RwLock::new(None),
        }
    }
}
