//! 操作计数模块
//!
//! 为最大流算法提供可观测的操作计数，
//! 用于比较不同搜索策略的增广次数与检查开销

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// 算法操作计数器
///
/// 每个算法实例持有一份，`reset` 在每次运行开始时调用。
#[derive(Debug, Default)]
pub struct OpCounter {
    /// 残量边检查数
    edges_examined: AtomicU64,
    /// 流量更新数
    flow_updates: AtomicU64,
    /// 路径搜索次数（含未找到路径的最后一次）
    path_searches: AtomicU64,
    /// 增广次数
    augmentations: AtomicU64,
}

/// 可导出的计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub edges_examined: u64,
    pub flow_updates: u64,
    pub path_searches: u64,
    pub augmentations: u64,
}

impl OpCounter {
    /// 创建新的计数器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次残量边检查
    pub fn record_edge_examined(&self) {
        self.edges_examined.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次流量更新
    pub fn record_flow_update(&self) {
        self.flow_updates.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次路径搜索
    pub fn record_path_search(&self) {
        self.path_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录一次增广
    pub fn record_augmentation(&self) {
        self.augmentations.fetch_add(1, Ordering::Relaxed);
    }

    /// 读取增广次数
    pub fn augmentations(&self) -> u64 {
        self.augmentations.load(Ordering::Relaxed)
    }

    /// 并入一份快照的计数（子步骤的计数汇入调用方）
    pub fn absorb(&self, snapshot: &CounterSnapshot) {
        self.edges_examined
            .fetch_add(snapshot.edges_examined, Ordering::Relaxed);
        self.flow_updates
            .fetch_add(snapshot.flow_updates, Ordering::Relaxed);
        self.path_searches
            .fetch_add(snapshot.path_searches, Ordering::Relaxed);
        self.augmentations
            .fetch_add(snapshot.augmentations, Ordering::Relaxed);
    }

    /// 重置所有计数
    pub fn reset(&self) {
        self.edges_examined.store(0, Ordering::Relaxed);
        self.flow_updates.store(0, Ordering::Relaxed);
        self.path_searches.store(0, Ordering::Relaxed);
        self.augmentations.store(0, Ordering::Relaxed);
    }

    /// 获取计数快照
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            edges_examined: self.edges_examined.load(Ordering::Relaxed),
            flow_updates: self.flow_updates.load(Ordering::Relaxed),
            path_searches: self.path_searches.load(Ordering::Relaxed),
            augmentations: self.augmentations.load(Ordering::Relaxed),
        }
    }
}

impl CounterSnapshot {
    /// 导出为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }
}
