//! FIFO 队列
//!
//! 广度优先路径搜索的显式队列

use std::collections::VecDeque;

/// 先进先出队列，enqueue/dequeue 均摊 O(1)
#[derive(Debug, Clone, Default)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// 创建空队列
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// 入队
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// 出队
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// 查看队首元素
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
