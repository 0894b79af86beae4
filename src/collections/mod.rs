//! 基础容器模块
//!
//! 路径搜索使用的 LIFO/FIFO 暂存容器

mod queue;
mod stack;

pub use queue::Queue;
pub use stack::Stack;
