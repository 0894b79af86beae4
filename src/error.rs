//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("节点不存在: {0}")]
    NodeNotFound(String),

    #[error("流量越界: 边 {edge} 的流量 {flow} 超出区间 [{lower}, {upper}]")]
    FlowOutOfBounds {
        edge: String,
        flow: f64,
        lower: f64,
        upper: f64,
    },

    #[error("流量守恒校验失败: 节点 {node} 的净流量为 {balance}，期望 0")]
    ConservationViolated { node: String, balance: f64 },

    #[error("序列化错误: {0}")]
    SerializationError(String),
}
