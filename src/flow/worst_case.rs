//! 对抗性实例生成
//!
//! 经典的四节点网络：两条大容量平行路径被一条单位容量
//! 横边连接。长路径偏好的 Ford-Fulkerson 每次都穿过横边，
//! 增广 2·capacity 次；Edmonds-Karp 两次即收敛。
//! 容量是显式参数，不依赖任何进程级共享状态。

use super::network::{FlowEdge, FlowNetwork};

/// 构造横边容量为 1、其余边容量为 `capacity` 的对抗性网络
///
/// 最大流为 `2 * capacity`。`capacity` 应为正整数值的浮点数，
/// 以保证增广次数精确可数。
pub fn zigzag_network(capacity: f64) -> FlowNetwork<&'static str> {
    let mut net = FlowNetwork::new(["s", "a", "b", "t"], "s", "t")
        .expect("节点集包含源汇，构造不会失败");
    net.add_edge("s", "a", FlowEdge::with_capacity(capacity));
    net.add_edge("s", "b", FlowEdge::with_capacity(capacity));
    net.add_edge("a", "b", FlowEdge::with_capacity(1.0));
    net.add_edge("a", "t", FlowEdge::with_capacity(capacity));
    net.add_edge("b", "t", FlowEdge::with_capacity(capacity));
    net
}
