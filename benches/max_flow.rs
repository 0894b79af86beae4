//! 最大流算法基准测试
//!
//! 对比 Ford-Fulkerson（长路径偏好 DFS）与 Edmonds-Karp（BFS）
//! 在对抗性实例与分层随机实例上的表现

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowgraph::flow::worst_case::zigzag_network;
use flowgraph::{EdmondsKarp, FlowEdge, FlowNetwork, FordFulkerson};

/// 分层网络：源 -> width 个中间节点 -> 汇
fn layered_network(width: u32) -> FlowNetwork<u32> {
    let sink = width + 1;
    let mut net = FlowNetwork::new(0..=sink, 0, sink).expect("节点集包含源汇");
    for mid in 1..=width {
        net.add_edge(0, mid, FlowEdge::with_capacity(mid as f64));
        net.add_edge(mid, sink, FlowEdge::with_capacity((width - mid + 1) as f64));
    }
    net
}

fn bench_zigzag(c: &mut Criterion) {
    let mut group = c.benchmark_group("zigzag");

    group.bench_function("ford_fulkerson_cap100", |b| {
        b.iter(|| {
            let mut net = zigzag_network(100.0);
            let report = FordFulkerson::new().run(&mut net).unwrap();
            black_box(report.max_flow)
        })
    });
    group.bench_function("edmonds_karp_cap100", |b| {
        b.iter(|| {
            let mut net = zigzag_network(100.0);
            let report = EdmondsKarp::new().run(&mut net).unwrap();
            black_box(report.max_flow)
        })
    });

    group.finish();
}

fn bench_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered");

    group.bench_function("ford_fulkerson_w64", |b| {
        b.iter(|| {
            let mut net = layered_network(64);
            let report = FordFulkerson::new().run(&mut net).unwrap();
            black_box(report.max_flow)
        })
    });
    group.bench_function("edmonds_karp_w64", |b| {
        b.iter(|| {
            let mut net = layered_network(64);
            let report = EdmondsKarp::new().run(&mut net).unwrap();
            black_box(report.max_flow)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_zigzag, bench_layered);
criterion_main!(benches);
