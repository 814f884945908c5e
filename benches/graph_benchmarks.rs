use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use graphite::{Graph, GraphCollection};

/// Build a graph of `size` nodes, each linked to the next two, every third
/// node tagged
fn build_graph(size: usize) -> Graph {
    let mut graph = Graph::new("Bench");
    for i in 0..size {
        let from = format!("n{}", i);
        graph
            .add_relation(&from, &format!("n{}", (i + 1) % size), "Next")
            .unwrap();
        graph
            .add_relation(&from, &format!("n{}", (i + 2) % size), "Skip")
            .unwrap();
        if i % 3 == 0 {
            graph.add_properties(&from, &["Tagged", "Bench"]).unwrap();
        }
    }
    graph
}

/// Benchmark node and edge insertion throughput
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| criterion::black_box(build_graph(size)));
        });
    }
    group.finish();
}

/// Benchmark property intersection scan
fn bench_property_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("property_scan");

    for size in [100, 1000, 10_000].iter() {
        let graph = build_graph(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let nodes = graph.nodes_with_properties(&["Tagged", "Bench"]);
                criterion::black_box(nodes.len());
            });
        });
    }
    group.finish();
}

/// Benchmark relation lookup from a single node
fn bench_related_nodes(c: &mut Criterion) {
    let graph = build_graph(1000);

    c.bench_function("related_nodes", |b| {
        b.iter(|| {
            let related = graph.related_nodes("n500", "Next").unwrap();
            criterion::black_box(related.len());
        });
    });
}

/// Benchmark cascading node removal
fn bench_remove_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_node");

    for size in [100, 1000].iter() {
        let graph = build_graph(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || graph.clone(),
                |mut g| {
                    g.remove_nodes_with_property("Tagged");
                    criterion::black_box(g.node_count());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Benchmark text encode and decode
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let graph = build_graph(1000);
    let text = GraphCollection::encode(&graph).unwrap();

    group.bench_function("encode_1000", |b| {
        b.iter(|| criterion::black_box(GraphCollection::encode(&graph).unwrap().len()));
    });
    group.bench_function("decode_1000", |b| {
        b.iter(|| criterion::black_box(GraphCollection::decode(&text).unwrap().len()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insertion,
    bench_property_scan,
    bench_related_nodes,
    bench_remove_node,
    bench_codec
);
criterion_main!(benches);
