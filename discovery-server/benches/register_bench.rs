use criterion::{Criterion, criterion_group, criterion_main};
use discovery_server::{
    ClusterCreateOpts, ClusterManager, DefaultManager, JsonSerializer, MemoryStore,
    MsgPackSerializer, Node, Serializer,
};
use std::hint::black_box;
use std::sync::Arc;

fn manager(serializer: Arc<dyn Serializer>) -> DefaultManager {
    DefaultManager::new(Arc::new(MemoryStore::new()), serializer)
}

fn bench_create(c: &mut Criterion) {
    let manager = manager(Arc::new(JsonSerializer));

    c.bench_function("cluster_create", |b| {
        b.iter(|| {
            manager.create(black_box(ClusterCreateOpts::default())).unwrap();
        });
    });
}

fn bench_get(c: &mut Criterion) {
    let manager = manager(Arc::new(JsonSerializer));
    let cluster = manager.create(ClusterCreateOpts::default()).unwrap();
    for i in 0..5 {
        let node = Node::new(format!("n{i}"), format!("node-{i}"), format!("10.0.0.{i}:5705"));
        manager.register_node(&cluster.id, node).unwrap();
    }

    c.bench_function("cluster_get", |b| {
        b.iter(|| {
            manager.get(black_box(&cluster.id)).unwrap();
        });
    });
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_node");

    let serializers: [(&str, Arc<dyn Serializer>); 2] = [
        ("json", Arc::new(JsonSerializer)),
        ("msgpack", Arc::new(MsgPackSerializer)),
    ];

    for (name, serializer) in serializers {
        let manager = manager(serializer);
        group.bench_function(name, |b| {
            b.iter_batched(
                || manager.create(ClusterCreateOpts::default()).unwrap(),
                |cluster| {
                    for i in 0..3 {
                        let node =
                            Node::new(format!("n{i}"), format!("node-{i}"), format!("10.0.0.{i}"));
                        manager.register_node(&cluster.id, black_box(node)).unwrap();
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_get, bench_register);
criterion_main!(benches);
