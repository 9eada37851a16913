use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use groupcast::{
    sink_fn, Channel, ChannelLayer, DistributedLayer, InMemoryGroupStore, LocalLayer, Payload,
    SharedSink,
};
use tokio::runtime::Runtime;

fn noop_sink() -> SharedSink {
    sink_fn(|payload| async move {
        black_box(payload);
        Ok(())
    })
}

fn bench_local_group_send(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("local_group_send");

    for members in [1usize, 10, 100, 1000] {
        let layer = LocalLayer::default();
        rt.block_on(async {
            for _ in 0..members {
                layer
                    .add("room", &Channel::anonymous(Some(noop_sink())))
                    .await
                    .unwrap();
            }
        });

        group.bench_with_input(BenchmarkId::from_parameter(members), &members, |b, _| {
            b.to_async(&rt).iter(|| async {
                layer
                    .group_send("room", black_box(Payload::from("x")))
                    .await
                    .unwrap();
            })
        });
    }
    group.finish();
}

fn bench_local_join_leave(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let layer = LocalLayer::default();
    let ch = Channel::anonymous(Some(noop_sink()));

    c.bench_function("local_join_leave", |b| {
        b.to_async(&rt).iter(|| async {
            layer.add("room", &ch).await.unwrap();
            layer.remove("room", &ch).await.unwrap();
        })
    });
}

fn bench_memory_group_send(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let layer = DistributedLayer::with_sink(InMemoryGroupStore::new(), "group", noop_sink()).unwrap();
    rt.block_on(async {
        for i in 0..100 {
            layer
                .add_named("room", &format!("c{i}"), None)
                .await
                .unwrap();
        }
    });

    c.bench_function("memory_group_send_100", |b| {
        b.to_async(&rt).iter(|| async {
            layer
                .group_send("room", black_box(Payload::from("x")))
                .await
                .unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_local_group_send,
    bench_local_join_leave,
    bench_memory_group_send
);
criterion_main!(benches);
