//! 扩展Cuckoo哈希表性能基准测试

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, PlotConfiguration, Throughput};

use extendible_cuckoo::{
    batch_insert, batch_lookup, DisabledStatsRecorder, ExtendibleCuckooConfig, ExtendibleCuckooTable, Key,
    OverflowPolicy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

// 基准测试配置
const SEED: u64 = 42;
const ITEM_COUNTS: [usize; 3] = [10_000, 100_000, 1_000_000];
const BUCKET_CAPACITIES: [usize; 3] = [1, 4, 16];

/// 生成随机键
fn generate_keys(count: usize) -> Vec<Key> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count).map(|_| rng.gen()).collect()
}

fn create_table(bucket_capacity: usize, policy: OverflowPolicy) -> ExtendibleCuckooTable {
    let config = ExtendibleCuckooConfig {
        bucket_capacity,
        overflow_policy: policy,
        ..ExtendibleCuckooConfig::default()
    };
    // 基准测试不计统计开销
    ExtendibleCuckooTable::with_recorder(config, Arc::new(DisabledStatsRecorder::default()))
        .expect("配置有效")
}

/// 插入操作基准测试
fn bench_insert(c: &mut Criterion) {
    let plot_config = PlotConfiguration::default().summary_scale(criterion::AxisScale::Logarithmic);
    let mut group = c.benchmark_group("Insert");
    group.plot_config(plot_config);
    group.sample_size(10);

    for &count in ITEM_COUNTS.iter() {
        let keys = generate_keys(count);
        group.throughput(Throughput::Elements(count as u64));

        for policy in [OverflowPolicy::SplitFirst, OverflowPolicy::DisplaceFirst] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", policy), count),
                &keys,
                |b, keys| {
                    b.iter_batched(
                        || create_table(4, policy),
                        |mut table| {
                            for &key in keys {
                                table.insert(key);
                            }
                            table
                        },
                        criterion::BatchSize::PerIteration,
                    );
                },
            );
        }
    }
    group.finish();
}

/// 查询操作基准测试
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("Lookup");
    let count = 100_000;
    let keys = generate_keys(count);

    for &capacity in BUCKET_CAPACITIES.iter() {
        let mut table = create_table(capacity, OverflowPolicy::SplitFirst);
        batch_insert(&mut table, keys.iter().copied()).expect("容量充足");

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &keys, |b, keys| {
            b.iter(|| {
                for &key in keys {
                    criterion::black_box(table.lookup(key));
                }
            });
        });
    }
    group.finish();
}

/// 混合负载基准测试：插入后删除一半再查询
fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mixed");
    let keys = generate_keys(50_000);
    group.throughput(Throughput::Elements(keys.len() as u64 * 3));

    group.bench_function("insert_remove_lookup", |b| {
        b.iter_batched(
            || create_table(4, OverflowPolicy::SplitFirst),
            |mut table| {
                batch_insert(&mut table, keys.iter().copied()).expect("容量充足");
                for &key in keys.iter().step_by(2) {
                    table.remove(key);
                }
                criterion::black_box(batch_lookup(&table, keys.iter().copied()));
                table
            },
            criterion::BatchSize::PerIteration,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_mixed);
criterion_main!(benches);
