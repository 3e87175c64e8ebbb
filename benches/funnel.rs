//! Funnel 聚合性能基准测试

use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use taplinker::services::funnel::{bucket_daily, conversion_rate, summarize};
use taplinker::storage::{EventType, RepTypeCount};

// ============== bucket_daily 基准测试 ==============

fn bench_bucket_daily(c: &mut Criterion) {
    let mut group = c.benchmark_group("funnel/bucket_daily");
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    // 30 天窗口内均匀分布的 tap
    for size in [100usize, 1_000, 10_000] {
        let step = Duration::seconds((30 * 86_400 / size) as i64);
        let timestamps: Vec<_> = (0..size).map(|i| start + step * i as i32).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &timestamps, |b, ts| {
            b.iter(|| bucket_daily(black_box(ts)));
        });
    }

    group.finish();
}

// ============== summarize 基准测试 ==============

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("funnel/summarize");

    let by_rep: Vec<RepTypeCount> = (1..=200)
        .flat_map(|rep_id| {
            [
                (EventType::Tap, 40),
                (EventType::View, 12),
                (EventType::Submit, 3),
                (EventType::ContactSave, 5),
            ]
            .into_iter()
            .map(move |(event_type, count)| RepTypeCount {
                rep_id,
                event_type,
                count,
            })
        })
        .collect();

    group.bench_function("200_reps", |b| {
        b.iter(|| summarize(black_box(&by_rep)));
    });

    group.bench_function("conversion_rate", |b| {
        b.iter(|| conversion_rate(black_box(37), black_box(1_204)));
    });

    group.finish();
}

criterion_group!(benches, bench_bucket_daily, bench_summarize);
criterion_main!(benches);
