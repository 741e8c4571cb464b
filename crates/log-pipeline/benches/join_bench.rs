//! 해시 조인 벤치마크
//!
//! 중첩 스캔 조인의 입력 크기별 비용을 측정합니다.

use blockcmp_core::types::Record;
use blockcmp_log_pipeline::join::join_by_hash;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn records(count: usize, offset: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut r = Record::new();
            r.insert("hash", format!("{:064x}", i + offset));
            r.insert("txcount", "3");
            r.insert("blocktime", 120.5);
            r
        })
        .collect()
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_by_hash");

    for size in [10, 100, 250] {
        // 절반만 겹치도록 오른쪽을 밀어둠
        let left = records(size, 0);
        let right = records(size, size / 2);

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(left, right),
            |b, (left, right)| {
                b.iter(|| join_by_hash(black_box(left), black_box(right)).count());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_join);
criterion_main!(benches);
