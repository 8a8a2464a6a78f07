//! # Civic-Ledger Benchmarks
//!
//! | Operation | Expected cost |
//! |-----------|---------------|
//! | `submit` | one signature + one append |
//! | `verify_full` | O(N) pages, one signature check each |
//! | `verify_from_checkpoint` | O(pages after the checkpoint) |
//! | `roll_up` | O(new children) |

use cl_02_page_ledger::test_utils::TestLedger;
use cl_03_hierarchical_aggregation::{
    AggregationConfig, AggregationService, HierarchicalAggregationApi, Level,
};
use cl_04_integrity_verification::{CheckpointId, IntegrityVerificationApi, IntegrityVerifier};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cl-02-submit");
    group.measurement_time(Duration::from_secs(5));

    let fixture = TestLedger::new();
    group.throughput(Throughput::Elements(1));
    group.bench_function("founder_signed", |b| {
        b.iter(|| black_box(fixture.submit_founder("vote_cast", "bench")))
    });
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("cl-04-verify");
    group.sample_size(20);

    for pages in [100usize, 1_000] {
        let fixture = TestLedger::with_pages(pages);
        let aggregator = Arc::new(
            AggregationService::in_memory(
                fixture.ledger.clone(),
                AggregationConfig::default(),
                fixture.clock.clone(),
            )
            .expect("aggregator"),
        );
        aggregator.roll_up().expect("roll-up");
        let verifier = IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone())
            .with_aggregates(aggregator.clone());

        group.throughput(Throughput::Elements(pages as u64));
        group.bench_with_input(BenchmarkId::new("full", pages), &pages, |b, _| {
            b.iter(|| black_box(verifier.verify_full()))
        });

        let last_chapter = aggregator.aggregates(Level::Chapter).len() as u64 - 1;
        group.bench_with_input(
            BenchmarkId::new("from_last_chapter", pages),
            &pages,
            |b, _| {
                b.iter(|| {
                    black_box(
                        verifier
                            .verify_from_checkpoint(CheckpointId::new(Level::Chapter, last_chapter)),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_roll_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("cl-03-roll-up");
    group.sample_size(20);

    let fixture = TestLedger::with_pages(1_024);
    group.bench_function("fresh_1024_pages", |b| {
        b.iter(|| {
            let aggregator = AggregationService::in_memory(
                fixture.ledger.clone(),
                AggregationConfig::default(),
                fixture.clock.clone(),
            )
            .expect("aggregator");
            black_box(aggregator.roll_up().expect("roll-up"))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_submit, bench_verify, bench_roll_up);
criterion_main!(benches);
