//! Benchmarks for layout generation and ranked sweeps.
//!
//! Run with: cargo bench -p tinyhouse-logic

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinyhouse_logic::analytics::compute_analytics;
use tinyhouse_logic::batch::{run_batch, BatchConfig, RankMode, SeedPlan};
use tinyhouse_logic::layout::generate_layout;
use tinyhouse_logic::params::DesignParameters;
use tinyhouse_logic::site::{Climate, SiteContext, Vegetation};
use tinyhouse_logic::tables::AnalyticsTables;

fn temperate_site() -> SiteContext {
    SiteContext::new(
        Some(Climate {
            temperature: 17.0,
            precipitation: 820.0,
            wind: 6.5,
            humidity: 68.0,
            vegetation: Vegetation::Moderate,
            degree_days: 3800,
        }),
        None,
    )
}

fn bench_single_design(c: &mut Criterion) {
    let params = DesignParameters::default();
    let tables = AnalyticsTables::default();
    let site = temperate_site();

    c.bench_function("generate_layout", |b| {
        b.iter(|| black_box(generate_layout(black_box(42), &params)))
    });

    let design = generate_layout(42, &params);
    c.bench_function("compute_analytics", |b| {
        b.iter(|| black_box(compute_analytics(&design, Some(&site), &tables)))
    });
}

fn bench_ranked_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranked_sweep");
    group.sample_size(20);

    let params = DesignParameters::default();
    let tables = AnalyticsTables::default();
    let site = temperate_site();

    for count in [100, 1_000] {
        let config = BatchConfig {
            count,
            rank: RankMode::On { retain: 4 },
            seeds: SeedPlan::Sequence { base: 7 },
        };
        group.bench_with_input(BenchmarkId::new("top4", count), &config, |b, config| {
            b.iter(|| {
                let result = run_batch(&params, Some(&site), &tables, config);
                black_box(result.best_score)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_design, bench_ranked_sweep);
criterion_main!(benches);
