//! Evaluation benchmarks
//!
//! Benchmarks: word segmentation, rule evaluation over an identifier batch,
//! and a full lint over generated Python and Rust sources.
//! Run with: cargo bench --bench evaluation_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use identifier_lint::{
    AnalysisOptions, EnglishSegmenter, FrequencySegmenter, NamingValidator, RuleEvaluator,
};
use std::fs;
use tempfile::TempDir;

const SAMPLE_IDENTIFIERS: [&str; 12] = [
    "userName",
    "totalcount",
    "total_count",
    "MAX_RETRY_COUNT",
    "x1",
    "__private_value__",
    "parseHTTPResponse",
    "fortyTwo",
    "customer_account_balance_total",
    "tmp",
    "retryCount",
    "maxvalue",
];

fn segmentation(c: &mut Criterion) {
    let segmenter = FrequencySegmenter::embedded();

    let mut group = c.benchmark_group("segmentation");
    for text in ["totalcount", "maxretrycount", "customeraccountbalance"] {
        group.bench_with_input(BenchmarkId::new("split", text), text, |b, text| {
            b.iter(|| segmenter.split(black_box(text)));
        });
    }
    group.finish();
}

fn evaluation(c: &mut Criterion) {
    let evaluator = RuleEvaluator::with_defaults();

    c.bench_function("evaluate_batch", |b| {
        b.iter(|| {
            for identifier in SAMPLE_IDENTIFIERS {
                let _ = evaluator.evaluate(black_box(identifier));
            }
        });
    });
}

fn full_lint(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    for idx in 0..50 {
        fs::write(
            temp_dir.path().join(format!("module_{idx}.py")),
            format!(
                "def process_{idx}(items):\n    totalCount = 0\n    for item in items:\n        totalCount += len(item)\n    return totalCount\n"
            ),
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(format!("module_{idx}.rs")),
            format!("pub fn compute_{idx}(max_value: u32) -> u32 {{\n    max_value * {idx}\n}}\n"),
        )
        .unwrap();
    }

    let validator = NamingValidator::new().unwrap();

    let mut group = c.benchmark_group("full_lint");
    group.sample_size(20);
    for parallel in [false, true] {
        let options = AnalysisOptions { parallel, ..Default::default() };
        group.bench_with_input(
            BenchmarkId::new("lint_100_files", if parallel { "parallel" } else { "sequential" }),
            &options,
            |b, options| {
                b.iter(|| validator.lint_directory(temp_dir.path(), options).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, segmentation, evaluation, full_lint);
criterion_main!(benches);
