//! Benchmarks for provinit core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use provinit::core::{initializer, parser, types};
use provinit::provenance::hasher;

fn bench_output_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_hash");
    for size_kb in [1, 64, 1024] {
        let output: String = "Initializing provider plugins...\n".repeat(size_kb * 32);
        group.bench_with_input(BenchmarkId::from_parameter(size_kb), &output, |b, output| {
            b.iter(|| black_box(hasher::hash_string(black_box(output))));
        });
    }
    group.finish();
}

fn bench_yaml_parse(c: &mut Criterion) {
    let yaml = r#"
version: "1.0"
working_dir: /workspaces/infra/aws_eks_terraform
command:
  program: terraform
  args: [init, -input=false, -upgrade]
event_log: state/events.jsonl
"#;
    c.bench_function("yaml_parse", |b| {
        b.iter(|| {
            let config = parser::parse_config(black_box(yaml)).unwrap();
            black_box(parser::validate_config(&config));
        });
    });
}

fn bench_format_report(c: &mut Criterion) {
    let result = types::ExecutionResult {
        stdout: "Terraform has been successfully initialized!\n".repeat(1500),
        stderr: String::new(),
        exit_code: 0,
    };
    c.bench_function("format_report_64k", |b| {
        b.iter(|| black_box(initializer::format_report(black_box(&result))));
    });
}

fn bench_run_stub(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let config = types::InitConfig {
        working_dir: dir.path().to_path_buf(),
        command: types::CommandSpec {
            program: "true".to_string(),
            args: vec![],
        },
        ..types::InitConfig::default()
    };
    c.bench_function("run_init_true", |b| {
        b.iter(|| black_box(initializer::run_init(&config).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_output_hash,
    bench_yaml_parse,
    bench_format_report,
    bench_run_stub
);
criterion_main!(benches);
