use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use series_core::spline::bezier_segments;
use series_core::SplineType;

fn gen_xy(n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let ys = xs.iter().map(|x| (x * 0.01).sin() * 10.0 + x * 0.0001).collect();
    (xs, ys)
}

fn bench_splines(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline");
    let (xs, ys) = gen_xy(50_000);
    for spline_type in [SplineType::Natural, SplineType::Monotonic, SplineType::Cardinal, SplineType::Clamped] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{spline_type:?}")), &spline_type, |b, &t| {
            b.iter(|| black_box(bezier_segments(&xs, &ys, t)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_splines);
criterion_main!(benches);
