//! Criterion benchmarks for the point-to-primitive kernel.
//! Cases: inside projection, outside (edges fallback), degenerate triangle.
//! Results: by default under target/criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use surfdist::geom3::{point_to_segment_distance, point_to_triangle_distance, Vec3};

fn random_points(n: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Vector3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            )
        })
        .collect()
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    let points = random_points(1024, 17);
    let cases: [(&str, [Vec3; 3]); 2] = [
        (
            "triangle",
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
        ),
        (
            "degenerate",
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
            ],
        ),
    ];
    for (name, tri) in cases {
        group.bench_with_input(BenchmarkId::new("point_to_triangle", name), &tri, |b, tri| {
            b.iter(|| {
                let mut acc = 0.0;
                for p in &points {
                    acc += point_to_triangle_distance(*p, tri).0;
                }
                black_box(acc)
            })
        });
    }
    group.bench_function("point_to_segment", |b| {
        let (a, e) = (Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0));
        b.iter(|| {
            let mut acc = 0.0;
            for p in &points {
                acc += point_to_segment_distance(*p, a, e).0;
            }
            black_box(acc)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
