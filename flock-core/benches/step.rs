use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flock_core::{BehaviorKind, Flock, StepConfig, Vector2D};
use rand::{rngs::StdRng, SeedableRng};

const CAPACITY: usize = 256;

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_step");
    let mut config = StepConfig::default();
    for kind in BehaviorKind::ALL {
        config.set_enabled(kind, true);
    }

    for count in [8usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            let mut rng = StdRng::seed_from_u64(42);
            let mut flock = Flock::<CAPACITY>::scatter(n, &mut rng).unwrap();
            flock.select_from_corners(Vector2D::new(-5.0, -5.0), Vector2D::new(5.0, 5.0));
            flock.issue_move_command(Vector2D::new(3.0, 2.0), false).unwrap();

            b.iter(|| {
                flock.step(black_box(&config)).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
