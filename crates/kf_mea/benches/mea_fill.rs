use std::hint::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use kf_mea::MeaConfig;
use kf_mea::MeaFold;

/// Sparse symmetric probability matrix with a handful of plausible
/// helices, seeded for reproducible runs.
fn random_bpps(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Array2::from_elem((n, n), 0.0);
    for i in 0..n {
        for j in i + 4..n {
            if rng.random::<f64>() < 0.05 {
                let p = rng.random::<f64>();
                m[(i, j)] = p;
                m[(j, i)] = p;
            }
        }
    }
    m
}

fn bench_mea_fill(c: &mut Criterion) {
    for n in [50, 100, 200] {
        let bpps = random_bpps(n, 42);
        c.bench_function(&format!("mea_fill_len{}", n), |b| {
            b.iter(|| {
                let fold = MeaFold::new(black_box(&bpps), MeaConfig::default()).unwrap();
                black_box(fold.pairs())
            })
        });
    }
}

criterion_group!(benches, bench_mea_fill);
criterion_main!(benches);
