use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sentiknn::ml::classic::{DistanceMatrix, Label, LabeledExample, VectorStore};
use sentiknn::ml::evaluation::{EvaluationConfig, EvaluationRun};

fn random_examples(rng: &mut ChaCha20Rng, count: usize, dim: usize) -> Vec<LabeledExample> {
    (0..count)
        .map(|i| {
            let features = (0..dim).map(|_| rng.gen_range(0.0..3.0)).collect();
            LabeledExample::new(features, Label::ALL[i % Label::COUNT])
        })
        .collect()
}

fn bench_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    for &dim in &[50, 300] {
        let store = VectorStore::new(random_examples(&mut rng, 1000, dim)).unwrap();
        let queries = random_examples(&mut rng, 200, dim);

        group.bench_with_input(BenchmarkId::new("sequential", dim), &dim, |b, _| {
            b.iter(|| DistanceMatrix::compute(black_box(&queries), &store).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", dim), &dim, |b, _| {
            b.iter(|| DistanceMatrix::compute_parallel(black_box(&queries), &store).unwrap())
        });
    }
    group.finish();
}

fn bench_k_sweep(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let store = VectorStore::new(random_examples(&mut rng, 1000, 100)).unwrap();
    let queries = random_examples(&mut rng, 200, 100);

    let mut group = c.benchmark_group("k_sweep");
    for parallel in [false, true] {
        let config = EvaluationConfig::default()
            .with_seed(1)
            .with_parallel(parallel);
        let run = EvaluationRun::new(store.clone(), queries.clone(), config).unwrap();
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| b.iter(|| black_box(run.run().unwrap())));
    }
    group.finish();
}

criterion_group!(benches, bench_distance_matrix, bench_k_sweep);
criterion_main!(benches);
