use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stream_sampler::reservoir::{CharSampler, ExactSampler, SkipSampler};
use stream_sampler::{Algorithm, JavaRandom, Utf8Chars};

const PATTERN: &str = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOGöäÄÜÖß";

fn bench_reservoir_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("reservoir");

    // The skip sampler should pull ahead once n >> k.
    let sizes = [10_000, 100_000, 1_000_000];
    let k = 10;

    for &size in &sizes {
        let stream: Vec<char> = PATTERN.chars().cycle().take(size).collect();

        group.bench_function(format!("exact_n{}_k{}", size, k), |b| {
            b.iter(|| {
                let mut sampler = ExactSampler::with_seed(k, 0).unwrap();
                for chunk in stream.chunks(1000) {
                    sampler.add_chunk(black_box(chunk));
                }
                black_box(sampler.samples());
            })
        });

        group.bench_function(format!("skip_n{}_k{}", size, k), |b| {
            b.iter(|| {
                let mut sampler = SkipSampler::with_seed(k, 0).unwrap();
                for chunk in stream.chunks(1000) {
                    sampler.add_chunk(black_box(chunk));
                }
                black_box(sampler.samples());
            })
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("utf8_stream");
    let input: String = PATTERN.chars().cycle().take(1_000_000).collect();

    for alg in [Algorithm::Exact, Algorithm::Skip] {
        group.bench_function(format!("{}_n1000000_k10", alg), |b| {
            b.iter(|| {
                let sample = alg
                    .run(
                        Utf8Chars::new(black_box(input.as_bytes())),
                        10,
                        JavaRandom::new(0),
                    )
                    .unwrap();
                black_box(sample);
            })
        });
    }
    group.finish();
}

fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("java_random");
    group.bench_function("next_long", |b| {
        let mut rng = JavaRandom::new(0);
        b.iter(|| black_box(rng.next_long()))
    });
    group.bench_function("next_int_10", |b| {
        let mut rng = JavaRandom::new(0);
        b.iter(|| black_box(rng.next_int(black_box(10))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_reservoir_sampling,
    bench_end_to_end,
    bench_generator
);
criterion_main!(benches);
