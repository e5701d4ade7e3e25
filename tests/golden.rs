//! Seeded reference vectors. Any drift here means the generator, the slot
//! arithmetic or the skip threshold changed.

use std::io::BufReader;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stream_sampler::{exact_sample, skip_sample, Algorithm, JavaRandom, Sample, Utf8Chars};

const PATTERN: &str = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOGöäÄÜÖß";

/// `PATTERN` repeated cyclically, cut off after `n` characters.
fn pattern_stream(n: usize) -> String {
    PATTERN.chars().cycle().take(n).collect()
}

fn seeded(alg: Algorithm, n: usize) -> Sample {
    let input = pattern_stream(n);
    alg.run(Utf8Chars::new(input.as_bytes()), 10, JavaRandom::new(0))
        .expect("sampling succeeds")
}

/// Random uppercase letters, one byte each.
fn random_letters(seed: u64, n: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(b'A'..=b'Z')).collect()
}

#[test]
fn exact_short_stream() {
    let sample = seeded(Algorithm::Exact, 100);
    assert_eq!(sample.to_string(), "FHVBYRßFOX");
    assert_eq!(sample.seen(), 100);
}

#[test]
fn exact_long_stream() {
    let sample = seeded(Algorithm::Exact, 1_000_000);
    assert_eq!(sample.to_string(), "BXVÜHÖEHGX");
    assert_eq!(sample.seen(), 1_000_000);
}

#[test]
fn skip_short_stream() {
    let sample = seeded(Algorithm::Skip, 100);
    assert_eq!(sample.to_string(), "DNGGYTDäOE");
    assert_eq!(sample.seen(), 100);
}

#[test]
fn skip_long_stream() {
    let sample = seeded(Algorithm::Skip, 1_000_000);
    assert_eq!(sample.to_string(), "HTKLöOöQVE");
    assert_eq!(sample.seen(), 1_000_000);
}

#[test]
fn skip_long_stream_through_tiny_reads() {
    // Multi-byte characters split across 3-byte reads still decode and count once.
    let input = pattern_stream(1_000_000);
    let reader = BufReader::with_capacity(3, input.as_bytes());
    let sample = Algorithm::Skip
        .run(Utf8Chars::from_buf_read(reader), 10, JavaRandom::new(0))
        .unwrap();
    assert_eq!(sample.to_string(), "HTKLöOöQVE");
}

#[test]
fn unseeded_sample_has_requested_size() {
    let input = random_letters(0, 20);
    let got = exact_sample(Utf8Chars::new(&input[..]), 10).unwrap();
    assert_eq!(got.chars().count(), 10);
    let got = skip_sample(Utf8Chars::new(&input[..]), 10).unwrap();
    assert_eq!(got.chars().count(), 10);
    assert!(got.chars().all(|c| c.is_ascii_uppercase()));
}

#[test]
fn full_pattern_is_captured_when_k_exceeds_stream() {
    let k = PATTERN.chars().count() + 10;
    for alg in [Algorithm::Exact, Algorithm::Skip] {
        let sample = alg
            .run(Utf8Chars::new(PATTERN.as_bytes()), k, JavaRandom::from_entropy())
            .unwrap();
        assert_eq!(sample.to_string(), PATTERN);
    }
}

#[test]
#[ignore = "slow: wall-clock comparison over 10M characters"]
fn skip_is_faster_than_exact_on_large_streams() {
    let input = random_letters(7, 10_000_000);
    let time = |alg: Algorithm| {
        let start = Instant::now();
        for _ in 0..5 {
            alg.run(Utf8Chars::new(&input[..]), 10, JavaRandom::new(0))
                .unwrap();
        }
        start.elapsed()
    };

    let exact = time(Algorithm::Exact);
    let skip = time(Algorithm::Skip);
    assert!(
        skip < exact,
        "skip sampler ({skip:?}) should beat exact sampler ({exact:?})"
    );
}
