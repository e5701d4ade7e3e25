//! Reservoir sampling over character streams.
//!
//! Maintains a uniform sample of `k` characters from a stream of unknown length
//! in one pass, with memory bounded by `k`.
//!
//! Two algorithms share one entry contract:
//! - [`ExactSampler`]: the classic algorithm. Every character past the first `k`
//!   costs one random draw.
//! - [`SkipSampler`]: identical up to `4k` characters, then draws a geometric
//!   *skip distance* and jumps straight to the next character that will be
//!   written, so the number of draws grows like O(k * log(n/k)) instead of O(n).
//!
//! Both are driven by a seeded [`JavaRandom`], so a seed and an input pin the
//! output exactly, independent of how the input is chunked.
//!
//! ## References
//!
//! - Vitter (1985): reservoir sampling "Algorithm R".
//! - Erlandson (2015): fast approximate reservoir sampling via skip distances.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::SampleError;
use crate::random::JavaRandom;
use crate::source::{CharSource, DEFAULT_CHUNK_CHARS};

/// Stream position, as a multiple of `k`, at which [`SkipSampler`] stops
/// evaluating characters one by one.
pub const SKIP_THRESHOLD_FACTOR: u64 = 4;

/// Largest supported sample size (the generator's bound range).
pub const MAX_SAMPLE_SIZE: usize = i32::MAX as usize;

fn check_sample_size(k: usize) -> Result<usize, SampleError> {
    if k == 0 {
        return Err(SampleError::invalid("Sample size must be positive"));
    }
    if k > MAX_SAMPLE_SIZE {
        return Err(SampleError::invalid(format!(
            "Sample size must be at most {MAX_SAMPLE_SIZE} (got {k})"
        )));
    }
    Ok(k)
}

/// Slot for the character at zero-based stream position `seen`, or `None` to discard it.
///
/// The signed remainder is taken before the absolute value; this fixes the
/// acceptance curve that seeded output depends on.
#[inline]
fn draw_slot(rng: &mut JavaRandom, seen: u64, k: usize) -> Option<usize> {
    let pos = (rng.next_long() % (seen as i64 + 1)).unsigned_abs();
    (pos < k as u64).then_some(pos as usize)
}

/// Final state of a sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    chars: Vec<char>,
    seen: u64,
}

impl Sample {
    /// Sampled characters, `min(k, seen)` of them, in reservoir order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters the source produced.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Number of sampled characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the source produced nothing.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Take the sampled characters.
    pub fn into_chars(self) -> Vec<char> {
        self.chars
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|&c| f.write_char(c))
    }
}

impl From<Sample> for String {
    fn from(sample: Sample) -> Self {
        sample.chars.into_iter().collect()
    }
}

/// A single-pass character sampler.
pub trait CharSampler {
    /// Requested sample size `k`.
    fn capacity(&self) -> usize;

    /// Characters observed so far, skipped ones included.
    fn seen(&self) -> u64;

    /// Current reservoir contents (`min(k, seen)` characters).
    ///
    /// Valid at any point, so an embedder can report a partial sample.
    fn samples(&self) -> &[char];

    /// Feed one buffered chunk of the stream.
    fn add_chunk(&mut self, chunk: &[char]);

    /// Feed a single character.
    #[inline]
    fn add(&mut self, ch: char) {
        self.add_chunk(std::slice::from_ref(&ch));
    }

    fn into_sample(self) -> Sample
    where
        Self: Sized;
}

/// Pull `source` to exhaustion through `sampler`.
///
/// A read failure aborts the run; the partial reservoir is dropped.
#[tracing::instrument(level = "debug", skip_all, fields(k = sampler.capacity()))]
pub fn drain<T, S>(mut sampler: T, mut source: S) -> Result<Sample, SampleError>
where
    T: CharSampler,
    S: CharSource,
{
    let mut buf = vec!['\0'; DEFAULT_CHUNK_CHARS];
    loop {
        let n = source.read_chars(&mut buf)?;
        if n == 0 {
            break;
        }
        sampler.add_chunk(&buf[..n]);
    }
    tracing::debug!(seen = sampler.seen(), "source exhausted");
    Ok(sampler.into_sample())
}

/// Exact reservoir sampler (Algorithm R).
///
/// After `n >= k` characters, each of them is in the reservoir with probability `k / n`.
#[derive(Debug, Clone)]
pub struct ExactSampler {
    k: usize,
    seen: u64,
    reservoir: Vec<char>,
    rng: JavaRandom,
}

impl ExactSampler {
    /// Sampler of size `k` seeded from entropy.
    pub fn new(k: usize) -> Result<Self, SampleError> {
        Self::with_rng(k, JavaRandom::from_entropy())
    }

    /// Sampler of size `k` with a reproducible seed.
    pub fn with_seed(k: usize, seed: i64) -> Result<Self, SampleError> {
        Self::with_rng(k, JavaRandom::new(seed))
    }

    /// Sampler of size `k` driven by a caller-supplied generator.
    pub fn with_rng(k: usize, rng: JavaRandom) -> Result<Self, SampleError> {
        let k = check_sample_size(k)?;
        Ok(Self {
            k,
            seen: 0,
            reservoir: Vec::with_capacity(k.min(DEFAULT_CHUNK_CHARS)),
            rng,
        })
    }
}

impl CharSampler for ExactSampler {
    fn capacity(&self) -> usize {
        self.k
    }

    fn seen(&self) -> u64 {
        self.seen
    }

    fn samples(&self) -> &[char] {
        &self.reservoir
    }

    fn add_chunk(&mut self, chunk: &[char]) {
        for &ch in chunk {
            if self.reservoir.len() < self.k {
                self.reservoir.push(ch);
            } else if let Some(slot) = draw_slot(&mut self.rng, self.seen, self.k) {
                self.reservoir[slot] = ch;
            }
            self.seen += 1;
        }
    }

    fn into_sample(self) -> Sample {
        Sample {
            chars: self.reservoir,
            seen: self.seen,
        }
    }
}

/// Where a [`SkipSampler`] is in its one-directional progression.
///
/// `Filling -> ExactEvaluation -> SkipPending`, after which the sampler cycles
/// `SkipPending -> Skipping(_) -> ReplaceDue -> SkipPending` until the stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than `k` characters seen; each goes straight into the reservoir.
    Filling,
    /// Below the threshold; each character gets its own draw.
    ExactEvaluation,
    /// The next character draws a skip distance.
    SkipPending,
    /// This many upcoming characters are bypassed without evaluation.
    Skipping(u64),
    /// The next character overwrites a uniformly chosen slot.
    ReplaceDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Pending,
    Bypass(u64),
    ReplaceDue,
}

impl Skip {
    #[inline]
    fn remaining(n: u64) -> Self {
        if n == 0 {
            Skip::ReplaceDue
        } else {
            Skip::Bypass(n)
        }
    }
}

/// Skip-optimized approximate reservoir sampler.
///
/// Below `4k` characters this behaves exactly like [`ExactSampler`] (and draws
/// the same numbers). From there on, rather than a draw per character, it draws
/// how far away the next written character is:
///
/// `d = floor(ln(r) / ln(1 - k / seen))`, `r` uniform in `[0, 1)`
///
/// counted from the character that made the draw. The character `max(d, 1)`
/// positions later overwrites a uniformly chosen slot; everything in between
/// only advances the count. The distance carries across chunk boundaries.
#[derive(Debug, Clone)]
pub struct SkipSampler {
    k: usize,
    threshold: u64,
    seen: u64,
    reservoir: Vec<char>,
    rng: JavaRandom,
    skip: Skip,
}

impl SkipSampler {
    /// Sampler of size `k` seeded from entropy.
    pub fn new(k: usize) -> Result<Self, SampleError> {
        Self::with_rng(k, JavaRandom::from_entropy())
    }

    /// Sampler of size `k` with a reproducible seed.
    pub fn with_seed(k: usize, seed: i64) -> Result<Self, SampleError> {
        Self::with_rng(k, JavaRandom::new(seed))
    }

    /// Sampler of size `k` driven by a caller-supplied generator.
    pub fn with_rng(k: usize, rng: JavaRandom) -> Result<Self, SampleError> {
        let k = check_sample_size(k)?;
        Ok(Self {
            k,
            threshold: SKIP_THRESHOLD_FACTOR * k as u64,
            seen: 0,
            reservoir: Vec::with_capacity(k.min(DEFAULT_CHUNK_CHARS)),
            rng,
            skip: Skip::Pending,
        })
    }

    /// Stream position at which skip-distance evaluation starts.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Current position in the fill / exact / skip progression.
    pub fn phase(&self) -> Phase {
        if self.seen < self.k as u64 {
            Phase::Filling
        } else if self.seen < self.threshold {
            Phase::ExactEvaluation
        } else {
            match self.skip {
                Skip::Pending => Phase::SkipPending,
                Skip::Bypass(n) => Phase::Skipping(n),
                Skip::ReplaceDue => Phase::ReplaceDue,
            }
        }
    }

    /// Draw the distance to the next written character. The drawing character
    /// itself is never written.
    fn draw_skip(&mut self) -> Skip {
        let p = self.k as f64 / self.seen as f64;
        let r = self.rng.next_double();
        if r == 0.0 {
            return Skip::ReplaceDue;
        }
        // Non-negative: both logarithms are negative. `as` saturates.
        let distance = (r.ln() / (1.0 - p).ln()).floor() as u64;
        tracing::trace!(seen = self.seen, distance, "drew skip distance");
        Skip::remaining(distance.saturating_sub(1))
    }
}

impl CharSampler for SkipSampler {
    fn capacity(&self) -> usize {
        self.k
    }

    fn seen(&self) -> u64 {
        self.seen
    }

    fn samples(&self) -> &[char] {
        &self.reservoir
    }

    fn add_chunk(&mut self, chunk: &[char]) {
        let mut i = 0;
        while i < chunk.len() {
            let ch = chunk[i];
            i += 1;

            if self.reservoir.len() < self.k {
                self.reservoir.push(ch);
            } else if self.seen < self.threshold {
                if let Some(slot) = draw_slot(&mut self.rng, self.seen, self.k) {
                    self.reservoir[slot] = ch;
                }
                if self.seen + 1 == self.threshold {
                    tracing::debug!(
                        threshold = self.threshold,
                        "switching to skip-distance evaluation"
                    );
                }
            } else {
                self.skip = match self.skip {
                    Skip::Pending => self.draw_skip(),
                    Skip::ReplaceDue => {
                        let slot = self.rng.next_int(self.k as i32) as usize;
                        self.reservoir[slot] = ch;
                        Skip::Pending
                    }
                    Skip::Bypass(n) => Skip::remaining(n - 1),
                };

                // Bypass as much of the pending distance as this chunk holds.
                if let Skip::Bypass(n) = self.skip {
                    let bypass = n.min((chunk.len() - i) as u64);
                    i += bypass as usize;
                    self.seen += bypass;
                    self.skip = Skip::remaining(n - bypass);
                }
            }
            self.seen += 1;
        }
    }

    fn into_sample(self) -> Sample {
        Sample {
            chars: self.reservoir,
            seen: self.seen,
        }
    }
}

/// Sampling algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    Exact,
    #[default]
    Skip,
}

impl Algorithm {
    /// Run this algorithm over `source` with a caller-supplied generator.
    pub fn run<S: CharSource>(
        self,
        source: S,
        k: usize,
        rng: JavaRandom,
    ) -> Result<Sample, SampleError> {
        match self {
            Algorithm::Exact => exact_sample_with_rng(source, k, rng),
            Algorithm::Skip => skip_sample_with_rng(source, k, rng),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Exact => "exact",
            Algorithm::Skip => "skip",
        })
    }
}

impl FromStr for Algorithm {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Algorithm::Exact),
            "skip" => Ok(Algorithm::Skip),
            other => Err(SampleError::invalid(format!(
                "unknown algorithm {other:?} (expected \"exact\" or \"skip\")"
            ))),
        }
    }
}

/// Sample `k` characters from `source` with the exact algorithm.
///
/// `k` is validated before the source is touched.
pub fn exact_sample<S: CharSource>(source: S, k: usize) -> Result<String, SampleError> {
    Ok(drain(ExactSampler::new(k)?, source)?.into())
}

/// [`exact_sample`] with a caller-supplied generator, returning the count as well.
pub fn exact_sample_with_rng<S: CharSource>(
    source: S,
    k: usize,
    rng: JavaRandom,
) -> Result<Sample, SampleError> {
    drain(ExactSampler::with_rng(k, rng)?, source)
}

/// Sample `k` characters from `source` with the skip-optimized algorithm.
///
/// `k` is validated before the source is touched.
pub fn skip_sample<S: CharSource>(source: S, k: usize) -> Result<String, SampleError> {
    Ok(drain(SkipSampler::new(k)?, source)?.into())
}

/// [`skip_sample`] with a caller-supplied generator, returning the count as well.
pub fn skip_sample_with_rng<S: CharSource>(
    source: S,
    k: usize,
    rng: JavaRandom,
) -> Result<Sample, SampleError> {
    drain(SkipSampler::with_rng(k, rng)?, source)
}
