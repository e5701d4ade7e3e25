//! `stream-sampler`: uniform character samples from streams of unknown length.
//!
//! Draws a fixed-size reservoir of characters from a text stream in a single
//! pass, using memory bounded by the sample size.
//!
//! Exposed modules:
//! - `reservoir`: exact reservoir sampling + the skip-distance approximation.
//! - `random`: the seeded generator both algorithms draw from.
//! - `source`: decoded-character sources, including a UTF-8 reader adapter.
//! - `cli`: the `stream-sampler` command-line front end.
//!
//! ```
//! use stream_sampler::{skip_sample_with_rng, JavaRandom};
//!
//! let text = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG".repeat(100);
//! let sample = skip_sample_with_rng(text.chars(), 10, JavaRandom::new(0)).unwrap();
//! assert_eq!(sample.len(), 10);
//! assert_eq!(sample.seen(), 3500);
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod random;
pub mod reservoir;
pub mod source;

pub use error::SampleError;
pub use random::JavaRandom;
pub use reservoir::{
    drain, exact_sample, exact_sample_with_rng, skip_sample, skip_sample_with_rng, Algorithm,
    CharSampler, ExactSampler, Phase, Sample, SkipSampler,
};
pub use source::{CharIter, CharSource, Utf8Chars};
