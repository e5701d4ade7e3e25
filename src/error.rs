//! Errors surfaced by sampling runs.

use std::io;

/// Errors for stream sampling.
#[derive(Debug)]
pub enum SampleError {
    /// The requested sample size is out of range, or could not be parsed.
    InvalidArgument(String),
    /// The character source failed; the partial sample is discarded.
    SourceRead(io::Error),
}

impl SampleError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => f.write_str(msg),
            Self::SourceRead(_) => f.write_str("failed to read from source"),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::SourceRead(e) => Some(e),
        }
    }
}

impl From<io::Error> for SampleError {
    fn from(e: io::Error) -> Self {
        Self::SourceRead(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn read_failure_keeps_cause() {
        let err = SampleError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "failed to read from source");
        let cause = err.source().expect("io cause");
        assert_eq!(cause.to_string(), "pipe closed");
    }

    #[test]
    fn invalid_argument_is_its_message() {
        let err = SampleError::invalid("Sample size must be positive");
        assert_eq!(err.to_string(), "Sample size must be positive");
        assert!(err.source().is_none());
    }
}
