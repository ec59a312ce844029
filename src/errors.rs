use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not enough mood history ({actual} of {required} entries)")]
    InsufficientData { required: usize, actual: usize },
    #[error("Unavailable: {0}")]
    Unavailable(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Background analysis failed: {0}")]
    Background(String),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "MOOD-1001",
            Self::InsufficientData { .. } => "PAT-1001",
            Self::Unavailable(_) => "TXT-1001",
            Self::Timeout(_) => "GEN-1001",
            Self::Background(_) => "GEN-1000",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "A mood needs some text before it can be saved.",
            Self::InsufficientData { .. } => {
                "Log a few more moods so there is enough history to look for patterns."
            }
            Self::Unavailable(_) => {
                "Enhanced writing tools are not available on this device; the basic version was used."
            }
            Self::Timeout(_) => "The request took too long and was stopped.",
            Self::Background(_) => "The background analysis stopped unexpectedly.",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(PipelineError::InvalidInput("x".into()).code(), "MOOD-1001");
        assert_eq!(
            PipelineError::Timeout(Duration::from_secs(10)).code(),
            "GEN-1001"
        );
    }

    #[test]
    fn insufficient_data_message_mentions_counts() {
        let err = PipelineError::InsufficientData { required: 5, actual: 2 };
        assert_eq!(err.to_string(), "Not enough mood history (2 of 5 entries)");
    }
}
