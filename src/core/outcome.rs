use thiserror::Error;
use validator::Validate;

use crate::models::{ContentProfile, ReporterProfile};

/// Why a generation stage fell back to its safe default
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Invalid reporter: {0}")]
    InvalidReporter(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

/// Result of a fail-soft generation stage
///
/// Stages never propagate errors. A failed stage still yields a usable value
/// (empty tags, zero score, canned draft text), tagged with the cause.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    Fresh(T),
    Fallback { value: T, cause: GenerationError },
}

impl<T> Generated<T> {
    pub fn value(&self) -> &T {
        match self {
            Generated::Fresh(value) => value,
            Generated::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Generated::Fresh(value) => value,
            Generated::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback { .. })
    }

    pub fn cause(&self) -> Option<&GenerationError> {
        match self {
            Generated::Fresh(_) => None,
            Generated::Fallback { cause, .. } => Some(cause),
        }
    }

    /// Run a fallible stage body, substituting `fallback` on error
    pub(crate) fn or_fallback<F>(result: Result<T, GenerationError>, fallback: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(value) => Generated::Fresh(value),
            Err(cause) => Generated::Fallback { value: fallback(), cause },
        }
    }
}

pub(crate) fn check_reporter(reporter: &ReporterProfile) -> Result<(), GenerationError> {
    reporter.validate().map_err(|e| {
        GenerationError::InvalidReporter(format!("reporter '{}': {}", reporter.id, e))
    })
}

pub(crate) fn check_content(content: &ContentProfile) -> Result<(), GenerationError> {
    content.validate().map_err(|e| {
        GenerationError::InvalidContent(format!("content '{}': {}", content.title, e))
    })
}
