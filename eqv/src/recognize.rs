//! The optical-recognition boundary.
//!
//! Recognition itself is a network concern that lives in the host; the core only defines the
//! capability it consumes. A host constructs a recognizer once and injects it into the
//! image-similarity entry points of [`crate::api`]; the core never holds a global handle.

use std::fmt;

/// An error produced by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizeError {
    /// The recognizer is not configured (for example, no endpoint is set). Hosts fail fast
    /// with this before any network attempt.
    Configuration {
        /// What is missing.
        message: String,
    },

    /// The recognition attempt failed or returned nothing usable.
    Recognition {
        /// What went wrong.
        message: String,
    },
}

impl fmt::Display for RecognizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "recognizer not configured: {}", message),
            Self::Recognition { message } => write!(f, "recognition failed: {}", message),
        }
    }
}

impl std::error::Error for RecognizeError {}

/// A capability that turns an image reference into the formula/LaTeX or plain-text string it
/// depicts.
pub trait Recognizer {
    /// Recognizes the content of the referenced image.
    fn recognize(&self, image_ref: &str) -> Result<String, RecognizeError>;
}
