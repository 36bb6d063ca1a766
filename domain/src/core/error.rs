//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Most failure handling in the pipeline is per-unit data (a failed
/// `ExecutionResult`, an extractor's `error` field) rather than an error
/// return, so this enum stays small: it covers caller misuse that no
/// degraded result can express.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No extractors configured for ensemble run")]
    NoExtractors,

    #[error("Invalid dedup threshold {0} (must be in (0, 1])")]
    InvalidThreshold(f64),

    #[error("Invalid plugin descriptor: {0}")]
    InvalidDescriptor(String),
}
