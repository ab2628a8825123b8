//! # AppError
//!
//! Centralized error handling for the Pulse-Board ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all pb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Idea, Message, AboutEntry)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Content rejected by the moderation pipeline (too short, too long,
    /// disallowed words). Carries the user-facing message verbatim.
    #[error("validation error: {0}")]
    Validation(String),

    /// Security/Auth failure (e.g., missing or invalid admin token)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down). The cause is attached for
    /// logging; user-facing surfaces must replace it with a generic message.
    #[error("internal service error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A specialized Result type for Pulse-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
