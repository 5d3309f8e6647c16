//! Error types for the PBLForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; the propagation policy
//! differs per context and is documented on each variant group:
//! parse failures are per-file and non-fatal to a staging batch, store
//! capacity failures leave state unchanged, and generation/evaluation
//! failures abort only the requested operation.

use thiserror::Error;

/// The top-level error type for all PBLForge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Document parsing ---
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // --- Persistence ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Generation backend ---
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // --- Agents ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    // --- Configuration ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A per-file extraction failure. Never fatal to the staging batch:
/// the queue records the message on the entry and moves on.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Word document extraction failed: {0}")]
    Word(String),

    #[error("File is not valid UTF-8 text: {0}")]
    Encoding(String),

    #[error("Could not read file: {0}")]
    Io(String),
}

/// Persistence failures from the key-value collaborator.
///
/// `CapacityExceeded` is the one callers are expected to branch on:
/// a rejected promotion leaves in-memory staging state unchanged so the
/// caller can retry with a smaller selection.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Value for '{key}' is {size_bytes} bytes, store limit is {limit_bytes}")]
    CapacityExceeded {
        key: String,
        size_bytes: usize,
        limit_bytes: usize,
    },

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Stored value is not valid JSON: {0}")]
    Serialization(String),
}

/// Failures of the remote generation call itself (network, quota,
/// authentication). Agents wrap these in their own error types.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Assignment generation failures. Surfaced verbatim to the caller —
/// no partial or best-effort assignment is ever returned.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid generation input: {0}")]
    InvalidInput(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Backend response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Backend response violates the assignment schema: {0}")]
    SchemaViolation(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Submission evaluation failures. Never silently coerced into a
/// default score.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Submission image is not valid base64: {0}")]
    InvalidImage(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Backend response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Backend response violates the evaluation schema: {0}")]
    SchemaViolation(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
