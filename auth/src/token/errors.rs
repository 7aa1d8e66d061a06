use thiserror::Error;

/// Error type for access token operations.
///
/// Verification deliberately collapses every failure mode (bad signature,
/// malformed token, expiry) into the single `Invalid` variant so callers cannot
/// be used as an oracle for why a token was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Invalid token")]
    Invalid,
}
