use thiserror::Error;

/// Error type for refresh token operations.
///
/// An absent token, an expired token, and a token that lost a concurrent
/// rotation all surface as the single `Invalid` variant.
#[derive(Debug, Clone, Error)]
pub enum RefreshTokenError {
    #[error("Invalid or expired refresh token")]
    Invalid,

    #[error("Database error: {0}")]
    Database(String),
}
