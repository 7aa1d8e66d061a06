use async_trait::async_trait;

use crate::domain::token::errors::RefreshTokenError;
use crate::domain::token::models::RefreshTokenRecord;

/// Persistence operations for refresh token records.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a new refresh token record.
    ///
    /// # Arguments
    /// * `record` - Record to store; the token value must be unique
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn create(&self, record: RefreshTokenRecord) -> Result<(), RefreshTokenError>;

    /// Look up a record by token value, filtering out expired rows.
    ///
    /// Implementations must apply `expires_at > now` at query time; validity
    /// never depends on an expiry sweep having run.
    ///
    /// # Arguments
    /// * `token` - Opaque token value
    ///
    /// # Returns
    /// The unexpired record, or None if absent or expired
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, RefreshTokenError>;

    /// Delete a record by token value.
    ///
    /// # Arguments
    /// * `token` - Opaque token value
    ///
    /// # Returns
    /// True if a row was deleted, false if the token was already absent
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn delete(&self, token: &str) -> Result<bool, RefreshTokenError>;

    /// Bulk-delete records past their expiry.
    ///
    /// # Returns
    /// Number of rows removed
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn delete_expired(&self) -> Result<u64, RefreshTokenError>;
}
