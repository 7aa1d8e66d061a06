use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::domain::identity::models::IdentityId;
use crate::domain::token::errors::RefreshTokenError;
use crate::domain::token::models::RefreshTokenRecord;
use crate::domain::token::ports::RefreshTokenStore;

/// Number of random bytes in a refresh token value (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Stateful issuer, rotator, and revoker of opaque refresh tokens.
///
/// Rotation persists the replacement record before deleting the old one, so a
/// crash mid-rotation leaves both tokens valid rather than locking the session
/// out. The delete of the old record is the commit point: when two callers
/// rotate the same token concurrently, the first delete wins and the loser
/// fails with the uniform invalid-token result.
pub struct RefreshTokenManager<RS>
where
    RS: RefreshTokenStore,
{
    store: Arc<RS>,
    ttl: Duration,
}

impl<RS> RefreshTokenManager<RS>
where
    RS: RefreshTokenStore,
{
    /// Create a new refresh token manager.
    ///
    /// # Arguments
    /// * `store` - Refresh token persistence implementation
    /// * `ttl` - Validity window of issued tokens (e.g. 7 days)
    pub fn new(store: Arc<RS>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Issue and persist a new refresh token for an identity.
    ///
    /// # Arguments
    /// * `identity_id` - Owning identity
    ///
    /// # Returns
    /// The persisted record, including the opaque token value
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    pub async fn issue(
        &self,
        identity_id: IdentityId,
    ) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            identity_id,
            token: generate_token_value(),
            expires_at: now + self.ttl,
            created_at: now,
        };

        self.store.create(record.clone()).await?;

        Ok(record)
    }

    /// Resolve a token value to its unexpired record.
    ///
    /// # Arguments
    /// * `token` - Opaque token value
    ///
    /// # Errors
    /// * `Invalid` - Token absent or expired (indistinguishable)
    /// * `Database` - Store operation failed
    pub async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record = self
            .store
            .find(token)
            .await?
            .ok_or(RefreshTokenError::Invalid)?;

        // The store filters expired rows; re-check at call time so validity
        // never depends on the store's clock alone.
        if record.is_expired(Utc::now()) {
            return Err(RefreshTokenError::Invalid);
        }

        Ok(record)
    }

    /// Rotate a refresh token: persist a replacement, then delete the old one.
    ///
    /// The old value is unusable immediately after success. If a concurrent
    /// rotation already consumed it, the freshly persisted record is revoked
    /// again and the caller fails with `Invalid`: at most one caller wins,
    /// never a double issue.
    ///
    /// # Arguments
    /// * `old_token` - Token value being rotated out
    ///
    /// # Returns
    /// The replacement record
    ///
    /// # Errors
    /// * `Invalid` - Old token absent, expired, or lost the rotation race
    /// * `Database` - Store operation failed
    pub async fn rotate(&self, old_token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let old_record = self.validate(old_token).await?;

        let new_record = self.issue(old_record.identity_id).await?;

        let deleted = self.store.delete(old_token).await?;
        if !deleted {
            // A concurrent rotation consumed the old token between validate
            // and delete. Withdraw our replacement and fail like any other
            // invalid token.
            if let Err(e) = self.store.delete(&new_record.token).await {
                tracing::error!(error = %e, "Failed to withdraw refresh token after lost rotation race");
            }
            return Err(RefreshTokenError::Invalid);
        }

        Ok(new_record)
    }

    /// Delete a token unconditionally.
    ///
    /// Deleting an absent token is not an error.
    ///
    /// # Arguments
    /// * `token` - Opaque token value
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.store.delete(token).await?;
        Ok(())
    }

    /// Bulk-delete expired records.
    ///
    /// Storage hygiene for an external scheduler; `validate` already checks
    /// expiry, so correctness never depends on this having run.
    ///
    /// # Returns
    /// Number of rows removed
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    pub async fn sweep_expired(&self) -> Result<u64, RefreshTokenError> {
        let removed = self.store.delete_expired().await?;
        if removed > 0 {
            tracing::info!(removed, "Swept expired refresh tokens");
        }
        Ok(removed)
    }
}

/// Generate a cryptographically secure random token value.
fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
