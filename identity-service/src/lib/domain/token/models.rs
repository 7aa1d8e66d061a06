use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::models::IdentityId;

/// Stored refresh token record.
///
/// Multiple concurrent valid records per identity are permitted (one per
/// session); there is no single-active-session constraint. The token value is
/// high-entropy, opaque, and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub identity_id: IdentityId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Whether the record is past its expiry at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
