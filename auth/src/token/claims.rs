use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// Ephemeral and never persisted: validity is entirely a function of the
/// signature and the `exp` claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Email address of the identity
    pub email: String,

    /// Username of the identity
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Create claims for an identity, stamped with the current time.
    ///
    /// # Arguments
    /// * `identity_id` - Unique identity identifier
    /// * `email` - Email address
    /// * `username` - Username
    /// * `ttl` - Time until the token expires
    ///
    /// # Returns
    /// Claims with `iat` set to now and `exp` set to now + ttl
    pub fn new(
        identity_id: impl ToString,
        email: impl ToString,
        username: impl ToString,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: identity_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
