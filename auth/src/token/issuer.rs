use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessTokenClaims;
use super::errors::TokenError;

/// Stateless issuer and verifier of short-lived access tokens.
///
/// Uses HS256 (HMAC with SHA-256) over a shared secret. Holds only immutable
/// key material, so a single instance can serve unboundedly many concurrent
/// requests.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret (should be at least 32 bytes for HS256)
    /// * `ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// TokenIssuer configured with the HS256 algorithm
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed access token for an identity.
    ///
    /// # Arguments
    /// * `identity_id` - Unique identity identifier (becomes `sub`)
    /// * `email` - Email address
    /// * `username` - Username
    ///
    /// # Returns
    /// Signed JWT string carrying `sub`, `email`, `username`, `iat`, and `exp`
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(
        &self,
        identity_id: &str,
        email: &str,
        username: &str,
    ) -> Result<String, TokenError> {
        let claims = AccessTokenClaims::new(identity_id, email, username, self.ttl);
        self.sign(&claims)
    }

    /// Sign pre-built claims.
    ///
    /// Exposed separately so tests can issue tokens with arbitrary timestamps.
    pub fn sign(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token and extract its claims.
    ///
    /// Rejects on bad signature, malformed structure, or expiry, always with
    /// the same uniform `Invalid` failure. Expiry is checked with zero leeway.
    ///
    /// # Arguments
    /// * `token` - JWT string to verify
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Invalid` - Token could not be verified (reason deliberately withheld)
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
