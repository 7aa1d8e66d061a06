//! Authentication primitives library
//!
//! Provides the storage-free building blocks of the identity service:
//! - Password hashing (Argon2id)
//! - Short-lived access token issuance and verification (HS256 JWT)
//!
//! Everything here is pure with respect to external state: no component touches
//! a database, so all operations are safe to call concurrently from any number
//! of request tasks without synchronization.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("wrong_password", &digest));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//! let token = issuer.issue("user-id", "alice@example.com", "alice").unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.sub, "user-id");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessTokenClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
