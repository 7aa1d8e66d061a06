use async_trait::async_trait;
use auth::AccessTokenClaims;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::EventPublisherError;
use crate::domain::identity::events::IdentityCreatedEvent;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::TokenPair;
use crate::identity::models::EmailAddress;
use crate::identity::models::Username;

/// Port for the authentication domain service.
///
/// Owns every business invariant of the session lifecycle: registration
/// uniqueness, credential verification, token issuance, single-use refresh
/// rotation, and revocation.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity with validated credentials.
    ///
    /// The email/username pre-checks are advisory UX only; the persistence
    /// layer's unique constraints are the authority against concurrent
    /// registrations.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, username, and password
    ///
    /// # Returns
    /// Created identity entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `email` - Email address supplied at login
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// Fresh token pair; the refresh record is persisted before returning
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Inactive` - Password was correct but the identity is deactivated
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<TokenPair, AuthError>;

    /// Rotate a refresh token and issue a fresh access token.
    ///
    /// The old refresh value is unusable immediately after success.
    ///
    /// # Arguments
    /// * `refresh_token` - Opaque refresh token value presented by the caller
    ///
    /// # Returns
    /// New token pair
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token absent, expired, or lost a concurrent rotation
    /// * `Inactive` - Owning identity has been deactivated
    /// * `DatabaseError` - Store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke a refresh token.
    ///
    /// Idempotent: revoking an unknown or already-revoked token still succeeds.
    ///
    /// # Arguments
    /// * `refresh_token` - Opaque refresh token value to revoke
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Verify an access token and extract its claims.
    ///
    /// Pure signature/expiry check; never touches the store.
    ///
    /// # Arguments
    /// * `access_token` - Signed access token from the Authorization header
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature or expired (reason withheld)
    fn validate_token(&self, access_token: &str) -> Result<AccessTokenClaims, AuthError>;

    /// Retrieve an identity by unique identifier.
    ///
    /// # Arguments
    /// * `id` - Identity ID
    ///
    /// # Returns
    /// Identity entity
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, AuthError>;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new identity to storage.
    ///
    /// # Arguments
    /// * `identity` - Identity entity to create
    ///
    /// # Returns
    /// Created identity entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Retrieve an identity by identifier.
    ///
    /// # Arguments
    /// * `id` - Identity ID
    ///
    /// # Returns
    /// Optional identity entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError>;

    /// Retrieve an identity by email address.
    ///
    /// # Arguments
    /// * `email` - Email address to search for
    ///
    /// # Returns
    /// Optional identity entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;

    /// Retrieve an identity by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional identity entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, AuthError>;

    /// Update an existing identity in storage (full replace).
    ///
    /// # Arguments
    /// * `identity` - Identity entity with updated fields
    ///
    /// # Returns
    /// Updated identity entity
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, identity: Identity) -> Result<Identity, AuthError>;
}

/// Event publishing for identity lifecycle events.
///
/// Fire-and-forget: the domain service logs failures and never propagates them
/// to its caller.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish identity creation event.
    ///
    /// # Arguments
    /// * `event` - IdentityCreated event
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    async fn publish_identity_created(
        &self,
        event: &IdentityCreatedEvent,
    ) -> Result<(), EventPublisherError>;
}
