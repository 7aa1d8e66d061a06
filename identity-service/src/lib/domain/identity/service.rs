use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessTokenClaims;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Duration;
use chrono::Utc;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::events::IdentityCreatedEvent;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::TokenPair;
use crate::domain::identity::ports::AuthServicePort;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::EventPublisher;
use crate::domain::token::manager::RefreshTokenManager;
use crate::domain::token::ports::RefreshTokenStore;

/// Domain service implementation for the authentication lifecycle.
///
/// Concrete implementation of AuthServicePort with dependency injection. The
/// only shared state is immutable key material and the store handles, so one
/// instance serves every request task concurrently.
pub struct AuthService<CS, RS, EP>
where
    CS: CredentialStore,
    RS: RefreshTokenStore,
    EP: EventPublisher,
{
    credentials: Arc<CS>,
    refresh_tokens: RefreshTokenManager<RS>,
    event_publisher: Arc<EP>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

impl<CS, RS, EP> AuthService<CS, RS, EP>
where
    CS: CredentialStore,
    RS: RefreshTokenStore,
    EP: EventPublisher,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `credentials` - Identity persistence implementation
    /// * `refresh_store` - Refresh token persistence implementation
    /// * `event_publisher` - Lifecycle event publishing implementation
    /// * `token_issuer` - Configured access token signer/verifier
    /// * `refresh_ttl` - Validity window for refresh tokens
    pub fn new(
        credentials: Arc<CS>,
        refresh_store: Arc<RS>,
        event_publisher: Arc<EP>,
        token_issuer: TokenIssuer,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            refresh_tokens: RefreshTokenManager::new(refresh_store, refresh_ttl),
            event_publisher,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }

    fn issue_access_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.token_issuer
            .issue(
                &identity.id.to_string(),
                identity.email.as_str(),
                identity.username.as_str(),
            )
            .map_err(|e| AuthError::Unknown(format!("Access token issuance failed: {}", e)))
    }
}

#[async_trait]
impl<CS, RS, EP> AuthServicePort for AuthService<CS, RS, EP>
where
    CS: CredentialStore,
    RS: RefreshTokenStore,
    EP: EventPublisher,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError> {
        // Advisory pre-checks for friendlier conflict reporting. The unique
        // constraints in the store remain the authority against concurrent
        // registrations.
        if self
            .credentials
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }

        if self
            .credentials
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(),
            email: command.email,
            username: command.username,
            password_hash,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.credentials.create(identity).await?;

        let event = IdentityCreatedEvent::new(&created);
        if let Err(e) = self.event_publisher.publish_identity_created(&event).await {
            tracing::error!(
                identity_id = %created.id,
                error = %e,
                "Failed to publish IdentityCreated event"
            );
        }

        Ok(created)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<TokenPair, AuthError> {
        let identity = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify(password, &identity.password_hash)
        {
            return Err(AuthError::InvalidCredentials);
        }

        // Only reported after the caller proved the password, so it never
        // doubles as an account-existence oracle.
        if !identity.active {
            return Err(AuthError::Inactive);
        }

        let access_token = self.issue_access_token(&identity)?;
        let refresh_record = self.refresh_tokens.issue(identity.id).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_record.token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let record = self.refresh_tokens.validate(refresh_token).await?;

        // A deactivated identity is rejected even while holding a still-valid
        // refresh token, and its token stays in place for audit.
        let identity = self
            .credentials
            .find_by_id(&record.identity_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !identity.active {
            return Err(AuthError::Inactive);
        }

        let new_record = self.refresh_tokens.rotate(refresh_token).await?;
        let access_token = self.issue_access_token(&identity)?;

        Ok(TokenPair {
            access_token,
            refresh_token: new_record.token,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await?;
        Ok(())
    }

    fn validate_token(&self, access_token: &str) -> Result<AccessTokenClaims, AuthError> {
        self.token_issuer
            .verify(access_token)
            .map_err(|_| AuthError::InvalidToken)
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, AuthError> {
        self.credentials
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::identity::errors::EventPublisherError;
    use crate::domain::identity::models::Username;
    use crate::domain::token::errors::RefreshTokenError;
    use crate::domain::token::models::RefreshTokenRecord;
    use uuid::Uuid;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;
            async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, AuthError>;
            async fn update(&self, identity: Identity) -> Result<Identity, AuthError>;
        }
    }

    mock! {
        pub TestRefreshTokenStore {}

        #[async_trait]
        impl RefreshTokenStore for TestRefreshTokenStore {
            async fn create(&self, record: RefreshTokenRecord) -> Result<(), RefreshTokenError>;
            async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, RefreshTokenError>;
            async fn delete(&self, token: &str) -> Result<bool, RefreshTokenError>;
            async fn delete_expired(&self) -> Result<u64, RefreshTokenError>;
        }
    }

    mock! {
        pub TestEventPublisher {}

        #[async_trait]
        impl EventPublisher for TestEventPublisher {
            async fn publish_identity_created(&self, event: &IdentityCreatedEvent) -> Result<(), EventPublisherError>;
        }
    }

    fn service(
        credentials: MockTestCredentialStore,
        refresh_store: MockTestRefreshTokenStore,
        events: MockTestEventPublisher,
    ) -> AuthService<MockTestCredentialStore, MockTestRefreshTokenStore, MockTestEventPublisher>
    {
        AuthService::new(
            Arc::new(credentials),
            Arc::new(refresh_store),
            Arc::new(events),
            TokenIssuer::new(SECRET, Duration::minutes(15)),
            Duration::days(7),
        )
    }

    fn identity_with_password(password: &str) -> Identity {
        let now = Utc::now();
        Identity {
            id: IdentityId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn refresh_record(identity_id: IdentityId, token: &str) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord {
            id: Uuid::new_v4(),
            identity_id,
            token: token.to_string(),
            expires_at: now + Duration::days(7),
            created_at: now,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            "pw12345678".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let mut events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        credentials
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        credentials
            .expect_create()
            .withf(|identity| {
                identity.email.as_str() == "alice@example.com"
                    && identity.username.as_str() == "alice"
                    && identity.active
                    && identity.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|identity| Ok(identity));
        events
            .expect_publish_identity_created()
            .times(1)
            .returning(|_| Ok(()));

        let service = service(credentials, refresh_store, events);

        let identity = service.register(register_command()).await.unwrap();
        assert!(identity.active);
        // The plaintext never reaches storage.
        assert_ne!(identity.password_hash, "pw12345678");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_precheck() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let mut events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(identity_with_password("other"))));
        credentials.expect_create().times(0);
        events.expect_publish_identity_created().times(0);

        let service = service(credentials, refresh_store, events);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_precheck() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let mut events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        credentials
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(identity_with_password("other"))));
        credentials.expect_create().times(0);
        events.expect_publish_identity_created().times(0);

        let service = service(credentials, refresh_store, events);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_conflict_from_store_constraint() {
        // Pre-checks race: another registration slipped in between the lookup
        // and the insert. The store's unique constraint stays authoritative.
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let mut events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        credentials
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        credentials.expect_create().times(1).returning(|identity| {
            Err(AuthError::EmailAlreadyExists(identity.email.to_string()))
        });
        events.expect_publish_identity_created().times(0);

        let service = service(credentials, refresh_store, events);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_event_failure_is_swallowed() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let mut events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        credentials
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        credentials.expect_create().times(1).returning(|identity| Ok(identity));
        events
            .expect_publish_identity_created()
            .times(1)
            .returning(|_| {
                Err(EventPublisherError::PublishFailed(
                    "broker unreachable".to_string(),
                ))
            });

        let service = service(credentials, refresh_store, events);

        assert!(service.register(register_command()).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_success_issues_valid_pair() {
        let identity = identity_with_password("pw12345678");
        let identity_id = identity.id;

        let mut credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        let returned = identity.clone();
        credentials
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        refresh_store
            .expect_create()
            .withf(move |record| record.identity_id == identity_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(credentials, refresh_store, events);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let pair = service.login(&email, "pw12345678").await.unwrap();

        // The access token is accepted by the service's own validator.
        let claims = service.validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, identity_id.to_string());
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.username, "alice");
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(credentials, refresh_store, events);

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let result = service.login(&email, "pw12345678").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let identity = identity_with_password("pw12345678");

        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        let service = service(credentials, refresh_store, events);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.login(&email, "wrong_password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_failures_resist_enumeration() {
        // Unknown email and wrong password produce the same error value.
        let identity = identity_with_password("pw12345678");

        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));
        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(credentials, refresh_store, events);

        let known = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let unknown = EmailAddress::new("nobody@example.com".to_string()).unwrap();

        let wrong_password = service.login(&known, "wrong_password").await.unwrap_err();
        let unknown_email = service.login(&unknown, "pw12345678").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_inactive_identity() {
        let mut identity = identity_with_password("pw12345678");
        identity.active = false;

        let mut credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));
        // No session artifacts for a deactivated account.
        refresh_store.expect_create().times(0);

        let service = service(credentials, refresh_store, events);

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let result = service.login(&email, "pw12345678").await;
        assert!(matches!(result, Err(AuthError::Inactive)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_issues_new_pair() {
        let identity = identity_with_password("pw12345678");
        let identity_id = identity.id;

        let mut credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        // Once for validation, once inside the rotation.
        refresh_store
            .expect_find()
            .withf(|token| token == "old-refresh")
            .times(2)
            .returning(move |token| Ok(Some(refresh_record(identity_id, token))));
        refresh_store
            .expect_create()
            .withf(move |record| record.identity_id == identity_id && record.token != "old-refresh")
            .times(1)
            .returning(|_| Ok(()));
        refresh_store
            .expect_delete()
            .withf(|token| token == "old-refresh")
            .times(1)
            .returning(|_| Ok(true));

        let returned = identity.clone();
        credentials
            .expect_find_by_id()
            .withf(move |id| *id == identity_id)
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = service(credentials, refresh_store, events);

        let pair = service.refresh("old-refresh").await.unwrap();
        assert_ne!(pair.refresh_token, "old-refresh");

        let claims = service.validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, identity_id.to_string());
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        refresh_store.expect_find().times(1).returning(|_| Ok(None));

        let service = service(credentials, refresh_store, events);

        let result = service.refresh("replayed-or-bogus").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_inactive_identity_rejected_before_rotation() {
        let mut identity = identity_with_password("pw12345678");
        identity.active = false;
        let identity_id = identity.id;

        let mut credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        refresh_store
            .expect_find()
            .times(1)
            .returning(move |token| Ok(Some(refresh_record(identity_id, token))));
        // Rotation never starts for an inactive identity.
        refresh_store.expect_create().times(0);
        refresh_store.expect_delete().times(0);

        let returned = identity.clone();
        credentials
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = service(credentials, refresh_store, events);

        let result = service.refresh("still-valid").await;
        assert!(matches!(result, Err(AuthError::Inactive)));
    }

    #[tokio::test]
    async fn test_refresh_vanished_identity() {
        let identity_id = IdentityId::new();

        let mut credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        refresh_store
            .expect_find()
            .times(1)
            .returning(move |token| Ok(Some(refresh_record(identity_id, token))));
        credentials
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(credentials, refresh_store, events);

        let result = service.refresh("orphaned").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let credentials = MockTestCredentialStore::new();
        let mut refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        refresh_store
            .expect_delete()
            .withf(|token| token == "already-revoked")
            .times(1)
            .returning(|_| Ok(false));

        let service = service(credentials, refresh_store, events);

        assert!(service.logout("already-revoked").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_token_rejects_garbage() {
        let service = service(
            MockTestCredentialStore::new(),
            MockTestRefreshTokenStore::new(),
            MockTestEventPublisher::new(),
        );

        let result = service.validate_token("not.a.token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[derive(Default)]
    struct InMemoryCredentialStore {
        identities: std::sync::Mutex<Vec<Identity>>,
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
            let mut identities = self.identities.lock().unwrap();
            if identities.iter().any(|i| i.email == identity.email) {
                return Err(AuthError::EmailAlreadyExists(identity.email.to_string()));
            }
            if identities.iter().any(|i| i.username == identity.username) {
                return Err(AuthError::UsernameAlreadyExists(
                    identity.username.to_string(),
                ));
            }
            identities.push(identity.clone());
            Ok(identity)
        }

        async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError> {
            let identities = self.identities.lock().unwrap();
            Ok(identities.iter().find(|i| i.id == *id).cloned())
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<Identity>, AuthError> {
            let identities = self.identities.lock().unwrap();
            Ok(identities.iter().find(|i| i.email == *email).cloned())
        }

        async fn find_by_username(
            &self,
            username: &Username,
        ) -> Result<Option<Identity>, AuthError> {
            let identities = self.identities.lock().unwrap();
            Ok(identities.iter().find(|i| i.username == *username).cloned())
        }

        async fn update(&self, identity: Identity) -> Result<Identity, AuthError> {
            let mut identities = self.identities.lock().unwrap();
            match identities.iter_mut().find(|i| i.id == identity.id) {
                Some(existing) => {
                    *existing = identity.clone();
                    Ok(identity)
                }
                None => Err(AuthError::NotFound(identity.id.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct InMemoryRefreshTokenStore {
        records: std::sync::Mutex<Vec<RefreshTokenRecord>>,
    }

    #[async_trait]
    impl RefreshTokenStore for InMemoryRefreshTokenStore {
        async fn create(&self, record: RefreshTokenRecord) -> Result<(), RefreshTokenError> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        async fn find(
            &self,
            token: &str,
        ) -> Result<Option<RefreshTokenRecord>, RefreshTokenError> {
            let now = Utc::now();
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .find(|r| r.token == token && r.expires_at > now)
                .cloned())
        }

        async fn delete(&self, token: &str) -> Result<bool, RefreshTokenError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.token != token);
            Ok(records.len() < before)
        }

        async fn delete_expired(&self) -> Result<u64, RefreshTokenError> {
            let now = Utc::now();
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.expires_at > now);
            Ok((before - records.len()) as u64)
        }
    }

    struct NoopEventPublisher;

    #[async_trait]
    impl EventPublisher for NoopEventPublisher {
        async fn publish_identity_created(
            &self,
            _event: &IdentityCreatedEvent,
        ) -> Result<(), EventPublisherError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle_against_shared_stores() {
        // Register, login, rotate, replay, and revoke against one coherent
        // pair of stores, so each step observes the previous one's writes.
        let service = AuthService::new(
            Arc::new(InMemoryCredentialStore::default()),
            Arc::new(InMemoryRefreshTokenStore::default()),
            Arc::new(NoopEventPublisher),
            TokenIssuer::new(SECRET, Duration::minutes(15)),
            Duration::days(7),
        );

        let identity = service.register(register_command()).await.unwrap();

        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        let first = service.login(&email, "pw12345678").await.unwrap();
        let claims = service.validate_token(&first.access_token).unwrap();
        assert_eq!(claims.sub, identity.id.to_string());

        let second = service.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert!(service.validate_token(&second.access_token).is_ok());

        // The rotated-out value is dead; replaying it fails.
        let replay = service.refresh(&first.refresh_token).await;
        assert!(matches!(replay, Err(AuthError::InvalidCredentials)));

        // Logout revokes the live token, after which refresh fails too.
        service.logout(&second.refresh_token).await.unwrap();
        let after_logout = service.refresh(&second.refresh_token).await;
        assert!(matches!(after_logout, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_registration_against_shared_store() {
        let service = AuthService::new(
            Arc::new(InMemoryCredentialStore::default()),
            Arc::new(InMemoryRefreshTokenStore::default()),
            Arc::new(NoopEventPublisher),
            TokenIssuer::new(SECRET, Duration::minutes(15)),
            Duration::days(7),
        );

        service.register(register_command()).await.unwrap();

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_identity_not_found() {
        let mut credentials = MockTestCredentialStore::new();
        let refresh_store = MockTestRefreshTokenStore::new();
        let events = MockTestEventPublisher::new();

        credentials
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(credentials, refresh_store, events);

        let result = service.get_identity(&IdentityId::new()).await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }
}
