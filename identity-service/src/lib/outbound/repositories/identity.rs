use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::AuthError;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            email: EmailAddress::new(row.email)?,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map a unique-constraint violation to the matching conflict error.
///
/// The partial unique indexes on email/username are the real authority for
/// uniqueness; the service-level pre-checks are advisory only.
fn map_unique_violation(e: sqlx::Error, identity: &Identity) -> AuthError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("identities_email_key") {
                return AuthError::EmailAlreadyExists(identity.email.to_string());
            }
            if db_err.constraint() == Some("identities_username_key") {
                return AuthError::UsernameAlreadyExists(identity.username.to_string());
            }
        }
    }
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, email, username, password_hash, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(identity.username.as_str())
        .bind(&identity.password_hash)
        .bind(identity.active)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &identity))?;

        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            r#"
            SELECT id, email, username, password_hash, active, created_at, updated_at
            FROM identities
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            r#"
            SELECT id, email, username, password_hash, active, created_at, updated_at
            FROM identities
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, AuthError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            r#"
            SELECT id, email, username, password_hash, active, created_at, updated_at
            FROM identities
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn update(&self, identity: Identity) -> Result<Identity, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET email = $2, username = $3, password_hash = $4, active = $5, updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(identity.username.as_str())
        .bind(&identity.password_hash)
        .bind(identity.active)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &identity))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(identity.id.to_string()));
        }

        Ok(identity)
    }
}
