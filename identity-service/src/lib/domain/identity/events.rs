use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::models::Identity;

/// Domain event published when a new identity is registered.
///
/// Contains a snapshot of the identity at creation time for downstream
/// consumers. Publication is best-effort: a lost event never fails the
/// registration that produced it.
#[derive(Debug, Clone)]
pub struct IdentityCreatedEvent {
    pub event_id: String,
    pub identity_id: String,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl IdentityCreatedEvent {
    /// Create a new IdentityCreated event from an identity entity.
    ///
    /// Generates a unique event ID and extracts identity data for serialization.
    ///
    /// # Arguments
    /// * `identity` - Identity entity that was created
    ///
    /// # Returns
    /// IdentityCreatedEvent with unique event ID and identity snapshot
    pub fn new(identity: &Identity) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            identity_id: identity.id.to_string(),
            email: identity.email.as_str().to_string(),
            username: identity.username.as_str().to_string(),
            created_at: identity.created_at,
        }
    }
}
