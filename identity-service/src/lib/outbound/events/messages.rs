use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::identity::events::IdentityCreatedEvent;

/// Serializable envelope for identity lifecycle events.
///
/// Infrastructure representation for event publishing (Kafka, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum IdentityEventMessage {
    IdentityCreated(IdentityCreatedMessage),
}

/// Serializable message for the IdentityCreated domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityCreatedMessage {
    pub event_id: String,
    pub identity_id: String,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&IdentityCreatedEvent> for IdentityCreatedMessage {
    fn from(event: &IdentityCreatedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            identity_id: event.identity_id.clone(),
            email: event.email.clone(),
            username: event.username.clone(),
            created_at: event.created_at,
        }
    }
}

impl From<IdentityCreatedEvent> for IdentityEventMessage {
    fn from(event: IdentityCreatedEvent) -> Self {
        IdentityEventMessage::IdentityCreated(IdentityCreatedMessage::from(&event))
    }
}
