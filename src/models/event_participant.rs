use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A helper's participation in an event. `(helper_id, event_id)` is the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct EventParticipant {
    pub helper_id: Uuid,
    pub event_id: i32,
}
