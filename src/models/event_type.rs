use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::constants::{TYPE_NAME_MAX_LENGTH, TYPE_NAME_MIN_LENGTH};

/// Event category. Seeded by migration, never written by handlers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventType {
    pub id: i32,
    pub name: String,
}

impl EventType {
    pub fn has_valid_name(&self) -> bool {
        (TYPE_NAME_MIN_LENGTH..=TYPE_NAME_MAX_LENGTH).contains(&self.name.chars().count())
    }
}
