use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_on: NaiveDateTime,
    pub organiser_id: Uuid,
    pub type_id: i32,
}

impl Event {
    pub fn is_organised_by(&self, user_id: Uuid) -> bool {
        self.organiser_id == user_id
    }
}

/// Fields supplied when an event is first persisted.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_on: NaiveDateTime,
    pub organiser_id: Uuid,
    pub type_id: i32,
}

/// The mutable subset of an event. Owner and creation time never change.
#[derive(Debug, Clone)]
pub struct EventChanges {
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub type_id: i32,
}

impl NewEvent {
    pub fn into_event(self, id: i32) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            created_on: self.created_on,
            organiser_id: self.organiser_id,
            type_id: self.type_id,
        }
    }
}

impl EventChanges {
    pub fn apply_to(self, event: &mut Event) {
        event.name = self.name;
        event.description = self.description;
        event.start_time = self.start_time;
        event.end_time = self.end_time;
        event.type_id = self.type_id;
    }
}
