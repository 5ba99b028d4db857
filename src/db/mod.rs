//! Persistence seam. Handlers only see [`EventStore`]; `PgEventStore` backs
//! the running service and `InMemoryEventStore` backs tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::view::{EventDetailsRow, EventSummaryRow};
use crate::models::{Event, EventChanges, EventParticipant, EventType, NewEvent, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A write referenced a row that does not exist.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn list_types(&self) -> StoreResult<Vec<EventType>>;

    async fn type_exists(&self, id: i32) -> StoreResult<bool>;

    /// All events with organiser and type names, ordered by start.
    async fn list_events(&self) -> StoreResult<Vec<EventSummaryRow>>;

    async fn list_joined_events(&self, helper_id: Uuid) -> StoreResult<Vec<EventSummaryRow>>;

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>>;

    async fn event_details(&self, id: i32) -> StoreResult<Option<EventDetailsRow>>;

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event>;

    /// Returns false when no event has `id`.
    async fn update_event(&self, id: i32, changes: EventChanges) -> StoreResult<bool>;

    /// Returns false when the record already existed.
    async fn add_participant(&self, participant: EventParticipant) -> StoreResult<bool>;

    /// Returns false when there was no record to remove.
    async fn remove_participant(&self, participant: EventParticipant) -> StoreResult<bool>;
}
