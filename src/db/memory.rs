//! HashMap-backed [`EventStore`] for tests and local runs without Postgres.
//!
//! Mirrors the relational rules of the schema: events must reference an
//! existing organiser and type, and a participant row must reference an
//! existing user and event.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{EventStore, StoreError, StoreResult};
use crate::models::view::{EventDetailsRow, EventSummaryRow};
use crate::models::{Event, EventChanges, EventParticipant, EventType, NewEvent, User};

/// Categories seeded by the initial migration.
pub const DEFAULT_TYPES: [&str; 4] = ["Animals", "Leisure", "Discussion", "Workshop"];

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    types: BTreeMap<i32, EventType>,
    events: BTreeMap<i32, Event>,
    participants: BTreeSet<(i32, Uuid)>,
    next_event_id: i32,
}

impl Tables {
    fn summary(&self, event: &Event) -> Option<EventSummaryRow> {
        let organiser = self.users.get(&event.organiser_id)?;
        let event_type = self.types.get(&event.type_id)?;

        Some(EventSummaryRow {
            id: event.id,
            name: event.name.clone(),
            start_time: event.start_time,
            organiser: organiser.user_name.clone(),
            type_name: event_type.name.clone(),
        })
    }

    fn sorted_summaries<'a>(&self, events: impl Iterator<Item = &'a Event>) -> Vec<EventSummaryRow> {
        let mut rows: Vec<EventSummaryRow> = events.filter_map(|e| self.summary(e)).collect();
        rows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        rows
    }
}

#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the same categories as a freshly migrated database.
    pub fn with_default_types() -> Self {
        let store = Self::new();
        {
            let mut tables = store.write();
            for (index, name) in DEFAULT_TYPES.iter().enumerate() {
                let id = index as i32 + 1;
                tables.types.insert(
                    id,
                    EventType {
                        id,
                        name: (*name).to_string(),
                    },
                );
            }
        }
        store
    }

    pub fn add_user(&self, user: User) {
        self.write().users.insert(user.id, user);
    }

    /// Rejects names the `types` check constraint would reject.
    pub fn add_type(&self, event_type: EventType) -> StoreResult<()> {
        if !event_type.has_valid_name() {
            return Err(StoreError::Conflict(format!(
                "type name '{}' is out of bounds",
                event_type.name
            )));
        }
        self.write().types.insert(event_type.id, event_type);
        Ok(())
    }

    pub fn events(&self) -> Vec<Event> {
        self.read().events.values().cloned().collect()
    }

    pub fn participants(&self) -> Vec<EventParticipant> {
        self.read()
            .participants
            .iter()
            .map(|&(event_id, helper_id)| EventParticipant { helper_id, event_id })
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn list_types(&self) -> StoreResult<Vec<EventType>> {
        Ok(self.read().types.values().cloned().collect())
    }

    async fn type_exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.read().types.contains_key(&id))
    }

    async fn list_events(&self) -> StoreResult<Vec<EventSummaryRow>> {
        let tables = self.read();
        Ok(tables.sorted_summaries(tables.events.values()))
    }

    async fn list_joined_events(&self, helper_id: Uuid) -> StoreResult<Vec<EventSummaryRow>> {
        let tables = self.read();
        let joined = tables
            .events
            .values()
            .filter(|e| tables.participants.contains(&(e.id, helper_id)));
        Ok(tables.sorted_summaries(joined))
    }

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>> {
        Ok(self.read().events.get(&id).cloned())
    }

    async fn event_details(&self, id: i32) -> StoreResult<Option<EventDetailsRow>> {
        let tables = self.read();
        let details = tables.events.get(&id).and_then(|event| {
            let organiser = tables.users.get(&event.organiser_id)?;
            let event_type = tables.types.get(&event.type_id)?;
            Some(EventDetailsRow {
                id: event.id,
                name: event.name.clone(),
                description: event.description.clone(),
                start_time: event.start_time,
                end_time: event.end_time,
                created_on: event.created_on,
                organiser: organiser.user_name.clone(),
                type_name: event_type.name.clone(),
            })
        });
        Ok(details)
    }

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event> {
        let mut tables = self.write();

        if !tables.users.contains_key(&new.organiser_id) {
            return Err(StoreError::Conflict(format!(
                "organiser {} does not exist",
                new.organiser_id
            )));
        }
        if !tables.types.contains_key(&new.type_id) {
            return Err(StoreError::Conflict(format!(
                "type {} does not exist",
                new.type_id
            )));
        }

        tables.next_event_id += 1;
        let event = new.into_event(tables.next_event_id);
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: i32, changes: EventChanges) -> StoreResult<bool> {
        let mut tables = self.write();

        if !tables.types.contains_key(&changes.type_id) {
            return Err(StoreError::Conflict(format!(
                "type {} does not exist",
                changes.type_id
            )));
        }

        match tables.events.get_mut(&id) {
            Some(event) => {
                changes.apply_to(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_participant(&self, participant: EventParticipant) -> StoreResult<bool> {
        let mut tables = self.write();

        if !tables.events.contains_key(&participant.event_id) {
            return Err(StoreError::Conflict(format!(
                "event {} does not exist",
                participant.event_id
            )));
        }
        if !tables.users.contains_key(&participant.helper_id) {
            return Err(StoreError::Conflict(format!(
                "user {} does not exist",
                participant.helper_id
            )));
        }

        Ok(tables
            .participants
            .insert((participant.event_id, participant.helper_id)))
    }

    async fn remove_participant(&self, participant: EventParticipant) -> StoreResult<bool> {
        Ok(self
            .write()
            .participants
            .remove(&(participant.event_id, participant.helper_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::parse_event_time;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            user_name: name.to_string(),
            email: format!("{}@homies.test", name),
        }
    }

    fn new_event(organiser_id: Uuid, name: &str, start: &str) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            description: "A long enough description".to_string(),
            start_time: parse_event_time(start).unwrap(),
            end_time: parse_event_time("2030-01-01 0:00").unwrap(),
            created_on: parse_event_time("2024-01-01 12:00").unwrap(),
            organiser_id,
            type_id: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryEventStore::with_default_types();
        let alice = user("alice");
        store.add_user(alice.clone());

        let first = store
            .insert_event(new_event(alice.id, "First", "2024-05-01 18:00"))
            .await
            .unwrap();
        let second = store
            .insert_event(new_event(alice.id, "Second", "2024-05-02 18:00"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.events().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_references() {
        let store = InMemoryEventStore::with_default_types();
        let result = store
            .insert_event(new_event(Uuid::new_v4(), "Orphan", "2024-05-01 18:00"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        let alice = user("alice");
        store.add_user(alice.clone());
        let mut event = new_event(alice.id, "Typeless", "2024-05-01 18:00");
        event.type_id = 99;
        assert!(matches!(
            store.insert_event(event).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_is_ordered_by_start_and_projects_names() {
        let store = InMemoryEventStore::with_default_types();
        let alice = user("alice");
        store.add_user(alice.clone());

        store
            .insert_event(new_event(alice.id, "Later", "2024-06-01 18:00"))
            .await
            .unwrap();
        store
            .insert_event(new_event(alice.id, "Sooner", "2024-05-01 18:00"))
            .await
            .unwrap();

        let rows = store.list_events().await.unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Sooner", "Later"]);
        assert_eq!(rows[0].organiser, "alice");
        assert_eq!(rows[0].type_name, "Animals");
    }

    #[tokio::test]
    async fn test_participation_is_a_set() {
        let store = InMemoryEventStore::with_default_types();
        let alice = user("alice");
        let bob = user("bob");
        store.add_user(alice.clone());
        store.add_user(bob.clone());
        let event = store
            .insert_event(new_event(alice.id, "Party", "2024-05-01 18:00"))
            .await
            .unwrap();
        let participant = EventParticipant {
            helper_id: bob.id,
            event_id: event.id,
        };

        assert!(store.add_participant(participant).await.unwrap());
        assert!(!store.add_participant(participant).await.unwrap());
        assert_eq!(store.participants(), vec![participant]);
        assert_eq!(store.list_joined_events(bob.id).await.unwrap().len(), 1);
        assert!(store.list_joined_events(alice.id).await.unwrap().is_empty());

        assert!(store.remove_participant(participant).await.unwrap());
        assert!(!store.remove_participant(participant).await.unwrap());
        assert!(store.participants().is_empty());
    }

    #[tokio::test]
    async fn test_type_names_respect_bounds() {
        let store = InMemoryEventStore::with_default_types();
        let types = store.list_types().await.unwrap();
        assert_eq!(types.len(), DEFAULT_TYPES.len());
        assert!(types.iter().all(EventType::has_valid_name));

        let short = EventType {
            id: 9,
            name: "Fun".to_string(),
        };
        assert!(matches!(store.add_type(short), Err(StoreError::Conflict(_))));

        let long = EventType {
            id: 9,
            name: "x".repeat(16),
        };
        assert!(store.add_type(long).is_err());

        let fits = EventType {
            id: 9,
            name: "Outdoors".to_string(),
        };
        store.add_type(fits).unwrap();
        assert!(store.type_exists(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_event_reports_false() {
        let store = InMemoryEventStore::with_default_types();
        let changes = EventChanges {
            name: "Nothing".to_string(),
            description: "Nothing to change here".to_string(),
            start_time: parse_event_time("2024-05-01 18:00").unwrap(),
            end_time: parse_event_time("2024-05-01 19:00").unwrap(),
            type_id: 2,
        };
        assert!(!store.update_event(42, changes).await.unwrap());
    }
}
