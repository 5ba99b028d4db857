use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventStore, StoreResult};
use crate::config::Config;
use crate::models::view::{EventDetailsRow, EventSummaryRow};
use crate::models::{Event, EventChanges, EventParticipant, EventType, NewEvent, User};

const EVENT_COLUMNS: &str =
    "id, name, description, start_time, end_time, created_on, organiser_id, type_id";

const SUMMARY_SELECT: &str = r#"
    SELECT e.id, e.name, e.start_time, u.user_name AS organiser, t.name AS type_name
    FROM events e
    JOIN users u ON u.id = e.organiser_id
    JOIN types t ON t.id = e.type_id
"#;

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, user_name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_types(&self) -> StoreResult<Vec<EventType>> {
        let types = sqlx::query_as::<_, EventType>("SELECT id, name FROM types ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(types)
    }

    async fn type_exists(&self, id: i32) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM types WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn list_events(&self) -> StoreResult<Vec<EventSummaryRow>> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY e.start_time, e.id");
        let rows = sqlx::query_as::<_, EventSummaryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_joined_events(&self, helper_id: Uuid) -> StoreResult<Vec<EventSummaryRow>> {
        let sql = format!(
            "{SUMMARY_SELECT} JOIN event_participants p ON p.event_id = e.id \
             WHERE p.helper_id = $1 ORDER BY e.start_time, e.id"
        );
        let rows = sqlx::query_as::<_, EventSummaryRow>(&sql)
            .bind(helper_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_event(&self, id: i32) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn event_details(&self, id: i32) -> StoreResult<Option<EventDetailsRow>> {
        let row = sqlx::query_as::<_, EventDetailsRow>(
            r#"
            SELECT e.id, e.name, e.description, e.start_time, e.end_time, e.created_on,
                   u.user_name AS organiser, t.name AS type_name
            FROM events e
            JOIN users u ON u.id = e.organiser_id
            JOIN types t ON t.id = e.type_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event> {
        let sql = format!(
            "INSERT INTO events (name, description, start_time, end_time, created_on, organiser_id, type_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.start_time)
            .bind(new.end_time)
            .bind(new.created_on)
            .bind(new.organiser_id)
            .bind(new.type_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    async fn update_event(&self, id: i32, changes: EventChanges) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, start_time = $4, end_time = $5, type_id = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.type_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn add_participant(&self, participant: EventParticipant) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO event_participants (helper_id, event_id) VALUES ($1, $2) \
             ON CONFLICT (helper_id, event_id) DO NOTHING",
        )
        .bind(participant.helper_id)
        .bind(participant.event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_participant(&self, participant: EventParticipant) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM event_participants WHERE helper_id = $1 AND event_id = $2",
        )
        .bind(participant.helper_id)
        .bind(participant.event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
