use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::constants::{
    END_BEFORE_START_ERROR, EVENT_DESCRIPTION_MAX_LENGTH, EVENT_DESCRIPTION_MIN_LENGTH,
    EVENT_NAME_MAX_LENGTH, EVENT_NAME_MIN_LENGTH,
};
use crate::models::{Event, EventChanges, EventType};
use crate::utils::datetime::{format_event_time, parse_event_time};
use crate::utils::validation::{validate, Constraint, FieldErrors, FieldRule, FormFields};

pub const EVENT_FORM_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        constraints: &[
            Constraint::Required,
            Constraint::Length {
                min: EVENT_NAME_MIN_LENGTH,
                max: EVENT_NAME_MAX_LENGTH,
            },
        ],
    },
    FieldRule {
        field: "description",
        constraints: &[
            Constraint::Required,
            Constraint::Length {
                min: EVENT_DESCRIPTION_MIN_LENGTH,
                max: EVENT_DESCRIPTION_MAX_LENGTH,
            },
        ],
    },
    FieldRule {
        field: "start",
        constraints: &[Constraint::Required, Constraint::DateTime],
    },
    FieldRule {
        field: "end",
        constraints: &[Constraint::Required, Constraint::DateTime],
    },
    FieldRule {
        field: "type_id",
        constraints: &[Constraint::Required, Constraint::Integer],
    },
];

/// Add/Edit form as posted by the client and as echoed back on redisplay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFormModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    /// Kept as text so an empty or garbled choice is a field error, not a rejected body.
    #[serde(default)]
    pub type_id: String,
}

impl FormFields for EventFormModel {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "start" => Some(&self.start),
            "end" => Some(&self.end),
            "type_id" => Some(&self.type_id),
            _ => None,
        }
    }
}

impl EventFormModel {
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            description: event.description.clone(),
            start: format_event_time(event.start_time),
            end: format_event_time(event.end_time),
            type_id: event.type_id.to_string(),
        }
    }

    pub fn parsed_type_id(&self) -> Option<i32> {
        self.type_id.trim().parse().ok()
    }

    /// Runs the field table, then the cross-field check on the date range.
    /// Whether `type_id` exists is a store question and is left to the caller.
    pub fn validate(&self) -> Result<EventChanges, FieldErrors> {
        let mut errors = validate(self, EVENT_FORM_RULES);

        let start = parse_event_time(&self.start);
        let end = parse_event_time(&self.end);

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.add("end", END_BEFORE_START_ERROR);
            }
        }

        match (start, end, self.parsed_type_id()) {
            (Some(start_time), Some(end_time), Some(type_id)) if errors.is_empty() => {
                Ok(EventChanges {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    start_time,
                    end_time,
                    type_id,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOption {
    pub id: i32,
    pub name: String,
}

impl From<EventType> for TypeOption {
    fn from(value: EventType) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Everything needed to render the Add/Edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFormPage {
    pub form: EventFormModel,
    pub types: Vec<TypeOption>,
    #[serde(default)]
    pub errors: serde_json::Map<String, serde_json::Value>,
}

impl EventFormPage {
    pub fn new(form: EventFormModel, types: Vec<EventType>, errors: &FieldErrors) -> Self {
        let errors = match serde_json::to_value(errors) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };

        Self {
            form,
            types: types.into_iter().map(TypeOption::from).collect(),
            errors,
        }
    }
}

/// Listing row joined with organiser and type names.
#[derive(Debug, Clone, FromRow)]
pub struct EventSummaryRow {
    pub id: i32,
    pub name: String,
    pub start_time: NaiveDateTime,
    pub organiser: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListItem {
    pub id: i32,
    pub name: String,
    pub start: String,
    pub organiser: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl From<EventSummaryRow> for EventListItem {
    fn from(row: EventSummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            start: format_event_time(row.start_time),
            organiser: row.organiser,
            type_name: row.type_name,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EventDetailsRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_on: NaiveDateTime,
    pub organiser: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub created_on: String,
    pub organiser: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl From<EventDetailsRow> for EventDetails {
    fn from(row: EventDetailsRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            start: format_event_time(row.start_time),
            end: format_event_time(row.end_time),
            created_on: format_event_time(row.created_on),
            organiser: row.organiser,
            type_name: row.type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::constants::DATE_TIME_ERROR;
    use crate::models::NewEvent;

    fn board_games() -> EventFormModel {
        EventFormModel {
            name: "Board Games".to_string(),
            description: "Monthly board game night with snacks".to_string(),
            start: "2024-05-01 18:00".to_string(),
            end: "2024-05-01 22:00".to_string(),
            type_id: "1".to_string(),
        }
    }

    #[test]
    fn test_valid_form_yields_changes() {
        let changes = board_games().validate().unwrap();
        assert_eq!(changes.name, "Board Games");
        assert_eq!(format_event_time(changes.start_time), "2024-05-01 18:00");
        assert_eq!(format_event_time(changes.end_time), "2024-05-01 22:00");
        assert_eq!(changes.type_id, 1);
    }

    #[test]
    fn test_name_and_description_bounds() {
        let mut form = board_games();
        form.name = "Game".to_string();
        form.description = "Too short".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("description"));
        assert!(!errors.has("start"));

        let mut form = board_games();
        form.name = "x".repeat(EVENT_NAME_MAX_LENGTH + 1);
        form.description = "y".repeat(EVENT_DESCRIPTION_MAX_LENGTH);
        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(!errors.has("description"));
    }

    #[test]
    fn test_malformed_dates_are_reported_per_field() {
        let mut form = board_games();
        form.start = "2024/05/01 18:00".to_string();
        form.end = "later".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("start"), [DATE_TIME_ERROR]);
        assert_eq!(errors.get("end"), [DATE_TIME_ERROR]);
    }

    #[test]
    fn test_type_must_be_a_number() {
        let mut form = board_games();
        form.type_id = "abc".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("type_id"), ["The field type_id must be a number."]);

        form.type_id.clear();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("type_id"), ["The type_id field is required."]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_form_round_trips_stored_event() {
        let changes = board_games().validate().unwrap();
        let mut event = NewEvent {
            name: String::new(),
            description: String::new(),
            start_time: changes.start_time,
            end_time: changes.end_time,
            created_on: changes.start_time,
            organiser_id: uuid::Uuid::new_v4(),
            type_id: 0,
        }
        .into_event(3);
        changes.apply_to(&mut event);

        assert_eq!(EventFormModel::from_event(&event), board_games());
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut form = board_games();
        form.end = "2024-05-01 17:00".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("end"), [END_BEFORE_START_ERROR]);

        form.end = form.start.clone();
        assert!(form.validate().unwrap_err().has("end"));
    }

    #[test]
    fn test_form_page_carries_errors_by_field() {
        let mut form = board_games();
        form.name.clear();
        let errors = form.validate().unwrap_err();
        let page = EventFormPage::new(
            form.clone(),
            vec![EventType {
                id: 1,
                name: "Animals".to_string(),
            }],
            &errors,
        );

        assert_eq!(page.form, form);
        assert_eq!(page.types.len(), 1);
        assert!(page.errors.contains_key("name"));
    }
}
