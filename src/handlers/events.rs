//! Event actions: listing, creation, editing and participation.
//!
//! Every action runs as the [`CurrentUser`]. Mutations check ownership or
//! participation rules before touching the submitted payload, then redirect
//! to a listing on success.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use tracing::{debug, info};

use crate::db::{EventStore, StoreError};
use crate::handlers::auth::CurrentUser;
use crate::models::constants::UNKNOWN_TYPE_ERROR;
use crate::models::view::{EventDetails, EventFormModel, EventFormPage, EventListItem};
use crate::models::{Event, EventChanges, EventParticipant, NewEvent};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{rejected_form, success};
use crate::utils::validation::FieldErrors;

pub const ALL_EVENTS_PATH: &str = "/event/all";
pub const JOINED_EVENTS_PATH: &str = "/event/joined";

pub async fn all(State(state): State<AppState>, _user: CurrentUser) -> Result<Response, AppError> {
    let events: Vec<EventListItem> = state
        .store
        .list_events()
        .await?
        .into_iter()
        .map(EventListItem::from)
        .collect();

    Ok(success(events, "Events retrieved"))
}

pub async fn joined(State(state): State<AppState>, user: CurrentUser) -> Result<Response, AppError> {
    let events: Vec<EventListItem> = state
        .store
        .list_joined_events(user.id())
        .await?
        .into_iter()
        .map(EventListItem::from)
        .collect();

    Ok(success(events, "Joined events retrieved"))
}

pub async fn details(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let details = state
        .store
        .event_details(id)
        .await?
        .map(EventDetails::from)
        .ok_or_else(|| AppError::event_not_found(id))?;

    Ok(success(details, "Event retrieved"))
}

pub async fn add_form(State(state): State<AppState>, _user: CurrentUser) -> Result<Response, AppError> {
    let types = state.store.list_types().await?;
    let page = EventFormPage::new(EventFormModel::default(), types, &FieldErrors::new());

    Ok(success(page, "Event form"))
}

pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<EventFormModel>,
) -> Result<Response, AppError> {
    let changes = match check_form(state.store.as_ref(), &form).await? {
        Ok(changes) => changes,
        Err(errors) => return redisplay(&state, form, errors).await,
    };

    let event = state
        .store
        .insert_event(NewEvent {
            name: changes.name,
            description: changes.description,
            start_time: changes.start_time,
            end_time: changes.end_time,
            created_on: Utc::now().naive_utc(),
            organiser_id: user.id(),
            type_id: changes.type_id,
        })
        .await?;

    info!(event_id = event.id, organiser = %user.id(), "Event created");

    Ok(Redirect::to(ALL_EVENTS_PATH).into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let event = owned_event(&state, &user, id).await?;
    let types = state.store.list_types().await?;
    let page = EventFormPage::new(EventFormModel::from_event(&event), types, &FieldErrors::new());

    Ok(success(page, "Event form"))
}

pub async fn edit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(form): Form<EventFormModel>,
) -> Result<Response, AppError> {
    // Ownership is settled before the payload is looked at.
    owned_event(&state, &user, id).await?;

    let changes = match check_form(state.store.as_ref(), &form).await? {
        Ok(changes) => changes,
        Err(errors) => return redisplay(&state, form, errors).await,
    };

    if !state.store.update_event(id, changes).await? {
        return Err(AppError::event_not_found(id));
    }

    info!(event_id = id, organiser = %user.id(), "Event updated");

    Ok(Redirect::to(ALL_EVENTS_PATH).into_response())
}

pub async fn join(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let event = find_event(&state, id).await?;

    if event.is_organised_by(user.id()) {
        return Err(AppError::BadRequest(
            "Organisers cannot join their own events".to_string(),
        ));
    }

    let participant = EventParticipant {
        helper_id: user.id(),
        event_id: id,
    };

    if state.store.add_participant(participant).await? {
        info!(event_id = id, helper = %user.id(), "Joined event");
    } else {
        debug!(event_id = id, helper = %user.id(), "Already joined");
    }

    Ok(Redirect::to(JOINED_EVENTS_PATH).into_response())
}

pub async fn leave(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    find_event(&state, id).await?;

    let participant = EventParticipant {
        helper_id: user.id(),
        event_id: id,
    };

    if !state.store.remove_participant(participant).await? {
        return Err(AppError::BadRequest(
            "You are not a participant of this event".to_string(),
        ));
    }

    info!(event_id = id, helper = %user.id(), "Left event");

    Ok(Redirect::to(ALL_EVENTS_PATH).into_response())
}

async fn find_event(state: &AppState, id: i32) -> Result<Event, AppError> {
    state
        .store
        .find_event(id)
        .await?
        .ok_or_else(|| AppError::event_not_found(id))
}

async fn owned_event(state: &AppState, user: &CurrentUser, id: i32) -> Result<Event, AppError> {
    let event = find_event(state, id).await?;

    if !event.is_organised_by(user.id()) {
        return Err(AppError::Forbidden(
            "Only the organiser can edit this event".to_string(),
        ));
    }

    Ok(event)
}

/// Field table and date range first, then whether the chosen type exists.
async fn check_form(
    store: &dyn EventStore,
    form: &EventFormModel,
) -> Result<Result<EventChanges, FieldErrors>, StoreError> {
    let checked = form.validate();

    // A type id that is not a number already carries its own field error.
    let Some(type_id) = form.parsed_type_id() else {
        return Ok(checked);
    };

    if store.type_exists(type_id).await? {
        return Ok(checked);
    }

    let mut errors = checked.err().unwrap_or_default();
    errors.add("type_id", UNKNOWN_TYPE_ERROR);
    Ok(Err(errors))
}

async fn redisplay(
    state: &AppState,
    form: EventFormModel,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    debug!(?errors, "Event form rejected");

    let types = state.store.list_types().await?;
    Ok(rejected_form(
        EventFormPage::new(form, types, &errors),
        "The event form has errors",
    ))
}
