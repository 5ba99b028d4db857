use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{events, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let event_routes = Router::new()
        .route("/all", get(events::all))
        .route("/add", get(events::add_form).post(events::add))
        .route("/edit/:id", get(events::edit_form).post(events::edit))
        .route("/details/:id", get(events::details))
        .route("/join/:id", post(events::join))
        .route("/leave/:id", post(events::leave))
        .route("/joined", get(events::joined));

    Router::new()
        .route("/health", get(health_check))
        .nest("/event", event_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
