use std::env;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::auth::USER_ID_HEADER;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Browser clients only read and submit forms, so GET and POST cover every route.
pub fn create_cors_layer() -> CorsLayer {
    let configured =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());

    CorsLayer::new()
        .allow_origin(allow_origin(parse_allowed_origins(&configured)))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .expose_headers([header::LOCATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Splits a comma-separated origin list, skipping blanks and values that
/// are not valid header values.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect()
}

fn allow_origin(origins: Vec<HeaderValue>) -> AllowOrigin {
    let origins = if origins.is_empty() {
        tracing::warn!("CORS: no valid origins configured, using the local defaults");
        parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS)
    } else {
        origins
    };

    tracing::info!(count = origins.len(), "CORS: configured allowed origins");
    AllowOrigin::list(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins_parse() {
        let origins = parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn test_blank_and_invalid_entries_are_skipped() {
        let origins = parse_allowed_origins(" https://homies.example , ,bad\norigin");
        assert_eq!(origins, vec![HeaderValue::from_static("https://homies.example")]);
        assert!(parse_allowed_origins("").is_empty());
    }

    #[tokio::test]
    async fn test_invalid_configuration_does_not_open_every_origin() {
        use axum::body::Body;
        use axum::http::Request;
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        let layer = CorsLayer::new()
            .allow_origin(allow_origin(parse_allowed_origins("bad\norigin")))
            .allow_credentials(true);
        let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);

        let from = |origin: &'static str| {
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(from("https://evil.example")).await.unwrap();
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let response = app.oneshot(from("http://localhost:3000")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_create_cors_layer() {
        let _layer = create_cors_layer();
    }
}
