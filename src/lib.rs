pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openai;
pub mod services;
pub mod state;
pub mod supabase;
pub mod types;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Build the HTTP router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().security.cors_origins);

    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Forms and auth
        .route("/submit", post(handlers::submit_post))
        .route("/register", post(handlers::register_post))
        .route("/login", post(handlers::login_post))
        // Analytics
        .route("/insights", get(handlers::insights_get))
        .route("/query", post(handlers::query_post))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured front-end origins.
///
/// Wildcard headers/methods cannot be combined with credentials, so both are
/// mirrored from the preflight request instead.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            // browsers never send a trailing slash in Origin
            let origin = origin.trim().trim_end_matches('/');
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    async fn allowed_origin(configured: &[&str], origin: &str) -> Option<String> {
        let configured: Vec<String> = configured.iter().map(|s| s.to_string()).collect();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&configured));

        let request = Request::builder()
            .uri("/")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_trims_trailing_slash() {
        let allowed = allowed_origin(&["https://paraller.vercel.app/"], "https://paraller.vercel.app").await;
        assert_eq!(allowed.as_deref(), Some("https://paraller.vercel.app"));
    }

    #[tokio::test]
    async fn test_cors_rejects_unlisted_origin() {
        assert_eq!(allowed_origin(&["http://localhost:5173"], "https://elsewhere.io").await, None);
    }
}
