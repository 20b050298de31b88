// handlers/root.rs - GET / and GET /health

use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Paraller API",
        "version": version,
        "endpoints": {
            "submit": "POST /submit",
            "register": "POST /register",
            "login": "POST /login",
            "insights": "GET /insights",
            "query": "POST /query",
            "health": "GET /health"
        }
    }))
}

/// Liveness only; upstream services are not probed
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
