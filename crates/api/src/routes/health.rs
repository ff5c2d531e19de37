use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/ping", get(ping))
}

/// Reports which store commits go to and which one the public routes
/// read. Does not call either.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "store": state.service().store_name(),
        "publicStore": state.service().public_store_name(),
        "postFormat": state.service().layout().post_format.extension(),
    }))
}

/// Lightweight ping.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use folio_core::store::MemoryStore;
    use serde_json::json;

    use crate::routes::test_support::{app_with, send};

    #[tokio::test]
    async fn health_names_the_store() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "memory");
        assert_eq!(body["publicStore"], "memory");
        assert_eq!(body["postFormat"], "json");
    }

    #[tokio::test]
    async fn ping_needs_no_auth() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, Method::GET, "/api/ping", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
