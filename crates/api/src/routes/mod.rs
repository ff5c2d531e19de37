pub mod admin;
pub mod health;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(public::routes())
        .merge(admin::routes(state.clone()))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use folio_core::service::ContentLayout;
    use folio_core::store::MemoryStore;
    use folio_core::ContentService;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::state::AppState;

    pub const PASSWORD: &str = "correct horse";

    pub fn app_with(store: Arc<MemoryStore>) -> Router {
        let config = AppConfig::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            "ADMIN_PASSWORD" => Some(PASSWORD.to_string()),
            _ => None,
        })
        .unwrap();
        let service = ContentService::new(store, None, ContentLayout::default());
        super::build_router(AppState::new(config, service))
    }

    /// Send one request and return the status with the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        password: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(password) = password {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {password}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
