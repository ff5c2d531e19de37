use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. The admin panel is served from another origin and
/// authenticates with a bearer header, not cookies.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
