use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::error::ApiError;
use crate::state::AppState;

/// Admit a request only if it carries `Authorization: Bearer <admin password>`.
/// Rejected requests never reach a handler, so they cannot touch the store.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match request.headers().typed_get::<Authorization<Bearer>>() {
        Some(auth) if state.admin_password_matches(auth.token()) => Ok(next.run(request).await),
        presented => {
            tracing::warn!(
                path = %request.uri().path(),
                credential = presented.is_some(),
                "rejected admin request"
            );
            Err(ApiError::Unauthorized)
        }
    }
}
