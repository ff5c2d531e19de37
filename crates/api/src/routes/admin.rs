//! Password-gated content management API.
//!
//! Every route here sits behind [`require_admin`]. Writes carry the `sha`
//! the client last read; a stale one fails and the client must reload.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use folio_core::content::{Block, BlogPost, Locale, PostBody, PostMeta, SiteConfig, Slug};
use folio_core::service::Versioned;
use folio_core::VersionToken;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/posts",
            get(list_or_get_post).post(save_post).delete(delete_post),
        )
        .route("/admin/config", get(get_config).post(save_config))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

#[derive(Debug, Deserialize)]
struct PostQuery {
    slug: Option<String>,
    sha: Option<String>,
}

/// Full post as the editor loads it.
#[derive(Serialize)]
struct PostResponse {
    slug: Slug,
    sha: Option<VersionToken>,
    title: String,
    description: String,
    date: String,
    tags: Vec<String>,
    locale: Locale,
    /// Serialized as `blocks` or `content`.
    #[serde(flatten)]
    body: PostBody,
}

impl From<Versioned<BlogPost>> for PostResponse {
    fn from(versioned: Versioned<BlogPost>) -> Self {
        let BlogPost { meta, body } = versioned.value;
        Self {
            slug: meta.slug,
            sha: versioned.sha,
            title: meta.title,
            description: meta.description,
            date: meta.date,
            tags: meta.tags,
            locale: meta.locale,
            body,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SavePostRequest {
    slug: Option<String>,
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    tags: Option<Vec<String>>,
    locale: Option<Locale>,
    blocks: Option<Vec<Block>>,
    content: Option<String>,
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveConfigRequest {
    config: SiteConfig,
    #[serde(default)]
    sha: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// `GET /admin/posts` lists posts; `GET /admin/posts?slug=X` loads one.
async fn list_or_get_post(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Response> {
    match non_empty(query.slug) {
        Some(raw) => {
            let slug = Slug::parse(&raw)?;
            let post = state.service().get_post(&slug).await?;
            Ok(Json(PostResponse::from(post)).into_response())
        }
        None => {
            let posts = state.service().list_posts().await?;
            Ok(Json(posts).into_response())
        }
    }
}

/// `POST /admin/posts` creates a post, or replaces it when `sha` is given.
async fn save_post(
    State(state): State<AppState>,
    payload: Result<Json<SavePostRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (Some(slug), Some(title)) = (non_empty(request.slug), non_empty(request.title)) else {
        return Err(ApiError::BadRequest("slug and title are required".to_string()));
    };

    let body = match (request.blocks, request.content) {
        (Some(blocks), _) => PostBody::Blocks(blocks),
        (None, Some(content)) => PostBody::Markdown(content),
        (None, None) => PostBody::default(),
    };
    let post = BlogPost {
        meta: PostMeta {
            slug: Slug::parse(&slug)?,
            title,
            description: request.description.unwrap_or_default(),
            date: non_empty(request.date).unwrap_or_else(today),
            tags: request.tags.unwrap_or_default(),
            locale: request.locale.unwrap_or_default(),
        },
        body,
    };

    let sha = state
        .service()
        .save_post(&post, VersionToken::from_optional(request.sha))
        .await?;

    Ok(Json(json!({
        "success": true,
        "slug": post.meta.slug,
        "sha": sha,
    })))
}

/// `DELETE /admin/posts?slug=X&sha=Y`. Both parameters are required.
async fn delete_post(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> ApiResult<Json<Value>> {
    let (Some(slug), Some(sha)) = (non_empty(query.slug), non_empty(query.sha)) else {
        return Err(ApiError::BadRequest("slug and sha are required".to_string()));
    };
    let slug = Slug::parse(&slug)?;
    state
        .service()
        .delete_post(&slug, Some(VersionToken::new(sha)))
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /admin/config`. `sha` is null when served from the local checkout.
async fn get_config(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let Versioned { value, sha } = state.service().get_config().await?;
    Ok(Json(json!({ "config": value, "sha": sha })))
}

/// `POST /admin/config` replaces the whole site configuration.
async fn save_config(
    State(state): State<AppState>,
    payload: Result<Json<SaveConfigRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let sha = state
        .service()
        .save_config(&request.config, VersionToken::from_optional(request.sha))
        .await?;
    Ok(Json(json!({ "success": true, "sha": sha })))
}
