use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use folio_core::content::{Locale, PostMeta, SiteConfig, Slug};
use folio_core::render::render_body;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Read-only routes the public site renders from. They read the deployed
/// checkout, so anonymous traffic never spends the remote store's quota.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{slug}", get(get_post))
        .route("/api/config", get(get_config))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    locale: Option<Locale>,
}

#[derive(Serialize)]
struct RenderedPost {
    #[serde(flatten)]
    meta: PostMeta,
    html: String,
}

async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PostMeta>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let posts = state.service().published_posts(query.locale).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RenderedPost>> {
    let slug = Slug::parse(&slug)?;
    let post = state.service().published_post(&slug).await?;
    let html = render_body(&post.body);
    Ok(Json(RenderedPost {
        meta: post.meta,
        html,
    }))
}

async fn get_config(State(state): State<AppState>) -> ApiResult<Json<SiteConfig>> {
    let config = state.service().published_config().await?;
    Ok(Json(config))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use folio_core::store::MemoryStore;
    use serde_json::json;

    use crate::routes::test_support::{app_with, send};

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "content/blog/first.json",
                json!({
                    "title": "First",
                    "date": "2024-01-01",
                    "locale": "en",
                    "blocks": [
                        { "type": "paragraph", "data": { "text": "Hello" } },
                        { "type": "code", "data": { "code": "a < b" } }
                    ]
                })
                .to_string(),
            )
            .await;
        store
            .seed(
                "content/blog/second.json",
                json!({ "title": "Second", "date": "2024-03-01", "locale": "ja" }).to_string(),
            )
            .await;
        store
    }

    #[tokio::test]
    async fn lists_without_auth_and_filters_by_locale() {
        let app = app_with(seeded().await);

        let (status, all) = send(&app, Method::GET, "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all[0]["slug"], "second");
        assert_eq!(all[1]["slug"], "first");
        assert!(all[0].get("sha").is_none());

        let (_, en) = send(&app, Method::GET, "/api/posts?locale=en", None, None).await;
        assert_eq!(en.as_array().unwrap().len(), 1);
        assert_eq!(en[0]["title"], "First");

        let (status, _) = send(&app, Method::GET, "/api/posts?locale=fr", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn single_post_is_rendered() {
        let app = app_with(seeded().await);
        let (status, post) = send(&app, Method::GET, "/api/posts/first", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post["slug"], "first");
        assert_eq!(
            post["html"],
            "<p>Hello</p>\n<pre><code>a &lt; b</code></pre>"
        );

        let (status, _) = send(&app, Method::GET, "/api/posts/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_config_is_not_found() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, _) = send(&app, Method::GET, "/api/config", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
