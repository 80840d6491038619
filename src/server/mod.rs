// src/server/mod.rs

//! Read API over the item store.
//!
//! Every listing route goes through the store's cache-aside accessor with a
//! shared TTL. A cache write-back failure is logged and the freshly computed
//! result is still served; only compute/store failures become 500s.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::models::{ItemDetail, ItemKind, ItemListing};
use crate::storage::ItemStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    store: ItemStore,
    cache_ttl: Duration,
}

/// Build the read API router.
pub fn router(store: ItemStore, cache_ttl: Duration) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/items", get(all_items))
        .route("/items/{id}", get(item_by_id))
        .route("/posts", get(all_posts))
        .route("/stories", get(stories))
        .route("/jobs", get(jobs))
        .with_state(AppState { store, cache_ttl })
}

/// Bind and serve the read API until the process is stopped.
pub async fn serve(store: ItemStore, config: &ServerConfig) -> Result<()> {
    let app = router(store, Duration::from_secs(config.cache_ttl_secs));
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;

    log::info!("Read API listening on {}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(BTreeMap::from([
        ("items", "/items"),
        ("posts", "/posts"),
        ("stories", "/stories"),
        ("jobs", "/jobs"),
    ]))
}

async fn all_items(State(state): State<AppState>) -> Response<Vec<ItemListing>> {
    let store = state.store.clone();
    let mut data = Vec::new();
    let result = state
        .store
        .cache("items", state.cache_ttl, &mut data, || async move {
            let ids = store.all_items().await?;
            Ok(ids.into_iter().map(ItemListing::new).collect())
        })
        .await;
    respond(data, result)
}

async fn all_posts(State(state): State<AppState>) -> Response<Vec<ItemListing>> {
    post_listing(state, "posts", None).await
}

async fn stories(State(state): State<AppState>) -> Response<Vec<ItemListing>> {
    post_listing(state, "stories", Some(ItemKind::Story)).await
}

async fn jobs(State(state): State<AppState>) -> Response<Vec<ItemListing>> {
    post_listing(state, "jobs", Some(ItemKind::Job)).await
}

async fn item_by_id(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> std::result::Result<Json<ItemDetail>, StatusCode> {
    let store = state.store.clone();
    let cache_key = format!("item/{id}");

    let mut data: Option<ItemDetail> = None;
    let result = state
        .store
        .cache(&cache_key, state.cache_ttl, &mut data, || async move {
            Ok(store.item(id).await?.as_ref().map(ItemDetail::from))
        })
        .await;

    match respond(data, result) {
        Ok(Json(Some(detail))) => Ok(Json(detail)),
        Ok(Json(None)) => Err(StatusCode::NOT_FOUND),
        Err(status) => Err(status),
    }
}

type Response<T> = std::result::Result<Json<T>, StatusCode>;

async fn post_listing(
    state: AppState,
    cache_key: &str,
    kind: Option<ItemKind>,
) -> Response<Vec<ItemListing>> {
    let store = state.store.clone();
    let mut data = Vec::new();
    let result = state
        .store
        .cache(cache_key, state.cache_ttl, &mut data, || async move {
            let ids = store.posts(kind).await?;
            Ok(ids.into_iter().map(ItemListing::new).collect())
        })
        .await;
    respond(data, result)
}

/// Map an accessor outcome to an HTTP response.
///
/// A write-back failure leaves `data` populated, so it is served with a
/// warning; anything else is a 500.
fn respond<T>(data: T, result: Result<()>) -> Response<T> {
    match result {
        Ok(()) => Ok(Json(data)),
        Err(AppError::CacheWriteBack { key, source }) => {
            log::warn!("Serving uncached result, write-back failed for {key}: {source}");
            Ok(Json(data))
        }
        Err(error) => {
            log::error!("Read query failed: {error}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::models::Item;
    use crate::storage::MemoryBackend;

    async fn seed(store: &ItemStore) {
        for (id, kind) in [
            (1, ItemKind::Story),
            (2, ItemKind::Job),
            (3, ItemKind::Comment),
        ] {
            store
                .save_item(&Item {
                    id,
                    kind,
                    by: "tester".to_string(),
                    time: 1,
                    title: format!("item {id}"),
                    text: String::new(),
                    url: String::new(),
                    score: 1,
                    descendants: 0,
                    parent: None,
                    kids: Vec::new(),
                    parts: Vec::new(),
                    poll: None,
                    deleted: false,
                    dead: false,
                })
                .await
                .unwrap();
        }
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn app() -> Router {
        let store = ItemStore::new(Arc::new(MemoryBackend::new()));
        seed(&store).await;
        router(store, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_index_lists_routes() {
        let app = app().await;
        let (status, body) = get_json(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"], "/jobs");
    }

    #[tokio::test]
    async fn test_items_lists_every_kind() {
        let app = app().await;
        let (status, body) = get_json(&app, "/items").await;

        assert_eq!(status, StatusCode::OK);
        let listings = body.as_array().unwrap();
        assert_eq!(listings.len(), 3);
        assert!(listings.iter().any(|l| l["location"] == "/items/3"));
    }

    #[tokio::test]
    async fn test_jobs_filters_to_job_kind() {
        let app = app().await;
        let (status, body) = get_json(&app, "/jobs").await;

        assert_eq!(status, StatusCode::OK);
        let listings = body.as_array().unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_posts_exclude_comments() {
        let app = app().await;
        let (_, body) = get_json(&app, "/posts").await;

        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        assert!(!ids.contains(&3));
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_item_detail_and_not_found() {
        let app = app().await;

        let (status, body) = get_json(&app, "/items/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "story");

        let (status, _) = get_json(&app, "/items/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
