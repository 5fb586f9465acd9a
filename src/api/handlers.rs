//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::ExpiringCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, KeysResponse,
    PurgeResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::store::KeyValueStore;

/// Application state shared across all handlers.
///
/// The cache is built once at startup and shared; it needs no outer lock.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ExpiringCache>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ExpiringCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration over `store`.
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(ExpiringCache::new(store, config.cache_config()))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /cache/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    check_key(&key)?;
    state.cache.set(&key, &req.value).await;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for GET /cache/:key
///
/// Absent, expired and unreadable entries all answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;
    let entry = state
        .cache
        .get_entry::<Value>(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, entry)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;
    state.cache.clear(Some(key.as_str())).await;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear(None).await;
    Json(ClearResponse::new(&state.cache.config().prefix))
}

/// Handler for GET /cache
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse {
        keys: state.cache.keys().await,
    })
}

/// Handler for POST /cache/purge
pub async fn purge_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    Json(PurgeResponse {
        removed: state.cache.purge_expired().await,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
