//! Test utilities for integration tests.
//!
//! This module provides a mock tile store and helpers for driving the router.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use odh_tile_proxy::error::StoreError;
use odh_tile_proxy::query::TileQuery;
use odh_tile_proxy::store::TileStore;
use odh_tile_proxy::tile::TileService;
use odh_tile_proxy::{create_router, RouterConfig};

/// A minimal valid MVT: one empty layer named "odhactivitypoi".
pub const SAMPLE_TILE: &[u8] = &[
    0x1a, 0x15, 0x78, 0x02, 0x0a, 0x0e, b'o', b'd', b'h', b'a', b'c', b't', b'i', b'v', b'i',
    b't', b'y', b'p', b'o', b'i', 0x28, 0x80, 0x20,
];

// =============================================================================
// Mock Tile Store
// =============================================================================

/// What the mock store answers with.
#[derive(Clone)]
pub enum MockResult {
    Tile(Bytes),
    Empty,
    Fail(StoreError),
}

/// A tile store that records every executed query and returns a fixed result.
#[derive(Clone)]
pub struct MockTileStore {
    result: MockResult,
    queries: Arc<Mutex<Vec<TileQuery>>>,
    request_count: Arc<AtomicUsize>,
}

impl MockTileStore {
    pub fn new(result: MockResult) -> Self {
        Self {
            result,
            queries: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_tile(data: &[u8]) -> Self {
        Self::new(MockResult::Tile(Bytes::copy_from_slice(data)))
    }

    pub fn empty() -> Self {
        Self::new(MockResult::Empty)
    }

    pub fn failing(error: StoreError) -> Self {
        Self::new(MockResult::Fail(error))
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<TileQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> TileQuery {
        self.queries()
            .pop()
            .expect("no query reached the store")
    }
}

#[async_trait]
impl TileStore for MockTileStore {
    async fn fetch_tile(&self, query: &TileQuery) -> Result<Option<Bytes>, StoreError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        match &self.result {
            MockResult::Tile(data) => Ok(Some(data.clone())),
            MockResult::Empty => Ok(None),
            MockResult::Fail(err) => Err(err.clone()),
        }
    }

    async fn ping(&self) -> Result<String, StoreError> {
        Ok("POSTGIS=\"3.4.2\" (mock)".to_string())
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Build a router over a clone of the store, so the caller keeps a handle
/// for inspecting recorded queries.
pub fn router_for(store: &MockTileStore) -> Router {
    create_router(
        TileService::new(store.clone()),
        RouterConfig::new().with_tracing(false),
    )
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn post_json(router: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
