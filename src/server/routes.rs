//! Router configuration.
//!
//! # Route Structure
//!
//! ```text
//! /health                                   - Health check
//! /catalog                                  - Allow-listed entity types, columns, fields
//! /tiles/{entity_type}/{z}/{x}/{y}          - GET tile, POST tile filtered by ids
//! ```
//!
//! # Example
//!
//! ```ignore
//! use odh_tile_proxy::server::{create_router, RouterConfig};
//! use odh_tile_proxy::tile::TileService;
//!
//! let tile_service = TileService::new(store);
//! let router = create_router(tile_service, RouterConfig::new().with_cache_max_age(600));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    catalog_handler, health_handler, tile_by_ids_handler, tile_handler, AppState,
};
use crate::store::TileStore;
use crate::tile::TileService;

/// Default Cache-Control max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with a 1 hour max-age and tracing on.
    pub fn new() -> Self {
        Self {
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The `{y}` segment accepts `{y}`, `{y}.pbf` and `{y}.mvt`.
pub fn create_router<S>(tile_service: TileService<S>, config: RouterConfig) -> Router
where
    S: TileStore,
{
    let app_state = AppState::with_cache_max_age(tile_service, config.cache_max_age);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/catalog", get(catalog_handler))
        .route(
            "/tiles/{entity_type}/{z}/{x}/{filename}",
            get(tile_handler::<S>).post(tile_by_ids_handler::<S>),
        )
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
