//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │       GET|POST /tiles/{entity_type}/{z}/{x}/{y}                 │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │         handlers         │  │           routes            │  │
//! │  │  (requests, responses)   │  │  (router config, tracing)   │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    catalog_handler, health_handler, tile_by_ids_handler, tile_handler, AppState,
    CatalogResponse, ErrorResponse, HealthResponse, TilePathParams, TileQueryParams,
    MVT_CONTENT_TYPE,
};
pub use routes::{create_router, RouterConfig, DEFAULT_CACHE_MAX_AGE};
