//! # ODH Tile Proxy
//!
//! A vector tile server that proxies tile requests to a PostGIS database.
//!
//! PostGIS does the heavy lifting (reprojection, clipping, simplification and
//! MVT encoding through `ST_AsMVT`). This crate turns a tile address into a
//! web-mercator bounding box, validates every request against static
//! allow-lists, builds a parameterized query and streams the resulting blob
//! back unmodified.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`tile`] - Tile addressing and the tile service
//! - [`query`] - Allow-lists, request validation and query construction
//! - [`store`] - Tile store trait and the PostGIS implementation
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use odh_tile_proxy::{create_router, PgStoreOptions, PgTileStore, RouterConfig, TileService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PgTileStore::connect(&PgStoreOptions::new("postgres://localhost/tourism")).await?;
//!     let router = create_router(TileService::new(store), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod server;
pub mod store;
pub mod tile;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, DatabaseArgs, ServeConfig, SqlConfig};
pub use error::{StoreError, TileError, ValidationError};
pub use query::{
    build_tile_query, validate, EntityType, QueryRequest, QueryValue, TileQuery,
    ValidatedRequest,
};
pub use server::{create_router, AppState, ErrorResponse, RouterConfig, MVT_CONTENT_TYPE};
pub use store::{PgStoreOptions, PgTileStore, TileStore};
pub use tile::{tile_bounds, BoundingBox, TileAddress, TileResponse, TileService};
