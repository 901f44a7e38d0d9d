//! Tile layer.
//!
//! This module provides tile addressing and the service that turns a tile
//! request into an encoded vector tile.
//!
//! # Architecture
//!
//! The tile service sits between the HTTP layer and the tile store:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  validation  │  │  TileAddress →  │  │
//! │  │  + query     │  │  BoundingBox    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          TileStore (PostGIS)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use odh_tile_proxy::tile::tile_bounds;
//!
//! let world = tile_bounds(0, 0, 0);
//! assert!((world.xmax - 20037508.34).abs() < 0.01);
//! ```

mod address;
mod service;

pub use address::{
    max_tile_index, tile_bounds, tile_size, BoundingBox, TileAddress, EARTH_RADIUS, MAX_ZOOM,
    ORIGIN_SHIFT, WEB_MERCATOR_SRID,
};
pub use service::{TileResponse, TileService};
