//! Request validation and tile query construction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   validate()   ┌──────────────────┐  build_tile_query()  ┌───────────┐
//! │ QueryRequest │ ─────────────▶ │ ValidatedRequest │ ───────────────────▶ │ TileQuery │
//! │ (raw input)  │                │ (allow-listed)   │                      │ sql+binds │
//! └──────────────┘                └──────────────────┘                      └───────────┘
//!         │                               ▲
//!         └──────── catalog ──────────────┘
//!           entity types, geometry columns, field selectors
//! ```
//!
//! # Components
//!
//! - [`catalog`]: static allow-lists and the entity type → table mapping
//! - [`QueryRequest`] / [`ValidatedRequest`]: raw and checked request
//! - [`build_tile_query`]: assembles the `ST_AsMVT` statement

pub mod catalog;
mod builder;
mod validation;

pub use builder::{build_tile_query, QueryParam, QueryValue, TileQuery, MVT_BUFFER, MVT_EXTENT};
pub use catalog::{
    field_paths, geometry_column, EntityType, Identifier, DEFAULT_GEOMETRY_COLUMN,
    FIELD_SELECTORS, GEOMETRY_COLUMNS,
};
pub use validation::{validate, QueryRequest, ValidatedRequest};
