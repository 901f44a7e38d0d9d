//! Spatial data store abstraction.
//!
//! The store is an opaque collaborator that executes a [`TileQuery`] and
//! returns an encoded vector tile, or nothing when no feature intersects the
//! tile. Connection pooling, timeouts and cancellation are the store's
//! concern.
//!
//! # Usage
//!
//! ```ignore
//! use odh_tile_proxy::store::{PgStoreOptions, PgTileStore, TileStore};
//!
//! let store = PgTileStore::connect(&PgStoreOptions::new("postgres://localhost/tourism")).await?;
//! println!("{}", store.ping().await?);
//! ```

mod postgres;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::query::TileQuery;

pub use postgres::{PgStoreOptions, PgTileStore};

/// Executes tile queries against a spatial database.
#[async_trait]
pub trait TileStore: Send + Sync + 'static {
    /// Execute the query and return the encoded tile.
    ///
    /// `Ok(None)` means the query succeeded but produced no features.
    async fn fetch_tile(&self, query: &TileQuery) -> Result<Option<Bytes>, StoreError>;

    /// Round-trip to the store, returning a version string on success.
    async fn ping(&self) -> Result<String, StoreError>;
}
