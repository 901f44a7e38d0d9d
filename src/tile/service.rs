//! Tile Service for orchestrating tile requests.
//!
//! The TileService is the main entry point for tile requests. It orchestrates:
//! - Request validation against the static allow-lists
//! - Tile address → bounding box conversion
//! - Query construction
//! - Execution against the tile store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_tile()                           │    │
//! │  │  1. Validate request   3. Build query                   │    │
//! │  │  2. Compute bounds     4. Execute & return blob         │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │           │
//! │           ▼                    ▼                    ▼           │
//! │    ┌────────────┐      ┌──────────────┐     ┌─────────────┐     │
//! │    │  validate  │      │ tile_bounds  │     │  TileStore  │     │
//! │    └────────────┘      └──────────────┘     └─────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::error::TileError;
use crate::query::{build_tile_query, EntityType, QueryRequest, TileQuery, ValidatedRequest};
use crate::store::TileStore;

use super::TileAddress;

// =============================================================================
// Tile Response
// =============================================================================

/// Response from the tile service.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// The encoded vector tile, or `None` when no feature intersects the tile
    pub data: Option<Bytes>,

    /// Entity type the tile was rendered for
    pub entity_type: EntityType,

    /// Address of the rendered tile
    pub address: TileAddress,
}

impl TileResponse {
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service for validating tile requests and fetching tiles from a store.
///
/// Stateless apart from the shared store handle; safe to call from any
/// number of tasks concurrently.
///
/// # Type Parameters
///
/// * `S` - The tile store (e.g. [`PgTileStore`](crate::store::PgTileStore))
///
/// # Example
///
/// ```ignore
/// use odh_tile_proxy::query::QueryRequest;
/// use odh_tile_proxy::tile::TileService;
///
/// let service = TileService::new(store);
/// let request = QueryRequest::new("odhactivitypoi", 14, 8723, 5807);
/// let response = service.get_tile(&request).await?;
///
/// match response.data {
///     Some(tile) => println!("{} bytes", tile.len()),
///     None => println!("empty tile"),
/// }
/// ```
pub struct TileService<S: TileStore> {
    store: Arc<S>,
}

impl<S: TileStore> TileService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a tile service sharing an existing store handle.
    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate the request and prepare its query without executing it.
    ///
    /// Nothing reaches the store unless this succeeds.
    pub fn prepare(
        &self,
        request: &QueryRequest,
    ) -> Result<(ValidatedRequest, TileQuery), TileError> {
        let validated = request.validate()?;
        let query = build_tile_query(&validated);
        Ok((validated, query))
    }

    /// Get a tile.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Validation fails (nothing is sent to the store)
    /// - The store fails to execute the query
    #[instrument(skip_all, fields(entity = %request.entity_type, z = request.zoom, x = request.x, y = request.y))]
    pub async fn get_tile(&self, request: &QueryRequest) -> Result<TileResponse, TileError> {
        let (validated, query) = self.prepare(request)?;

        debug!(
            table = %validated.entity_type().table(),
            params = query.params().len(),
            "Executing tile query"
        );

        let data = self.store.fetch_tile(&query).await?;

        Ok(TileResponse {
            data,
            entity_type: validated.entity_type(),
            address: validated.address(),
        })
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

// =============================================================================
// Tests
// =============================================================================
