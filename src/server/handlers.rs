//! HTTP request handlers for the vector tile API.
//!
//! # Endpoints
//!
//! - `GET /tiles/{entity_type}/{z}/{x}/{y}` - Serve a tile
//! - `POST /tiles/{entity_type}/{z}/{x}/{y}` - Serve a tile restricted to a JSON list of ids
//! - `GET /catalog` - List the allow-listed entity types, columns and fields
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{TileError, ValidationError};
use crate::query::{
    EntityType, QueryRequest, DEFAULT_GEOMETRY_COLUMN, FIELD_SELECTORS, GEOMETRY_COLUMNS,
};
use crate::store::TileStore;
use crate::tile::TileService;

/// Media type of Mapbox Vector Tiles.
pub const MVT_CONTENT_TYPE: &str = "application/vnd.mapbox-vector-tile";

/// Extensions accepted after the tile row in request paths.
const TILE_EXTENSIONS: &[&str] = &[".pbf", ".mvt"];

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: TileStore> {
    /// The tile service for processing tile requests
    pub tile_service: Arc<TileService<S>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,
}

impl<S: TileStore> AppState<S> {
    pub fn new(tile_service: TileService<S>) -> Self {
        Self::with_cache_max_age(tile_service, 3600)
    }

    pub fn with_cache_max_age(tile_service: TileService<S>, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }

    fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }
}

impl<S: TileStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{entity_type}/{z}/{x}/{filename}`
/// where filename is `{y}`, `{y}.pbf` or `{y}.mvt`
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Logical entity type (e.g. "odhactivitypoi")
    pub entity_type: String,

    /// Zoom level
    pub z: i64,

    /// Tile column
    pub x: i64,

    /// Tile row with optional extension (e.g. "6333" or "6333.pbf")
    pub filename: String,
}

impl TilePathParams {
    /// Parse the tile row from the filename, stripping any known extension.
    pub fn y(&self) -> Result<i64, std::num::ParseIntError> {
        let y = TILE_EXTENSIONS
            .iter()
            .find_map(|ext| self.filename.strip_suffix(ext))
            .unwrap_or(self.filename.as_str());
        y.parse()
    }
}

/// Query parameters for tile requests.
///
/// Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TileQueryParams {
    /// Only include features from this data source
    #[serde(default)]
    pub source: Option<String>,

    /// Comma-separated dotted field paths to include as feature properties
    #[serde(default, rename = "fieldselector", alias = "fields")]
    pub field_selector: Option<String>,

    /// Geometry column to render (default: geo)
    #[serde(default, rename = "geocolumn")]
    pub geometry_column: Option<String>,
}

impl TileQueryParams {
    fn into_request(self, path: &TilePathParams, y: i64) -> QueryRequest {
        QueryRequest {
            entity_type: path.entity_type.clone(),
            zoom: path.z,
            x: path.x,
            y,
            source: non_empty(self.source),
            field_selector: non_empty(self.field_selector),
            geometry_column: non_empty(self.geometry_column),
            ids: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_zoom", "store_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Allow-lists a client can choose from.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub entity_types: Vec<EntityType>,
    pub geometry_columns: Vec<&'static str>,
    pub default_geometry_column: &'static str,
    pub field_selectors: Vec<&'static str>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TileError to HTTP response.
///
/// Validation failures are 400 and logged at WARN. Store failures are 500,
/// logged at ERROR with the underlying cause, and answered with a generic
/// message.
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            TileError::Validation(err) => (StatusCode::BAD_REQUEST, err.kind(), err.to_string()),
            TileError::Store(err) => {
                error!(error = %err, "Tile store execution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "Failed to render tile".to_string(),
                )
            }
        };

        if status.is_client_error() {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{entity_type}/{z}/{x}/{y}`
///
/// # Query Parameters
///
/// - `source`: Only include features from this source
/// - `fieldselector`: Comma-separated field paths (e.g. `Detail.de.Title,Shortname`)
/// - `geocolumn`: Geometry column (`geo`, `gen_position` or `geometry`)
///
/// # Response
///
/// - `200 OK`: Tile bytes with `Content-Type: application/vnd.mapbox-vector-tile`
/// - `204 No Content`: No feature intersects the tile
/// - `400 Bad Request`: Validation failed
/// - `500 Internal Server Error`: Store failure
pub async fn tile_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    Path(params): Path<TilePathParams>,
    Query(query): Query<TileQueryParams>,
) -> Result<Response, TileError> {
    let request = build_request(&params, query)?;
    serve_tile(&state, request).await
}

/// Handle tile requests restricted to a set of ids.
///
/// # Endpoint
///
/// `POST /tiles/{entity_type}/{z}/{x}/{y}`
///
/// Same query parameters and responses as [`tile_handler`]. The body is a
/// JSON array of id strings:
///
/// ```json
/// ["SMGPOI1", "SMGPOI2"]
/// ```
pub async fn tile_by_ids_handler<S: TileStore>(
    State(state): State<AppState<S>>,
    Path(params): Path<TilePathParams>,
    Query(query): Query<TileQueryParams>,
    Json(ids): Json<Vec<String>>,
) -> Result<Response, TileError> {
    let request = build_request(&params, query)?.with_ids(ids);
    serve_tile(&state, request).await
}

fn build_request(
    params: &TilePathParams,
    query: TileQueryParams,
) -> Result<QueryRequest, TileError> {
    let y = params.y().map_err(|_| ValidationError::InvalidRow {
        zoom: params.z,
        x: params.x,
        row: params.filename.clone(),
    })?;
    Ok(query.into_request(params, y))
}

async fn serve_tile<S: TileStore>(
    state: &AppState<S>,
    request: QueryRequest,
) -> Result<Response, TileError> {
    let response = state.tile_service.get_tile(&request).await?;
    let cache_control = state.cache_control();

    let http_response = match response.data {
        Some(tile) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, MVT_CONTENT_TYPE.to_string()),
                (header::CACHE_CONTROL, cache_control),
            ],
            tile,
        )
            .into_response(),
        None => (
            StatusCode::NO_CONTENT,
            [(header::CACHE_CONTROL, cache_control)],
        )
            .into_response(),
    };

    Ok(http_response)
}

/// Handle catalog requests.
///
/// # Endpoint
///
/// `GET /catalog`
pub async fn catalog_handler() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        entity_types: EntityType::ALL.to_vec(),
        geometry_columns: GEOMETRY_COLUMNS.to_vec(),
        default_geometry_column: DEFAULT_GEOMETRY_COLUMN,
        field_selectors: FIELD_SELECTORS.to_vec(),
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
