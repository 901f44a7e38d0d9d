use thiserror::Error;

/// Client-input errors raised while validating a tile request.
///
/// Every variant is terminal for the request and is raised before any query
/// reaches the data store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tile column or row outside `[0, 2^zoom)`
    #[error("Invalid tile coordinates: x={x}, y={y} at zoom {zoom}")]
    InvalidCoordinates { zoom: i64, x: i64, y: i64 },

    /// Tile row segment is not an integer (optionally with `.pbf`/`.mvt`)
    #[error("Invalid tile coordinates: x={x}, y={row:?} at zoom {zoom}")]
    InvalidRow { zoom: i64, x: i64, row: String },

    /// Zoom outside `[0, 22]`
    #[error("Invalid zoom level: {zoom} (valid range: 0-{max})", max = crate::tile::MAX_ZOOM)]
    InvalidZoom { zoom: i64 },

    /// Entity type has no table mapping
    #[error("Unknown entity type: {name}")]
    UnknownEntityType { name: String },

    /// Geometry column is not on the allow-list
    #[error("Invalid geometry column: {column}")]
    InvalidGeometryColumn { column: String },

    /// One of the selected field paths is not on the allow-list
    #[error("Invalid field selector: {selector}")]
    InvalidFieldSelector { selector: String },
}

impl ValidationError {
    /// Stable machine-readable identifier used in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidCoordinates { .. } | ValidationError::InvalidRow { .. } => {
                "invalid_coordinates"
            }
            ValidationError::InvalidZoom { .. } => "invalid_zoom",
            ValidationError::UnknownEntityType { .. } => "unknown_entity_type",
            ValidationError::InvalidGeometryColumn { .. } => "invalid_geometry_column",
            ValidationError::InvalidFieldSelector { .. } => "invalid_field_selector",
        }
    }
}

/// Errors returned by the spatial data store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Pool exhausted, connection refused or timed out
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed to execute the query
    #[error("Query error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Connection(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Errors that can occur while serving a tile.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Request rejected by validation (HTTP 400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store execution failed (HTTP 500)
    #[error("Store execution failed: {0}")]
    Store(#[from] StoreError),
}
