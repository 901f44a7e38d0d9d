//! Request validation.
//!
//! A [`QueryRequest`] carries raw client input. [`QueryRequest::validate`]
//! runs the checks below in order, stopping at the first failure:
//!
//! 1. tile coordinates within `[0, 2^zoom)`
//! 2. zoom within `[0, 22]`
//! 3. entity type known
//! 4. geometry column allow-listed (if given)
//! 5. every field path allow-listed (if given)
//!
//! Only a [`ValidatedRequest`] can be turned into a query.

use crate::error::ValidationError;
use crate::tile::{max_tile_index, TileAddress, MAX_ZOOM};

use super::catalog::{field_paths, geometry_column, EntityType, Identifier};

/// Raw tile query parameters as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    /// Logical entity type name (e.g. `odhactivitypoi`)
    pub entity_type: String,

    pub zoom: i64,
    pub x: i64,
    pub y: i64,

    /// Restrict features to this data source. Matched against the row's
    /// `Source` property ignoring case, so `lts` selects `LTS` rows.
    pub source: Option<String>,

    /// Comma-separated dotted paths to project as feature properties
    pub field_selector: Option<String>,

    /// Geometry column to render; defaults to `geo`
    pub geometry_column: Option<String>,

    /// Restrict features to these ids
    pub ids: Option<Vec<String>>,
}

impl QueryRequest {
    /// Create a request for a tile with no filters.
    pub fn new(entity_type: impl Into<String>, zoom: i64, x: i64, y: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            zoom,
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_field_selector(mut self, selector: impl Into<String>) -> Self {
        self.field_selector = Some(selector.into());
        self
    }

    pub fn with_geometry_column(mut self, column: impl Into<String>) -> Self {
        self.geometry_column = Some(column.into());
        self
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Check the request against the tiling scheme and the static
    /// allow-lists.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let address = check_address(self.zoom, self.x, self.y)?;
        let entity_type: EntityType = self.entity_type.parse()?;
        let geometry_column = geometry_column(self.geometry_column.as_deref())?;
        let fields = match self.field_selector.as_deref() {
            Some(selector) => field_paths(selector)?,
            None => Vec::new(),
        };

        Ok(ValidatedRequest {
            entity_type,
            address,
            geometry_column,
            fields,
            source: self.source.clone(),
            ids: self.ids.clone(),
        })
    }
}

/// Validate loose tile request parameters without keeping the result.
pub fn validate(
    entity_type: &str,
    zoom: i64,
    x: i64,
    y: i64,
    source: Option<&str>,
    field_selector: Option<&str>,
    geometry_column: Option<&str>,
) -> Result<(), ValidationError> {
    let request = QueryRequest {
        entity_type: entity_type.to_string(),
        zoom,
        x,
        y,
        source: source.map(str::to_string),
        field_selector: field_selector.map(str::to_string),
        geometry_column: geometry_column.map(str::to_string),
        ids: None,
    };
    request.validate().map(|_| ())
}

/// Coordinates are checked before the zoom range.
fn check_address(zoom: i64, x: i64, y: i64) -> Result<TileAddress, ValidationError> {
    let in_range = |v: i64| matches!(max_tile_index(zoom), Some(max) if (0..=max).contains(&v));
    if !in_range(x) || !in_range(y) {
        return Err(ValidationError::InvalidCoordinates { zoom, x, y });
    }

    if !(0..=i64::from(MAX_ZOOM)).contains(&zoom) {
        return Err(ValidationError::InvalidZoom { zoom });
    }

    // In range after the checks above: zoom <= 22 and x, y < 2^22
    Ok(TileAddress {
        zoom: zoom as u8,
        x: x as u32,
        y: y as u32,
    })
}

/// A request that passed validation.
///
/// Identifiers are allow-list entries; `source` and `ids` remain untrusted
/// values that must only ever be bound as query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    entity_type: EntityType,
    address: TileAddress,
    geometry_column: Identifier,
    fields: Vec<Identifier>,
    source: Option<String>,
    ids: Option<Vec<String>>,
}

impl ValidatedRequest {
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn address(&self) -> TileAddress {
        self.address
    }

    pub fn geometry_column(&self) -> Identifier {
        self.geometry_column
    }

    pub fn fields(&self) -> &[Identifier] {
        &self.fields
    }

    /// Source filter; compared case-insensitively by the query.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }
}
