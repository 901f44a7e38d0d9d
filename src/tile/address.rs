//! Tile addressing in the spherical-mercator (EPSG:3857) tiling scheme.
//!
//! Tiles are addressed by an XYZ triple with the origin in the top-left
//! corner: `x` grows eastwards and `y` grows southwards.

use std::f64::consts::PI;
use std::fmt;

/// WGS84 semi-major axis in meters, used as the sphere radius.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half the equatorial circumference in meters.
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;

/// Deepest zoom level the service accepts.
pub const MAX_ZOOM: u8 = 22;

/// EPSG code of the projected coordinate system the bounds are expressed in.
pub const WEB_MERCATOR_SRID: i32 = 3857;

/// A validated tile address.
///
/// Construct through request validation; see
/// [`QueryRequest::validate`](crate::query::QueryRequest::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileAddress {
    /// Bounding box of this tile in web-mercator meters.
    pub fn bounds(&self) -> BoundingBox {
        tile_bounds(self.x, self.y, self.zoom)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Axis-aligned rectangle in a projected (metric) coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Width (and height) of a tile in meters at the given zoom.
pub fn tile_size(zoom: u8) -> f64 {
    2.0 * ORIGIN_SHIFT / 2f64.powi(i32::from(zoom))
}

/// Compute the web-mercator bounds of tile `(x, y)` at `zoom`.
///
/// Total for every zoom; range checking `x` and `y` against `[0, 2^zoom)` is
/// the caller's job.
pub fn tile_bounds(x: u32, y: u32, zoom: u8) -> BoundingBox {
    let size = tile_size(zoom);
    let x = f64::from(x);
    let y = f64::from(y);

    BoundingBox {
        xmin: x * size - ORIGIN_SHIFT,
        ymin: ORIGIN_SHIFT - (y + 1.0) * size,
        xmax: (x + 1.0) * size - ORIGIN_SHIFT,
        ymax: ORIGIN_SHIFT - y * size,
    }
}

/// Highest valid column/row index at `zoom`, i.e. `2^zoom - 1`.
///
/// Returns `None` for a negative zoom, where no index is valid. Zooms too
/// large for an `i64` saturate to `i64::MAX`.
pub fn max_tile_index(zoom: i64) -> Option<i64> {
    if zoom < 0 {
        return None;
    }
    if zoom >= 63 {
        return Some(i64::MAX);
    }
    Some((1i64 << zoom) - 1)
}
