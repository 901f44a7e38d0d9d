//! Static allow-lists for everything that ends up as text inside a query.
//!
//! Entity types, geometry columns and field selectors are closed sets fixed
//! at compile time. Values that pass these lists are handed out as
//! [`Identifier`]s, the only kind of text the query builder interpolates.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Geometry columns a request may select.
pub const GEOMETRY_COLUMNS: &[&str] = &["geo", "gen_position", "geometry"];

/// Geometry column used when a request does not name one.
pub const DEFAULT_GEOMETRY_COLUMN: &str = "geo";

/// Dotted paths into the JSON `data` document that may be projected into
/// tile feature properties.
pub const FIELD_SELECTORS: &[&str] = &[
    "Id",
    "Active",
    "Shortname",
    "Source",
    "Type",
    "SubType",
    "HasLanguage",
    "LastChange",
    "Detail.de.Title",
    "Detail.it.Title",
    "Detail.en.Title",
    "Detail.ld.Title",
    "ContactInfos.de.City",
    "ContactInfos.it.City",
    "ContactInfos.en.City",
    "LocationInfo.MunicipalityInfo.Id",
    "LocationInfo.DistrictInfo.Id",
    "LocationInfo.RegionInfo.Id",
    "LocationInfo.TvInfo.Id",
    "AdditionalPoiInfos.de.MainType",
    "AdditionalPoiInfos.de.SubType",
    "AccoTypeId",
    "AccoCategoryId",
    "DateBegin",
    "DateEnd",
];

/// A SQL identifier or path taken from one of the static allow-lists.
///
/// Cannot be built from a runtime string; every instance borrows a
/// `'static` allow-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier(&'static str);

impl Identifier {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Logical entity types served as tile layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Accommodation,
    OdhActivityPoi,
    Event,
    EventShort,
    Venue,
    WebcamInfo,
    MeasuringPoint,
    SkiArea,
    Region,
    Municipality,
    District,
    TourismAssociation,
}

impl EntityType {
    /// Every entity type, in catalog order.
    pub const ALL: &'static [EntityType] = &[
        EntityType::Accommodation,
        EntityType::OdhActivityPoi,
        EntityType::Event,
        EntityType::EventShort,
        EntityType::Venue,
        EntityType::WebcamInfo,
        EntityType::MeasuringPoint,
        EntityType::SkiArea,
        EntityType::Region,
        EntityType::Municipality,
        EntityType::District,
        EntityType::TourismAssociation,
    ];

    /// Public name used in request paths and as the MVT layer name.
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Accommodation => "accommodation",
            EntityType::OdhActivityPoi => "odhactivitypoi",
            EntityType::Event => "event",
            EntityType::EventShort => "eventshort",
            EntityType::Venue => "venue",
            EntityType::WebcamInfo => "webcaminfo",
            EntityType::MeasuringPoint => "measuringpoint",
            EntityType::SkiArea => "skiarea",
            EntityType::Region => "region",
            EntityType::Municipality => "municipality",
            EntityType::District => "district",
            EntityType::TourismAssociation => "tourismassociation",
        }
    }

    /// Physical table holding rows of this type.
    pub fn table(self) -> Identifier {
        Identifier(match self {
            EntityType::Accommodation => "accommodations",
            EntityType::OdhActivityPoi => "smgpois",
            EntityType::Event => "events",
            EntityType::EventShort => "eventeuracnoi",
            EntityType::Venue => "venues_v2",
            EntityType::WebcamInfo => "webcams",
            EntityType::MeasuringPoint => "measuringpoints",
            EntityType::SkiArea => "skiareas",
            EntityType::Region => "regions",
            EntityType::Municipality => "municipalities",
            EntityType::District => "districts",
            EntityType::TourismAssociation => "tvs",
        })
    }
}

impl FromStr for EntityType {
    type Err = ValidationError;

    /// Resolve a public name, ignoring ASCII case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|entity| entity.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::UnknownEntityType {
                name: name.to_string(),
            })
    }
}

impl Serialize for EntityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a requested geometry column against [`GEOMETRY_COLUMNS`].
///
/// `None` selects [`DEFAULT_GEOMETRY_COLUMN`].
pub fn geometry_column(requested: Option<&str>) -> Result<Identifier, ValidationError> {
    let Some(requested) = requested else {
        return Ok(Identifier(DEFAULT_GEOMETRY_COLUMN));
    };

    GEOMETRY_COLUMNS
        .iter()
        .find(|column| **column == requested)
        .map(|column| Identifier(*column))
        .ok_or_else(|| ValidationError::InvalidGeometryColumn {
            column: requested.to_string(),
        })
}

/// Resolve a comma-separated list of dotted paths against
/// [`FIELD_SELECTORS`].
///
/// Surrounding whitespace is ignored, duplicates are dropped, and an empty
/// path fails the whole selector.
pub fn field_paths(selector: &str) -> Result<Vec<Identifier>, ValidationError> {
    let mut paths: Vec<Identifier> = Vec::new();

    for requested in selector.split(',').map(str::trim) {
        let path = FIELD_SELECTORS
            .iter()
            .find(|path| **path == requested)
            .map(|path| Identifier(*path))
            .ok_or_else(|| ValidationError::InvalidFieldSelector {
                selector: selector.to_string(),
            })?;

        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    Ok(paths)
}
