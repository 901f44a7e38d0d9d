//! Tile query assembly.
//!
//! The generated statement has two kinds of inputs kept strictly apart:
//!
//! - [`Identifier`]s (table, geometry column, field paths) are written into
//!   the SQL text. They only ever come from the static allow-lists.
//! - [`QueryValue`]s (tile bounds, source, ids) are bound as positional
//!   parameters and never appear in the SQL text.

use crate::tile::WEB_MERCATOR_SRID;

use super::catalog::Identifier;
use super::validation::ValidatedRequest;

/// Tile extent in screen space units passed to `ST_AsMVT`.
pub const MVT_EXTENT: u32 = 4096;

/// Clip buffer around the tile in screen space units.
pub const MVT_BUFFER: u32 = 256;

/// Name of the tile geometry column inside the MVT sub-select.
const GEOMETRY_ALIAS: &str = "geom";

/// A value bound to a query placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Float(f64),
    Text(String),
    TextArray(Vec<String>),
}

/// A named parameter and the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub name: &'static str,
    pub value: QueryValue,
}

/// SQL text plus its bound parameters, in placeholder order.
///
/// Parameter `i` (zero-based) is referenced as `$i+1` in the SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct TileQuery {
    sql: String,
    params: Vec<QueryParam>,
}

impl TileQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Look up a bound value by parameter name.
    pub fn param(&self, name: &str) -> Option<&QueryValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Positional placeholder (`$n`) of a named parameter.
    pub fn placeholder(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .position(|p| p.name == name)
            .map(|i| format!("${}", i + 1))
    }
}

/// Collects bound parameters and hands out their placeholders.
#[derive(Default)]
struct Params(Vec<QueryParam>);

impl Params {
    fn bind(&mut self, name: &'static str, value: QueryValue) -> String {
        self.0.push(QueryParam { name, value });
        format!("${}", self.0.len())
    }
}

/// Build the MVT query for a validated request.
pub fn build_tile_query(request: &ValidatedRequest) -> TileQuery {
    let bbox = request.address().bounds();
    let table = request.entity_type().table();
    let layer = request.entity_type().name();
    let geo = request.geometry_column();

    let mut params = Params::default();
    let xmin = params.bind("xmin", QueryValue::Float(bbox.xmin));
    let ymin = params.bind("ymin", QueryValue::Float(bbox.ymin));
    let xmax = params.bind("xmax", QueryValue::Float(bbox.xmax));
    let ymax = params.bind("ymax", QueryValue::Float(bbox.ymax));

    let envelope = format!(
        "ST_MakeEnvelope({}, {}, {}, {}, {})",
        xmin, ymin, xmax, ymax, WEB_MERCATOR_SRID
    );

    let mut columns = vec!["t.id".to_string()];
    columns.extend(request.fields().iter().map(|path| field_projection(*path)));
    columns.push(format!(
        "ST_AsMVTGeom(ST_Transform(t.{geo}, {srid}), {envelope}, {extent}, {buffer}, true) AS {alias}",
        srid = WEB_MERCATOR_SRID,
        extent = MVT_EXTENT,
        buffer = MVT_BUFFER,
        alias = GEOMETRY_ALIAS,
    ));

    // The envelope is reprojected into the row's SRID so a spatial index on
    // the stored geometry can be used.
    let mut predicates = vec![
        format!("t.{} IS NOT NULL", geo),
        format!(
            "ST_Intersects(t.{geo}, ST_Transform({envelope}, ST_SRID(t.{geo})))"
        ),
    ];

    // Source values in the data are not consistently cased.
    if let Some(source) = request.source() {
        let placeholder = params.bind("source", QueryValue::Text(source.to_string()));
        predicates.push(format!("lower(t.data->>'Source') = lower({})", placeholder));
    }

    if let Some(ids) = request.ids() {
        let placeholder = params.bind("ids", QueryValue::TextArray(ids.to_vec()));
        predicates.push(format!("t.id = ANY({})", placeholder));
    }

    let sql = format!(
        "SELECT ST_AsMVT(tile, '{layer}', {extent}, '{alias}') FROM (\
         SELECT {columns} FROM {table} AS t WHERE {predicates}\
         ) AS tile WHERE tile.{alias} IS NOT NULL",
        extent = MVT_EXTENT,
        alias = GEOMETRY_ALIAS,
        columns = columns.join(", "),
        predicates = predicates.join(" AND "),
    );

    TileQuery {
        sql,
        params: params.0,
    }
}

/// `Detail.de.Title` becomes `t.data#>>'{Detail,de,Title}' AS "Detail.de.Title"`.
fn field_projection(path: Identifier) -> String {
    let segments = path.as_str().replace('.', ",");
    format!("t.data#>>'{{{}}}' AS \"{}\"", segments, path)
}
