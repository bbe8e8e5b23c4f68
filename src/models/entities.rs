//! Typed records over store documents.
//!
//! Tier documents share a tight structural core and carry tier-specific
//! metadata (population, ISO codes, flag assets, continent, ...) which is
//! passed through unchanged via the flattened `metadata` map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::geometry::Bounds;

/// The four Natural Earth administrative tiers, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    SovereignState,
    Country,
    MapUnit,
    MapSubunit,
}

/// One polygon-bearing administrative entity from any tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminEntity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    pub bounds: Bounds,
    /// GeoJSON text; empty means "excluded from point-in-polygon queries"
    /// while the row stays listable.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub geometry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sovereign_state_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_requirement: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl AdminEntity {
    /// Drops the stored geometry text from the record, the default shape for
    /// resolver and listing responses.
    pub fn without_geometry(mut self) -> Self {
        self.geometry.clear();
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Achievement {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Michelin {
    pub stars: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_awarded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Point of interest. The `landmarks` and `restaurants` collections share
/// this shape; restaurant documents additionally carry `michelin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    pub coordinates: Coordinates,
    /// Achievement trigger radius in integer metres.
    #[serde(default)]
    pub precision_radius_meters: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub landmark_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement: Option<Achievement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub michelin: Option<Michelin>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// One coastline segment. Geometry (LineString/MultiLineString or a
/// representative polygon) stays unparsed; distance uses the bounds centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoastSegment {
    pub id: String,
    #[serde(default)]
    pub is_active: bool,
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub geometry: String,
}
