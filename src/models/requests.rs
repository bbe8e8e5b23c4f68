use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct PointQuery {
    #[validate(custom(function = "crate::validation::validate_lat"))]
    pub lat: f64,
    #[validate(custom(function = "crate::validation::validate_lon"))]
    pub lon: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BoundariesQuery {
    #[validate(custom(function = "crate::validation::validate_lat"))]
    pub lat: f64,
    #[validate(custom(function = "crate::validation::validate_lon"))]
    pub lon: f64,
    /// Stored geometry is stripped from resolver output unless requested.
    #[serde(default)]
    pub include_geometry: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(custom(function = "crate::validation::validate_lat"))]
    pub lat: f64,
    #[validate(custom(function = "crate::validation::validate_lon"))]
    pub lon: f64,
    /// Search radius in metres.
    #[serde(default = "default_radius_m")]
    pub radius: f64,
    #[serde(default = "default_nearby_limit")]
    pub limit: usize,
}

fn default_radius_m() -> f64 {
    1_000.0
}

fn default_nearby_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct LandmarkListQuery {
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub landmark_type: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// Listing parameters shared by the four tier collections; the parent-id
/// filters that do not apply to a tier are simply never populated.
#[derive(Debug, Deserialize)]
pub struct TierListQuery {
    pub limit: Option<usize>,
    pub sovereign_state_id: Option<String>,
    pub country_id: Option<String>,
    pub map_unit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkCountriesQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SquarePoint {
    pub lat: f64,
    pub lon: f64,
    pub square_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchLookupRequest {
    #[validate(length(min = 1, max = 1000, message = "Must contain between 1 and 1000 points"))]
    pub points: Vec<SquarePoint>,
    /// Opt-in: derive ocean resolutions from the coastline classifier.
    #[serde(default)]
    pub include_coastline: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchClassifyRequest {
    #[validate(length(min = 1, max = 1000, message = "Must contain between 1 and 1000 points"))]
    pub points: Vec<PointQuery>,
}
