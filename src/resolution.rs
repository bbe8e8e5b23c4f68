//! Grid-resolution recommendation consumed by the core grid service to
//! decide whether a square gets subdivided.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recommended grid-cell size at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GridResolution {
    /// Reserved for urban-density input, which this service does not consume.
    #[serde(rename = "100x100m")]
    Urban100m,
    #[serde(rename = "1x1km")]
    Land1km,
    #[serde(rename = "10x10km")]
    Coastal10km,
    #[serde(rename = "100x100km")]
    OpenOcean100km,
}

/// Maps a land/ocean classification to a recommended resolution.
///
/// Land always gets the finest served tier. Ocean squares far from any coast
/// can stay coarse; near-coast ocean is kept at an intermediate size so
/// shoreline squares subdivide cleanly.
pub fn recommend(is_land: bool, distance_to_coast_km: f64) -> GridResolution {
    if is_land {
        GridResolution::Land1km
    } else if distance_to_coast_km > 1_000.0 {
        GridResolution::OpenOcean100km
    } else {
        GridResolution::Coastal10km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_is_always_fine_grained() {
        assert_eq!(recommend(true, 0.2), GridResolution::Land1km);
        assert_eq!(recommend(true, 5_000.0), GridResolution::Land1km);
    }

    #[test]
    fn open_ocean_is_coarse() {
        assert_eq!(recommend(false, 1_000.1), GridResolution::OpenOcean100km);
    }

    #[test]
    fn coastal_ocean_is_intermediate() {
        assert_eq!(recommend(false, 1_000.0), GridResolution::Coastal10km);
        assert_eq!(recommend(false, 0.5), GridResolution::Coastal10km);
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&GridResolution::Land1km).unwrap(),
            "\"1x1km\""
        );
        assert_eq!(
            serde_json::to_string(&GridResolution::OpenOcean100km).unwrap(),
            "\"100x100km\""
        );
    }
}
