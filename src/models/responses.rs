use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::geometry::Bounds;
use crate::models::entities::{AdminEntity, Landmark, Rarity, Tier};
use crate::resolution::GridResolution;

/// Listing envelope: `{<plural key>: [...], "count": n}`.
pub fn list_envelope<T: Serialize>(key: &str, items: &[T]) -> Value {
    json!({ key: items, "count": items.len() })
}

/// One resolver match, tagged with the tier it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBoundary {
    pub tier: Tier,
    #[serde(flatten)]
    pub entity: AdminEntity,
}

/// Resolver output grouped per tier; flattened into `boundaries[]` in
/// sovereign_state -> country -> map_unit -> map_subunit order on the wire.
#[derive(Debug, Default)]
pub struct TierMatches {
    pub sovereign_states: Vec<AdminEntity>,
    pub countries: Vec<AdminEntity>,
    pub map_units: Vec<AdminEntity>,
    pub map_subunits: Vec<AdminEntity>,
}

impl TierMatches {
    pub fn is_empty(&self) -> bool {
        self.sovereign_states.is_empty()
            && self.countries.is_empty()
            && self.map_units.is_empty()
            && self.map_subunits.is_empty()
    }

    /// Matches in tier order, each tagged with its tier.
    pub fn into_boundaries(self) -> Vec<ResolvedBoundary> {
        let tag = |tier: Tier, entities: Vec<AdminEntity>| {
            entities
                .into_iter()
                .map(move |entity| ResolvedBoundary { tier, entity })
        };
        tag(Tier::SovereignState, self.sovereign_states)
            .chain(tag(Tier::Country, self.countries))
            .chain(tag(Tier::MapUnit, self.map_units))
            .chain(tag(Tier::MapSubunit, self.map_subunits))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PointPayload {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassifyPayload {
    /// `land` or `ocean`.
    #[serde(rename = "type")]
    pub surface: String,
    pub is_land: bool,
    pub distance_to_coast_km: f64,
    pub grid_resolution: GridResolution,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoastDistancePayload {
    pub distance_km: f64,
    pub nearest_point: PointPayload,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrichmentResult {
    pub square_id: String,
    pub boundary_tags: Vec<String>,
    pub resolution: String,
    pub landmarks_nearby: Vec<String>,
}

/// Landmark augmented with its great-circle distance from the query point.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyLandmark {
    #[serde(flatten)]
    pub landmark: Landmark,
    pub distance_meters: f64,
}

/// One row of the deduplicated country universe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkCountry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    pub flag_url: String,
    pub is_territory: bool,
    pub sovereign_state_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkCountriesPayload {
    pub countries: Vec<BulkCountry>,
    pub count: usize,
    pub user_id: Option<String>,
    /// Reserved for a future user-context integration.
    pub visited_count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountryPolygon {
    pub id: String,
    pub name: String,
    pub geometry: String,
    pub bounds: Bounds,
}

/// Achievement catalog row, projected from a landmark or restaurant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AchievementDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: i64,
    pub rarity: Rarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    pub precision_radius_meters: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_carries_plural_key_and_count() {
        let out = list_envelope("countries", &["a", "b"]);
        assert_eq!(out["count"], 2);
        assert_eq!(out["countries"], json!(["a", "b"]));
    }

    #[test]
    fn boundaries_flatten_in_tier_order() {
        let entity = |id: &str| AdminEntity {
            id: id.into(),
            name: id.into(),
            is_active: true,
            bounds: Bounds {
                min_lat: 0.0,
                max_lat: 1.0,
                min_lon: 0.0,
                max_lon: 1.0,
            },
            geometry: String::new(),
            sovereign_state_id: None,
            country_id: None,
            map_unit_id: None,
            resolution_requirement: None,
            metadata: Default::default(),
        };

        let matches = TierMatches {
            sovereign_states: vec![entity("usa")],
            countries: vec![entity("usa_c")],
            map_units: vec![],
            map_subunits: vec![entity("usa_mainland")],
        };

        let boundaries = matches.into_boundaries();
        let tiers: Vec<Tier> = boundaries.iter().map(|b| b.tier).collect();
        assert_eq!(
            tiers,
            vec![Tier::SovereignState, Tier::Country, Tier::MapSubunit]
        );

        let wire = serde_json::to_value(&boundaries[0]).unwrap();
        assert_eq!(wire["tier"], "sovereign_state");
        assert_eq!(wire["id"], "usa");
    }
}
