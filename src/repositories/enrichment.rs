use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::errors::AppError;
use crate::geometry;
use crate::models::{EnrichmentResult, SquarePoint, TierMatches};
use crate::repositories::{BoundaryRepository, CoastlineRepository};
use crate::resolution::GridResolution;
use crate::store::{Collection, DocumentStore, StoreQuery};
use crate::validation::{validate_batch_size, validate_coordinates, RESOLUTION_CLASSES};

const LANDMARK_SHORTLIST_RADIUS_M: f64 = 1_000.0;
const LANDMARK_SHORTLIST_CAP: usize = 20;
const BATCH_CONCURRENCY: usize = 16;

const DEFAULT_RESOLUTION: &str = "1km";

pub struct EnrichmentRepository;

impl EnrichmentRepository {
    /// Enriches a batch of grid-square centroids with boundary tags, a
    /// resolution class and a nearby-landmark shortlist. Output order
    /// matches input order; any store failure fails the whole batch.
    pub async fn enrich(
        store: &dyn DocumentStore,
        points: &[SquarePoint],
        include_coastline: bool,
    ) -> Result<Vec<EnrichmentResult>, AppError> {
        validate_batch_size(points.len())?;
        for point in points {
            validate_coordinates(point.lat, point.lon)?;
        }

        let results: Vec<Result<EnrichmentResult, AppError>> = stream::iter(
            points
                .iter()
                .map(|p| Self::enrich_point(store, p, include_coastline)),
        )
        .buffered(BATCH_CONCURRENCY)
        .collect()
        .await;

        results.into_iter().collect()
    }

    async fn enrich_point(
        store: &dyn DocumentStore,
        point: &SquarePoint,
        include_coastline: bool,
    ) -> Result<EnrichmentResult, AppError> {
        let matches = BoundaryRepository::resolve(store, point.lat, point.lon).await?;
        let resolution =
            Self::square_resolution(store, &matches, point, include_coastline).await?;
        let boundary_tags = Self::boundary_tags(&matches);
        let landmarks_nearby = Self::nearby_landmark_ids(store, point.lat, point.lon).await?;

        Ok(EnrichmentResult {
            square_id: point.square_id.clone(),
            boundary_tags,
            resolution,
            landmarks_nearby,
        })
    }

    /// Lower-cased entity names in sovereign_state -> country -> map_unit ->
    /// map_subunit order; an entity with a blank name contributes its id.
    fn boundary_tags(matches: &TierMatches) -> Vec<String> {
        [
            &matches.sovereign_states,
            &matches.countries,
            &matches.map_units,
            &matches.map_subunits,
        ]
        .into_iter()
        .flatten()
        .map(|entity| {
            if entity.name.is_empty() {
                entity.id.to_lowercase()
            } else {
                entity.name.to_lowercase()
            }
        })
        .collect()
    }

    /// The most specific matched tier's `resolution_requirement`, when it
    /// names a served class; else the coastline-derived class for ocean
    /// squares when the caller opted in; else the default.
    async fn square_resolution(
        store: &dyn DocumentStore,
        matches: &TierMatches,
        point: &SquarePoint,
        include_coastline: bool,
    ) -> Result<String, AppError> {
        let most_specific_first = [
            &matches.map_subunits,
            &matches.map_units,
            &matches.countries,
            &matches.sovereign_states,
        ];
        for tier in most_specific_first {
            for entity in tier.iter() {
                if let Some(requested) = entity.resolution_requirement.as_deref() {
                    if RESOLUTION_CLASSES.contains(&requested) {
                        return Ok(requested.to_string());
                    }
                    log::warn!(
                        "entity {} requests unknown resolution {requested:?}",
                        entity.id
                    );
                }
            }
        }

        if include_coastline && matches.is_empty() {
            match CoastlineRepository::classify(store, point.lat, point.lon).await {
                Ok(classified) => {
                    let class = match classified.grid_resolution {
                        GridResolution::Urban100m => "100m",
                        GridResolution::Land1km => DEFAULT_RESOLUTION,
                        GridResolution::Coastal10km => "10km",
                        GridResolution::OpenOcean100km => "100km",
                    };
                    return Ok(class.to_string());
                }
                // Degenerate coastline data must not sink the batch.
                Err(AppError::NoCoastData) => return Ok(DEFAULT_RESOLUTION.to_string()),
                Err(err) => return Err(err),
            }
        }

        Ok(DEFAULT_RESOLUTION.to_string())
    }

    /// Landmark ids within a kilometre of the point, nearest first, capped.
    /// The bounding box is a square superset of the radius, so every
    /// candidate is re-checked by exact great-circle distance.
    async fn nearby_landmark_ids(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<String>, AppError> {
        let rect = geometry::bounding_box(lat, lon, LANDMARK_SHORTLIST_RADIUS_M);
        let docs = store
            .query_by(Collection::Landmarks, &StoreQuery::new().within(rect))
            .await?;

        let mut shortlist: Vec<(String, f64)> = docs
            .iter()
            .filter_map(|doc| {
                let id = doc.get("id").and_then(Value::as_str)?;
                let coords = doc.get("coordinates")?;
                let lm_lat = coords.get("lat").and_then(Value::as_f64)?;
                let lm_lon = coords.get("lon").and_then(Value::as_f64)?;
                let distance = geometry::haversine(lat, lon, lm_lat, lm_lon);
                Some((id.to_string(), distance))
            })
            .filter(|(_, distance)| *distance <= LANDMARK_SHORTLIST_RADIUS_M)
            .collect();

        shortlist.sort_by(|a, b| a.1.total_cmp(&b.1));
        shortlist.truncate(LANDMARK_SHORTLIST_CAP);
        Ok(shortlist.into_iter().map(|(id, _)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn square_geojson(min: f64, max: f64) -> String {
        format!(
            r#"{{"type":"Polygon","coordinates":[[[{min},{min}],[{max},{min}],[{max},{max}],[{min},{max}],[{min},{min}]]]}}"#
        )
    }

    fn fixture() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            Collection::SovereignStates,
            json!({
                "id": "arcadia",
                "name": "Arcadia",
                "is_active": true,
                "bounds": {"min_lat": 0.0, "max_lat": 20.0, "min_lon": 0.0, "max_lon": 20.0},
                "geometry": square_geojson(0.0, 20.0)
            }),
        );
        store.insert(
            Collection::Countries,
            json!({
                "id": "arcadia_main",
                "name": "Arcadia Mainland",
                "is_active": true,
                "bounds": {"min_lat": 0.0, "max_lat": 10.0, "min_lon": 0.0, "max_lon": 10.0},
                "geometry": square_geojson(0.0, 10.0),
                "sovereign_state_id": "arcadia",
                "resolution_requirement": "100m"
            }),
        );
        store.create_collection(Collection::MapUnits);
        store.create_collection(Collection::MapSubunits);
        store.insert(
            Collection::Landmarks,
            json!({
                "id": "lm_obelisk",
                "name": "Obelisk",
                "is_active": true,
                "coordinates": {"lat": 5.0, "lon": 5.0}
            }),
        );
        store.insert(
            Collection::Landmarks,
            json!({
                "id": "lm_plaza",
                "name": "Plaza",
                "is_active": true,
                "coordinates": {"lat": 5.002, "lon": 5.0}
            }),
        );
        // Inside the square search box around (5, 5) but ~1.38 km away.
        store.insert(
            Collection::Landmarks,
            json!({
                "id": "lm_corner",
                "name": "Corner",
                "is_active": true,
                "coordinates": {"lat": 5.0088, "lon": 5.0088}
            }),
        );
        store.insert(
            Collection::Landmarks,
            json!({
                "id": "lm_remote",
                "name": "Remote",
                "is_active": true,
                "coordinates": {"lat": 9.0, "lon": 9.0}
            }),
        );
        store
    }

    fn point(lat: f64, lon: f64, square_id: &str) -> SquarePoint {
        SquarePoint {
            lat,
            lon,
            square_id: square_id.into(),
        }
    }

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let store = fixture();
        let points = vec![
            point(5.0, 5.0, "sq_a"),
            point(15.0, 15.0, "sq_b"),
            point(5.0, 5.0, "sq_c"),
        ];
        let results = EnrichmentRepository::enrich(&store, &points, false)
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.square_id.as_str()).collect();
        assert_eq!(ids, vec!["sq_a", "sq_b", "sq_c"]);
    }

    #[tokio::test]
    async fn tags_are_lowercased_in_tier_order() {
        let store = fixture();
        let results = EnrichmentRepository::enrich(&store, &[point(5.0, 5.0, "sq")], false)
            .await
            .unwrap();
        assert_eq!(
            results[0].boundary_tags,
            vec!["arcadia", "arcadia mainland"]
        );
    }

    #[tokio::test]
    async fn resolution_honours_the_most_specific_request() {
        let store = fixture();
        // Country requests 100m; the sovereign above it requests nothing.
        let results = EnrichmentRepository::enrich(&store, &[point(5.0, 5.0, "sq")], false)
            .await
            .unwrap();
        assert_eq!(results[0].resolution, "100m");

        // Only the sovereign matches out here, so the default applies.
        let results = EnrichmentRepository::enrich(&store, &[point(15.0, 15.0, "sq")], false)
            .await
            .unwrap();
        assert_eq!(results[0].resolution, "1km");
    }

    #[tokio::test]
    async fn landmark_shortlist_is_nearest_first_within_a_kilometre() {
        let store = fixture();
        let results = EnrichmentRepository::enrich(&store, &[point(5.0, 5.0, "sq")], false)
            .await
            .unwrap();
        // lm_corner survives the bounding-box pre-filter but fails the exact
        // distance check; the rest come back nearest first.
        assert_eq!(results[0].landmarks_nearby, vec!["lm_obelisk", "lm_plaza"]);
    }

    #[tokio::test]
    async fn coastline_opt_in_shapes_ocean_resolution() {
        let mut store = fixture();
        store.insert(
            Collection::Coastlines,
            json!({
                "id": "coast",
                "is_active": true,
                "bounds": {"min_lat": -60.0, "max_lat": 60.0, "min_lon": -60.0, "max_lon": 60.0},
                "geometry": ""
            }),
        );

        // (-30, -30) misses every tier and sits thousands of kilometres from
        // the coast centre at (0, 0).
        let results = EnrichmentRepository::enrich(&store, &[point(-30.0, -30.0, "sq")], true)
            .await
            .unwrap();
        assert!(results[0].boundary_tags.is_empty());
        assert_eq!(results[0].resolution, "100km");
    }

    #[tokio::test]
    async fn batch_cap_applies() {
        let store = fixture();
        let too_many: Vec<SquarePoint> =
            (0..1001).map(|i| point(5.0, 5.0, &format!("sq_{i}"))).collect();
        assert!(matches!(
            EnrichmentRepository::enrich(&store, &too_many, false).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn invalid_coordinates_fail_the_whole_batch() {
        let store = fixture();
        let points = vec![point(5.0, 5.0, "ok"), point(95.0, 0.0, "bad")];
        assert!(matches!(
            EnrichmentRepository::enrich(&store, &points, false).await,
            Err(AppError::Validation(_))
        ));
    }
}
