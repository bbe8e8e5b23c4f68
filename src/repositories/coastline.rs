use futures::stream::{self, StreamExt};

use crate::errors::AppError;
use crate::geometry;
use crate::models::entities::CoastSegment;
use crate::models::{ClassifyPayload, CoastDistancePayload, PointPayload, PointQuery};
use crate::repositories::BoundaryRepository;
use crate::resolution;
use crate::store::{Collection, DocumentStore, StoreError};
use crate::validation::{validate_batch_size, validate_coordinates};

/// Coastline-segment bounds are widened by this many degrees when hunting
/// for distance candidates.
const COAST_SEARCH_MARGIN_DEG: f64 = 2.0;

/// Without land polygons, anything this close to a coast counts as land.
const FALLBACK_LAND_THRESHOLD_KM: f64 = 1.0;

const BATCH_CONCURRENCY: usize = 16;

struct NearestCoast {
    distance_km: f64,
    lat: f64,
    lon: f64,
}

pub struct CoastlineRepository;

impl CoastlineRepository {
    /// Land/ocean classification with a grid-resolution recommendation.
    pub async fn classify(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<ClassifyPayload, AppError> {
        validate_coordinates(lat, lon)?;

        let nearest = Self::nearest_coast(store, lat, lon).await?;
        let is_land = match Self::land_containment(store, lat, lon).await? {
            Some(flag) => flag,
            // No land_polygons collection in this deployment; fall back to
            // proximity.
            None => nearest.distance_km < FALLBACK_LAND_THRESHOLD_KM,
        };

        Ok(ClassifyPayload {
            surface: if is_land { "land" } else { "ocean" }.to_string(),
            is_land,
            distance_to_coast_km: nearest.distance_km,
            grid_resolution: resolution::recommend(is_land, nearest.distance_km),
        })
    }

    pub async fn distance_to_coast(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<CoastDistancePayload, AppError> {
        validate_coordinates(lat, lon)?;
        let nearest = Self::nearest_coast(store, lat, lon).await?;
        Ok(CoastDistancePayload {
            distance_km: nearest.distance_km,
            nearest_point: PointPayload {
                lat: nearest.lat,
                lon: nearest.lon,
            },
        })
    }

    /// Bounded, order-preserving fan-out over the batch.
    pub async fn batch_classify(
        store: &dyn DocumentStore,
        points: &[PointQuery],
    ) -> Result<Vec<ClassifyPayload>, AppError> {
        validate_batch_size(points.len())?;
        for point in points {
            validate_coordinates(point.lat, point.lon)?;
        }

        let results: Vec<Result<ClassifyPayload, AppError>> =
            stream::iter(points.iter().map(|p| Self::classify(store, p.lat, p.lon)))
                .buffered(BATCH_CONCURRENCY)
                .collect()
                .await;

        results.into_iter().collect()
    }

    /// Exact containment against land polygons; `None` when the collection
    /// is not provisioned.
    pub(crate) async fn land_containment(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<Option<bool>, AppError> {
        match BoundaryRepository::tier_matches(store, Collection::LandPolygons, lat, lon).await {
            Ok(matches) => Ok(Some(!matches.is_empty())),
            Err(StoreError::MissingCollection(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn nearest_coast(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<NearestCoast, AppError> {
        let candidates = store
            .query_by_bounds(Collection::Coastlines, lat, lon, COAST_SEARCH_MARGIN_DEG)
            .await?;

        let mut best: Option<NearestCoast> = None;
        for doc in candidates {
            let segment: CoastSegment = match serde_json::from_value(doc) {
                Ok(segment) => segment,
                Err(err) => {
                    log::warn!("skipping malformed coastline document: {err}");
                    continue;
                }
            };
            // TODO: replace the bounds-centroid proxy with point-to-segment
            // distance over the stored polyline.
            let (seg_lat, seg_lon) = segment.bounds.center();
            let distance_km = geometry::haversine(lat, lon, seg_lat, seg_lon) / 1_000.0;
            if best.as_ref().map(|b| distance_km < b.distance_km).unwrap_or(true) {
                best = Some(NearestCoast {
                    distance_km,
                    lat: seg_lat,
                    lon: seg_lon,
                });
            }
        }

        best.ok_or(AppError::NoCoastData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::GridResolution;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn coast_doc(id: &str, min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> serde_json::Value {
        json!({
            "id": id,
            "is_active": true,
            "bounds": {"min_lat": min_lat, "max_lat": max_lat, "min_lon": min_lon, "max_lon": max_lon},
            "geometry": ""
        })
    }

    /// A coastline whose bounds centre sits at (0, 0), wide enough that any
    /// probe in the tests falls inside the 2-degree expanded search window.
    fn ocean_fixture() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            Collection::Coastlines,
            coast_doc("equator_coast", -40.0, 40.0, -40.0, 40.0),
        );
        store
    }

    fn with_land(store: &mut MemoryStore) {
        store.insert(
            Collection::LandPolygons,
            json!({
                "id": "mainland",
                "is_active": true,
                "bounds": {"min_lat": -1.0, "max_lat": 1.0, "min_lon": -1.0, "max_lon": 1.0},
                "geometry": r#"{"type":"Polygon","coordinates":[[[-1.0,-1.0],[1.0,-1.0],[1.0,1.0],[-1.0,1.0],[-1.0,-1.0]]]}"#
            }),
        );
    }

    #[tokio::test]
    async fn land_point_gets_fine_resolution() {
        let mut store = ocean_fixture();
        with_land(&mut store);

        let out = CoastlineRepository::classify(&store, 0.5, 0.5).await.unwrap();
        assert!(out.is_land);
        assert_eq!(out.surface, "land");
        assert_eq!(out.grid_resolution, GridResolution::Land1km);
    }

    #[tokio::test]
    async fn ocean_point_outside_land_polygons_is_ocean() {
        let mut store = ocean_fixture();
        with_land(&mut store);

        let out = CoastlineRepository::classify(&store, 0.0, 5.0).await.unwrap();
        assert!(!out.is_land);
        assert_eq!(out.surface, "ocean");
        assert_eq!(out.grid_resolution, GridResolution::Coastal10km);
    }

    #[tokio::test]
    async fn far_ocean_is_coarse() {
        let store = ocean_fixture();
        // ~30 degrees from the segment centre, ~3300 km.
        let out = CoastlineRepository::classify(&store, 0.0, 30.0).await.unwrap();
        assert!(!out.is_land);
        assert!(out.distance_to_coast_km > 1_000.0);
        assert_eq!(out.grid_resolution, GridResolution::OpenOcean100km);
    }

    #[tokio::test]
    async fn fallback_land_test_uses_coast_proximity() {
        // No land_polygons collection at all.
        let store = ocean_fixture();
        let near = CoastlineRepository::classify(&store, 0.0, 0.001).await.unwrap();
        assert!(near.is_land, "sub-kilometre distance should read as land");

        let far = CoastlineRepository::classify(&store, 0.0, 5.0).await.unwrap();
        assert!(!far.is_land);
    }

    #[tokio::test]
    async fn distance_reports_nearest_candidate_centre() {
        let mut store = ocean_fixture();
        store.insert(
            Collection::Coastlines,
            coast_doc("far_coast", -40.0, 40.0, 100.0, 140.0),
        );

        let out = CoastlineRepository::distance_to_coast(&store, 1.0, 1.0)
            .await
            .unwrap();
        assert_eq!(out.nearest_point.lat, 0.0);
        assert_eq!(out.nearest_point.lon, 0.0);
        let direct = geometry::haversine(1.0, 1.0, 0.0, 0.0) / 1_000.0;
        assert!((out.distance_km - direct).abs() < 1e-9);
    }

    #[tokio::test]
    async fn no_candidates_is_no_coast_data() {
        let mut store = MemoryStore::new();
        store.create_collection(Collection::Coastlines);
        let err = CoastlineRepository::classify(&store, 0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, AppError::NoCoastData));
    }

    #[tokio::test]
    async fn batch_preserves_order_and_caps_input() {
        let store = ocean_fixture();
        let points: Vec<PointQuery> = (0..5)
            .map(|i| PointQuery {
                lat: 0.0,
                lon: f64::from(i),
            })
            .collect();

        let results = CoastlineRepository::batch_classify(&store, &points)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);
        // Distances grow with the index, proving order survived the fan-out.
        for pair in results.windows(2) {
            assert!(pair[0].distance_to_coast_km <= pair[1].distance_to_coast_km);
        }

        let too_many: Vec<PointQuery> = (0..1001)
            .map(|_| PointQuery { lat: 0.0, lon: 0.0 })
            .collect();
        assert!(matches!(
            CoastlineRepository::batch_classify(&store, &too_many).await,
            Err(AppError::Validation(_))
        ));

        let exactly_cap: Vec<PointQuery> = (0..1000)
            .map(|_| PointQuery { lat: 0.0, lon: 0.0 })
            .collect();
        assert!(CoastlineRepository::batch_classify(&store, &exactly_cap)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn poles_classify_without_error() {
        let mut store = MemoryStore::new();
        store.insert(
            Collection::Coastlines,
            coast_doc("global", -90.0, 90.0, -180.0, 180.0),
        );
        assert!(CoastlineRepository::classify(&store, 90.0, 180.0).await.is_ok());
        assert!(CoastlineRepository::classify(&store, -90.0, -180.0).await.is_ok());
    }
}
