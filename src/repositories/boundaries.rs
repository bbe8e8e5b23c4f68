use crate::errors::AppError;
use crate::geometry;
use crate::models::TierMatches;
use crate::models::entities::AdminEntity;
use crate::store::{Collection, DocumentStore, StoreError};
use crate::validation::validate_coordinates;

pub struct BoundaryRepository;

impl BoundaryRepository {
    /// Hierarchical point-in-polygon resolution across the four
    /// administrative tiers, queried concurrently.
    pub async fn resolve(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
    ) -> Result<TierMatches, AppError> {
        validate_coordinates(lat, lon)?;

        let (sovereign_states, countries, map_units, map_subunits) = tokio::try_join!(
            Self::tier_matches(store, Collection::SovereignStates, lat, lon),
            Self::tier_matches(store, Collection::Countries, lat, lon),
            Self::tier_matches(store, Collection::MapUnits, lat, lon),
            Self::tier_matches(store, Collection::MapSubunits, lat, lon),
        )
        .map_err(AppError::from)?;

        Ok(TierMatches {
            sovereign_states,
            countries,
            map_units,
            map_subunits,
        })
    }

    /// Two-stage containment over one collection: the indexed bounds
    /// pre-filter narrows the tier to a handful of candidates, then every
    /// candidate's geometry is tested exactly. Bounds are a conservative
    /// superset of geometry, so nothing outside the candidate set can
    /// contain the point.
    ///
    /// Malformed documents and unparsable geometry are logged and dropped;
    /// empty geometry means the row opted out of spatial queries.
    pub(crate) async fn tier_matches(
        store: &dyn DocumentStore,
        collection: Collection,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<AdminEntity>, StoreError> {
        let candidates = store.query_by_bounds(collection, lat, lon, 0.0).await?;

        let mut matches = Vec::new();
        for doc in candidates {
            let entity: AdminEntity = match serde_json::from_value(doc) {
                Ok(entity) => entity,
                Err(err) => {
                    log::warn!("skipping malformed {collection} document: {err}");
                    continue;
                }
            };
            if entity.geometry.is_empty() {
                continue;
            }
            match geometry::parse(&entity.geometry) {
                Ok(geom) => {
                    if geom.contains(lon, lat) {
                        matches.push(entity);
                    }
                }
                Err(err) => {
                    log::warn!("skipping {collection}/{}: {err}", entity.id);
                }
            }
        }
        Ok(matches)
    }
}
