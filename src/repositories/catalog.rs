use std::collections::HashSet;

use serde_json::Value;

use crate::errors::AppError;
use crate::geometry;
use crate::models::entities::{AdminEntity, Landmark};
use crate::models::requests::{LandmarkListQuery, TierListQuery};
use crate::models::responses::{
    AchievementDefinition, BulkCountry, CountryPolygon, NearbyLandmark,
};
use crate::store::{Collection, DocumentStore, StoreQuery};
use crate::validation::effective_limit;

pub struct CatalogRepository;

impl CatalogRepository {
    pub async fn list_tier(
        store: &dyn DocumentStore,
        collection: Collection,
        query: &TierListQuery,
    ) -> Result<Vec<AdminEntity>, AppError> {
        let mut filters = StoreQuery::new().limit(effective_limit(query.limit));
        if let Some(id) = &query.sovereign_state_id {
            filters = filters.eq("sovereign_state_id", id.clone());
        }
        if let Some(id) = &query.country_id {
            filters = filters.eq("country_id", id.clone());
        }
        if let Some(id) = &query.map_unit_id {
            filters = filters.eq("map_unit_id", id.clone());
        }

        let docs = store.query_by(collection, &filters).await?;
        Ok(decode_entities(collection, docs)
            .map(AdminEntity::without_geometry)
            .collect())
    }

    pub async fn tier_detail(
        store: &dyn DocumentStore,
        collection: Collection,
        id: &str,
    ) -> Result<AdminEntity, AppError> {
        let doc = store
            .get(collection, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No {collection} entity: {id}")))?;
        serde_json::from_value(doc)
            .map_err(|e| AppError::Internal(format!("malformed {collection}/{id}: {e}")))
    }

    /// Active children of a parent entity, e.g. the countries of a
    /// sovereign state.
    pub async fn children(
        store: &dyn DocumentStore,
        child_collection: Collection,
        parent_field: &'static str,
        parent_id: &str,
    ) -> Result<Vec<AdminEntity>, AppError> {
        let docs = store
            .query_by(
                child_collection,
                &StoreQuery::new().eq(parent_field, parent_id),
            )
            .await?;
        Ok(decode_entities(child_collection, docs)
            .map(AdminEntity::without_geometry)
            .collect())
    }

    /// Deduplicated, denormalized country universe.
    ///
    /// Sovereign states come first; countries follow unless their id was
    /// already emitted. Map units never appear. Territory status and the
    /// sovereign display name are resolved from the first pass.
    pub async fn bulk_countries(
        store: &dyn DocumentStore,
        cdn_base_url: &str,
    ) -> Result<Vec<BulkCountry>, AppError> {
        let sovereign_docs = store
            .query_by(Collection::SovereignStates, &StoreQuery::new())
            .await?;
        let country_docs = store
            .query_by(Collection::Countries, &StoreQuery::new())
            .await?;

        let mut emitted: HashSet<String> = HashSet::new();
        let mut out = Vec::with_capacity(sovereign_docs.len() + country_docs.len());

        let sovereigns: Vec<AdminEntity> =
            decode_entities(Collection::SovereignStates, sovereign_docs).collect();
        for entity in &sovereigns {
            if !emitted.insert(entity.id.clone()) {
                continue;
            }
            out.push(BulkCountry {
                id: entity.id.clone(),
                name: entity.name.clone(),
                continent: metadata_str(entity, "continent"),
                flag_url: flag_url(entity, cdn_base_url),
                is_territory: false,
                sovereign_state_name: None,
            });
        }

        for entity in decode_entities(Collection::Countries, country_docs) {
            if !emitted.insert(entity.id.clone()) {
                continue;
            }
            let sovereign_id = entity.sovereign_state_id.clone().unwrap_or_default();
            let is_territory = !sovereign_id.is_empty() && sovereign_id != entity.id;
            let sovereign_state_name = sovereigns
                .iter()
                .find(|s| s.id == sovereign_id)
                .map(|s| s.name.clone());

            out.push(BulkCountry {
                continent: metadata_str(&entity, "continent"),
                flag_url: flag_url(&entity, cdn_base_url),
                id: entity.id,
                name: entity.name,
                is_territory,
                sovereign_state_name,
            });
        }

        Ok(out)
    }

    pub async fn polygon_by_country(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<CountryPolygon, AppError> {
        let doc = store
            .get(Collection::Countries, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No country: {id}")))?;
        let entity: AdminEntity = serde_json::from_value(doc)
            .map_err(|e| AppError::Internal(format!("malformed countries/{id}: {e}")))?;

        if !entity.is_active || entity.geometry.is_empty() {
            return Err(AppError::NotFound(format!("No polygon for country: {id}")));
        }
        Ok(country_polygon(entity))
    }

    pub async fn polygons_by_continent(
        store: &dyn DocumentStore,
        continent: &str,
    ) -> Result<Vec<CountryPolygon>, AppError> {
        let docs = store
            .query_by(
                Collection::Countries,
                &StoreQuery::new().eq("continent", continent),
            )
            .await?;
        Ok(polygon_rows(docs))
    }

    pub async fn polygons_world(
        store: &dyn DocumentStore,
    ) -> Result<Vec<CountryPolygon>, AppError> {
        let docs = store
            .query_by(Collection::Countries, &StoreQuery::new())
            .await?;
        Ok(polygon_rows(docs))
    }

    pub async fn list_landmarks(
        store: &dyn DocumentStore,
        query: &LandmarkListQuery,
    ) -> Result<Vec<Landmark>, AppError> {
        let mut filters = StoreQuery::new().limit(effective_limit(query.limit));
        if let Some(country) = &query.country {
            filters = filters.eq("country_id", country.clone());
        }
        if let Some(landmark_type) = &query.landmark_type {
            filters = filters.eq("type", landmark_type.clone());
        }
        if let Some(category) = &query.category {
            filters = filters.eq("category", category.clone());
        }

        let docs = store.query_by(Collection::Landmarks, &filters).await?;
        Ok(decode_landmarks(docs).collect())
    }

    pub async fn landmark_detail(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Landmark, AppError> {
        let doc = store
            .get(Collection::Landmarks, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No landmark: {id}")))?;
        serde_json::from_value(doc)
            .map_err(|e| AppError::Internal(format!("malformed landmarks/{id}: {e}")))
    }

    /// Landmarks within `radius_m` metres of a point, nearest first, each
    /// with its exact great-circle distance. A zero radius matches nothing.
    pub async fn nearby_landmarks(
        store: &dyn DocumentStore,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<NearbyLandmark>, AppError> {
        if radius_m <= 0.0 {
            return Ok(Vec::new());
        }

        let rect = geometry::bounding_box(lat, lon, radius_m);
        let docs = store
            .query_by(Collection::Landmarks, &StoreQuery::new().within(rect))
            .await?;

        let mut nearby: Vec<NearbyLandmark> = decode_landmarks(docs)
            .map(|landmark| {
                let distance_meters = geometry::haversine(
                    lat,
                    lon,
                    landmark.coordinates.lat,
                    landmark.coordinates.lon,
                );
                NearbyLandmark {
                    landmark,
                    distance_meters,
                }
            })
            .filter(|candidate| candidate.distance_meters <= radius_m)
            .collect();

        nearby.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        nearby.truncate(limit);
        Ok(nearby)
    }

    /// Derived achievement catalog: the union of active landmark and
    /// restaurant achievements. There is no persisted achievements
    /// collection; this projection is the system of record.
    pub async fn achievement_definitions(
        store: &dyn DocumentStore,
    ) -> Result<Vec<AchievementDefinition>, AppError> {
        let landmark_docs = store
            .query_by(Collection::Landmarks, &StoreQuery::new())
            .await?;
        let restaurant_docs = store
            .query_by(Collection::Restaurants, &StoreQuery::new())
            .await?;

        let mut out = Vec::new();
        for landmark in decode_landmarks(landmark_docs) {
            if let Some(def) = project_achievement(&landmark, true) {
                out.push(def);
            }
        }
        for restaurant in decode_landmarks(restaurant_docs) {
            if let Some(def) = project_achievement(&restaurant, false) {
                out.push(def);
            }
        }
        Ok(out)
    }
}

fn decode_entities(
    collection: Collection,
    docs: Vec<Value>,
) -> impl Iterator<Item = AdminEntity> {
    docs.into_iter().filter_map(move |doc| {
        serde_json::from_value(doc)
            .map_err(|err| log::warn!("skipping malformed {collection} document: {err}"))
            .ok()
    })
}

fn decode_landmarks(docs: Vec<Value>) -> impl Iterator<Item = Landmark> {
    docs.into_iter().filter_map(|doc| {
        serde_json::from_value(doc)
            .map_err(|err| log::warn!("skipping malformed landmark document: {err}"))
            .ok()
    })
}

fn metadata_str(entity: &AdminEntity, field: &str) -> Option<String> {
    entity
        .metadata
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
}

fn flag_url(entity: &AdminEntity, cdn_base_url: &str) -> String {
    metadata_str(entity, "flag_url")
        .unwrap_or_else(|| format!("{cdn_base_url}/flags/{}.png", entity.id))
}

fn country_polygon(entity: AdminEntity) -> CountryPolygon {
    CountryPolygon {
        id: entity.id,
        name: entity.name,
        geometry: entity.geometry,
        bounds: entity.bounds,
    }
}

fn polygon_rows(docs: Vec<Value>) -> Vec<CountryPolygon> {
    decode_entities(Collection::Countries, docs)
        .filter(|entity| !entity.geometry.is_empty())
        .map(country_polygon)
        .collect()
}

fn project_achievement(poi: &Landmark, is_landmark: bool) -> Option<AchievementDefinition> {
    let achievement = poi.achievement.as_ref()?;
    Some(AchievementDefinition {
        id: achievement.id.clone(),
        title: achievement.title.clone(),
        description: achievement.description.clone(),
        points: achievement.points,
        rarity: achievement.rarity,
        category: achievement.category.clone(),
        landmark_id: is_landmark.then(|| poi.id.clone()),
        restaurant_id: (!is_landmark).then(|| poi.id.clone()),
        precision_radius_meters: poi.precision_radius_meters,
        unlock_message: achievement.unlock_message.clone(),
    })
}
