//! In-memory adapter used as the test fixture and brute-force oracle.
//!
//! Matching semantics mirror `PgStore`: `is_active` gates every query,
//! bounds come from the document's `bounds` object and positions from its
//! `coordinates` object, the same fields ingest denormalizes into columns.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use super::{Collection, DocumentStore, StoreError, StoreQuery};
use crate::geometry::Bounds;

#[derive(Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Registers an empty collection, distinguishing "provisioned but empty"
    /// from [`StoreError::MissingCollection`].
    pub fn create_collection(&mut self, collection: Collection) {
        self.collections.entry(collection).or_default();
    }

    pub fn insert(&mut self, collection: Collection, doc: Value) {
        self.collections.entry(collection).or_default().push(doc);
    }

    pub fn docs(&self, collection: Collection) -> &[Value] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn existing(&self, collection: Collection) -> Result<&Vec<Value>, StoreError> {
        self.collections
            .get(&collection)
            .ok_or(StoreError::MissingCollection(collection.table()))
    }
}

fn is_active(doc: &Value) -> bool {
    doc.get("is_active").and_then(Value::as_bool).unwrap_or(false)
}

fn doc_bounds(doc: &Value) -> Option<Bounds> {
    serde_json::from_value(doc.get("bounds")?.clone()).ok()
}

fn doc_position(doc: &Value) -> Option<(f64, f64)> {
    let coords = doc.get("coordinates")?;
    Some((
        coords.get("lat")?.as_f64()?,
        coords.get("lon")?.as_f64()?,
    ))
}

fn field_as_string(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.existing(collection)?;
        Ok(docs
            .iter()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id))
            .cloned())
    }

    async fn query_by_bounds(
        &self,
        collection: Collection,
        lat: f64,
        lon: f64,
        margin_deg: f64,
    ) -> Result<Vec<Value>, StoreError> {
        let docs = self.existing(collection)?;
        Ok(docs
            .iter()
            .filter(|d| is_active(d))
            .filter(|d| {
                doc_bounds(d)
                    .map(|b| b.expand(margin_deg).contains(lat, lon))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn query_by(
        &self,
        collection: Collection,
        query: &StoreQuery,
    ) -> Result<Vec<Value>, StoreError> {
        let docs = self.existing(collection)?;
        let mut out: Vec<Value> = docs
            .iter()
            .filter(|d| is_active(d))
            .filter(|d| {
                query
                    .eq
                    .iter()
                    .all(|(field, value)| field_as_string(d, field).as_deref() == Some(value))
            })
            .filter(|d| match &query.within {
                None => true,
                Some(bounds) => doc_position(d)
                    .map(|(lat, lon)| bounds.contains(lat, lon))
                    .unwrap_or(false),
            })
            .cloned()
            .collect();

        if let Some(limit) = query.limit {
            out.truncate(limit);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            Collection::Countries,
            json!({
                "id": "narnia",
                "name": "Narnia",
                "is_active": true,
                "bounds": {"min_lat": 0.0, "max_lat": 10.0, "min_lon": 0.0, "max_lon": 10.0},
                "continent": "Europe"
            }),
        );
        store.insert(
            Collection::Countries,
            json!({
                "id": "atlantis",
                "name": "Atlantis",
                "is_active": false,
                "bounds": {"min_lat": 0.0, "max_lat": 10.0, "min_lon": 0.0, "max_lon": 10.0}
            }),
        );
        store.insert(
            Collection::Landmarks,
            json!({
                "id": "lm_1",
                "is_active": true,
                "coordinates": {"lat": 5.0, "lon": 5.0}
            }),
        );
        store
    }

    #[tokio::test]
    async fn get_finds_inactive_rows_too() {
        let store = store();
        let doc = store.get(Collection::Countries, "atlantis").await.unwrap();
        assert!(doc.is_some());
        assert!(store
            .get(Collection::Countries, "wonderland")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn bounds_query_filters_inactive_and_outside() {
        let store = store();
        let hits = store
            .query_by_bounds(Collection::Countries, 5.0, 5.0, 0.0)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], "narnia");

        let hits = store
            .query_by_bounds(Collection::Countries, 11.0, 5.0, 0.0)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn bounds_margin_widens_the_match() {
        let store = store();
        let hits = store
            .query_by_bounds(Collection::Countries, 11.0, 5.0, 2.0)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn missing_collection_is_an_error() {
        let store = store();
        let err = store
            .query_by_bounds(Collection::LandPolygons, 0.0, 0.0, 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingCollection("land_polygons")));
    }

    #[tokio::test]
    async fn query_by_applies_eq_within_and_limit() {
        let store = store();
        let hits = store
            .query_by(
                Collection::Countries,
                &StoreQuery::new().eq("continent", "Europe"),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let hits = store
            .query_by(
                Collection::Countries,
                &StoreQuery::new().eq("continent", "Africa"),
            )
            .await
            .unwrap();
        assert!(hits.is_empty());

        let rect = Bounds {
            min_lat: 4.0,
            max_lat: 6.0,
            min_lon: 4.0,
            max_lon: 6.0,
        };
        let hits = store
            .query_by(Collection::Landmarks, &StoreQuery::new().within(rect))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let hits = store
            .query_by(Collection::Countries, &StoreQuery::new().limit(0))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
