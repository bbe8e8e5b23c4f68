//! Document-store adapter.
//!
//! The service is read-only over an external document store. This module is
//! the only place that knows the store's wire types; every other component
//! consumes JSON documents typed by the models layer. Geometry is never
//! deserialized here; it flows out as raw text for the kernel.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::geometry::Bounds;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The collections this service reads. The enum is the only source of
/// table names, so no request-derived string ever reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    SovereignStates,
    Countries,
    MapUnits,
    MapSubunits,
    Landmarks,
    Restaurants,
    Coastlines,
    LandPolygons,
}

impl Collection {
    pub const fn table(self) -> &'static str {
        match self {
            Collection::SovereignStates => "sovereign_states",
            Collection::Countries => "countries",
            Collection::MapUnits => "map_units",
            Collection::MapSubunits => "map_subunits",
            Collection::Landmarks => "landmarks",
            Collection::Restaurants => "restaurants",
            Collection::Coastlines => "coastlines",
            Collection::LandPolygons => "land_polygons",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Transient transport or pool failure; the caller may retry.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The collection is not provisioned in this deployment.
    #[error("collection {0} does not exist")]
    MissingCollection(&'static str),

    #[error("query failed: {0}")]
    Query(String),
}

/// Filter set for [`DocumentStore::query_by`]: equality predicates on
/// document fields, an optional position rectangle for point collections,
/// and an optional row cap.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    pub eq: Vec<(&'static str, String)>,
    pub within: Option<Bounds>,
    pub limit: Option<usize>,
}

impl StoreQuery {
    pub fn new() -> Self {
        StoreQuery::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.eq.push((field, value.into()));
        self
    }

    pub fn within(mut self, bounds: Bounds) -> Self {
        self.within = Some(bounds);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Typed read operations over the document store.
///
/// `query_by_bounds` and `query_by` return active documents only; `get`
/// returns the row regardless of its `is_active` flag so detail reads can
/// distinguish "soft-deleted" from "never existed" when they need to.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// Every active document whose bounds rectangle, grown by `margin_deg`
    /// degrees on each side, contains the point.
    async fn query_by_bounds(
        &self,
        collection: Collection,
        lat: f64,
        lon: f64,
        margin_deg: f64,
    ) -> Result<Vec<Value>, StoreError>;

    async fn query_by(
        &self,
        collection: Collection,
        query: &StoreQuery,
    ) -> Result<Vec<Value>, StoreError>;
}
