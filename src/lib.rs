//! Administrative-boundary, coastline and landmark context service.
//!
//! The binary in `main.rs` wires this crate to a Postgres-backed document
//! store behind an HTTP surface; everything spatial lives here.

pub mod auth;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod models;
pub mod repositories;
pub mod resolution;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Instant;

use utoipa::OpenApi;

use crate::config::Config;
use crate::store::DocumentStore;

/// Shared per-worker state: the store handle and startup-time constants.
/// Everything here is write-once at startup; handlers only read.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
    pub started: Instant,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GeoContext API",
        description = "Administrative-boundary, coastline and landmark context for points \
            on Earth: hierarchical point-in-polygon resolution over the four Natural Earth \
            tiers, land/ocean classification with grid-resolution recommendations, and bulk \
            square enrichment for the core grid service.",
        version = "1.0.0"
    ),
    paths(
        routes::system::health,
        routes::system::metrics,
        routes::tiers::list_sovereign_states,
        routes::tiers::list_countries,
        routes::tiers::list_map_units,
        routes::tiers::list_map_subunits,
        routes::tiers::sovereign_state_detail,
        routes::tiers::country_detail,
        routes::tiers::map_unit_detail,
        routes::tiers::map_subunit_detail,
        routes::tiers::sovereign_state_countries,
        routes::tiers::country_map_units,
        routes::tiers::map_unit_subunits,
        routes::countries::bulk_countries,
        routes::landmarks::list_landmarks,
        routes::landmarks::landmark_detail,
        routes::landmarks::nearby_landmarks,
        routes::boundaries::containing,
        routes::boundaries::batch_lookup,
        routes::coastline::classify,
        routes::coastline::distance,
        routes::coastline::batch_classify,
        routes::polygons::by_country,
        routes::polygons::by_continent,
        routes::polygons::world,
        routes::achievements::definitions,
        routes::admin::create_country,
        routes::admin::create_landmark,
        routes::admin::create_boundary,
    ),
    components(schemas(
        geometry::Bounds,
        resolution::GridResolution,
        models::requests::PointQuery,
        models::requests::SquarePoint,
        models::requests::BatchLookupRequest,
        models::requests::BatchClassifyRequest,
        models::responses::PointPayload,
        models::responses::ClassifyPayload,
        models::responses::CoastDistancePayload,
        models::responses::EnrichmentResult,
        models::responses::BulkCountry,
        models::responses::BulkCountriesPayload,
        models::responses::CountryPolygon,
        models::responses::AchievementDefinition,
        models::entities::Coordinates,
        models::entities::Rarity,
        models::entities::Achievement,
        models::entities::Michelin,
    )),
    tags(
        (name = "System", description = "Health and metrics"),
        (name = "Administrative tiers", description = "Natural Earth tier catalogs"),
        (name = "Boundaries", description = "Spatial resolution and bulk enrichment"),
        (name = "Coastline", description = "Land/ocean classification"),
        (name = "Landmarks", description = "Points of interest"),
        (name = "Polygons", description = "Country geometries for rendering"),
        (name = "Achievements", description = "Derived achievement catalog"),
        (name = "Admin", description = "Write stubs; ingest owns mutation"),
    )
)]
pub struct ApiDoc;
