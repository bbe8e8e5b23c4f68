pub mod achievements;
pub mod admin;
pub mod boundaries;
pub mod coastline;
pub mod countries;
pub mod landmarks;
pub mod polygons;
pub mod system;
pub mod tiers;

use actix_web::web;

/// Full route table, mounted at the root.
///
/// Registration order matters where a literal segment shadows a parameter:
/// `/countries/bulk` and `/landmarks/nearby` are registered before their
/// `{id}` siblings.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(system::health))
        .route("/metrics", web::get().to(system::metrics))
        // Administrative tiers
        .route(
            "/sovereign-states",
            web::get().to(tiers::list_sovereign_states),
        )
        .route(
            "/sovereign-states/{id}",
            web::get().to(tiers::sovereign_state_detail),
        )
        .route(
            "/sovereign-states/{id}/countries",
            web::get().to(tiers::sovereign_state_countries),
        )
        .route("/countries/bulk", web::get().to(countries::bulk_countries))
        .route("/countries", web::get().to(tiers::list_countries))
        .route("/countries", web::post().to(admin::create_country))
        .route("/countries/{id}", web::get().to(tiers::country_detail))
        .route(
            "/countries/{id}/map-units",
            web::get().to(tiers::country_map_units),
        )
        .route("/map-units", web::get().to(tiers::list_map_units))
        .route("/map-units/{id}", web::get().to(tiers::map_unit_detail))
        .route(
            "/map-units/{id}/subunits",
            web::get().to(tiers::map_unit_subunits),
        )
        .route("/map-subunits", web::get().to(tiers::list_map_subunits))
        .route("/map-subunits/{id}", web::get().to(tiers::map_subunit_detail))
        // Landmarks
        .route("/landmarks/nearby", web::get().to(landmarks::nearby_landmarks))
        .route("/landmarks", web::get().to(landmarks::list_landmarks))
        .route("/landmarks", web::post().to(admin::create_landmark))
        .route("/landmarks/{id}", web::get().to(landmarks::landmark_detail))
        // Spatial resolution & enrichment
        .route("/boundaries/containing", web::get().to(boundaries::containing))
        .route(
            "/boundaries/batch-lookup",
            web::post().to(boundaries::batch_lookup),
        )
        .route("/boundaries", web::post().to(admin::create_boundary))
        // Coastline
        .route("/coastline/classify", web::get().to(coastline::classify))
        .route("/coastline/distance", web::get().to(coastline::distance))
        .route(
            "/coastline/batch-classify",
            web::post().to(coastline::batch_classify),
        )
        // Polygons
        .route("/polygons/country/{id}", web::get().to(polygons::by_country))
        .route(
            "/polygons/continent/{continent}",
            web::get().to(polygons::by_continent),
        )
        .route("/polygons/world", web::get().to(polygons::world))
        // Achievements
        .route(
            "/achievements/definitions",
            web::get().to(achievements::definitions),
        );
}
