//! Administrative-tier catalog: listings, details and hierarchical children.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::requests::TierListQuery;
use crate::models::responses::list_envelope;
use crate::repositories::CatalogRepository;
use crate::store::Collection;
use crate::AppState;

async fn list(
    state: &AppState,
    collection: Collection,
    plural: &str,
    query: &TierListQuery,
) -> Result<HttpResponse, AppError> {
    let items = CatalogRepository::list_tier(state.store.as_ref(), collection, query).await?;
    Ok(HttpResponse::Ok().json(list_envelope(plural, &items)))
}

async fn detail(
    state: &AppState,
    collection: Collection,
    id: &str,
) -> Result<HttpResponse, AppError> {
    let entity = CatalogRepository::tier_detail(state.store.as_ref(), collection, id).await?;
    Ok(HttpResponse::Ok().json(entity))
}

#[utoipa::path(
    get,
    path = "/sovereign-states",
    tag = "Administrative tiers",
    params(("limit" = Option<usize>, Query, description = "Page size, default 50")),
    responses((status = 200, description = "Sovereign state listing"))
)]
pub(crate) async fn list_sovereign_states(
    state: web::Data<AppState>,
    query: web::Query<TierListQuery>,
) -> Result<HttpResponse, AppError> {
    list(&state, Collection::SovereignStates, "sovereign_states", &query).await
}

#[utoipa::path(
    get,
    path = "/countries",
    tag = "Administrative tiers",
    params(
        ("limit" = Option<usize>, Query),
        ("sovereign_state_id" = Option<String>, Query)
    ),
    responses((status = 200, description = "Country listing"))
)]
pub(crate) async fn list_countries(
    state: web::Data<AppState>,
    query: web::Query<TierListQuery>,
) -> Result<HttpResponse, AppError> {
    list(&state, Collection::Countries, "countries", &query).await
}

#[utoipa::path(
    get,
    path = "/map-units",
    tag = "Administrative tiers",
    params(
        ("limit" = Option<usize>, Query),
        ("sovereign_state_id" = Option<String>, Query),
        ("country_id" = Option<String>, Query)
    ),
    responses((status = 200, description = "Map unit listing"))
)]
pub(crate) async fn list_map_units(
    state: web::Data<AppState>,
    query: web::Query<TierListQuery>,
) -> Result<HttpResponse, AppError> {
    list(&state, Collection::MapUnits, "map_units", &query).await
}

#[utoipa::path(
    get,
    path = "/map-subunits",
    tag = "Administrative tiers",
    params(
        ("limit" = Option<usize>, Query),
        ("sovereign_state_id" = Option<String>, Query),
        ("country_id" = Option<String>, Query),
        ("map_unit_id" = Option<String>, Query)
    ),
    responses((status = 200, description = "Map subunit listing"))
)]
pub(crate) async fn list_map_subunits(
    state: web::Data<AppState>,
    query: web::Query<TierListQuery>,
) -> Result<HttpResponse, AppError> {
    list(&state, Collection::MapSubunits, "map_subunits", &query).await
}

#[utoipa::path(
    get,
    path = "/sovereign-states/{id}",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Sovereign state"), (status = 404, description = "Unknown id"))
)]
pub(crate) async fn sovereign_state_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    detail(&state, Collection::SovereignStates, &path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/countries/{id}",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Country"), (status = 404, description = "Unknown id"))
)]
pub(crate) async fn country_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    detail(&state, Collection::Countries, &path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/map-units/{id}",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Map unit"), (status = 404, description = "Unknown id"))
)]
pub(crate) async fn map_unit_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    detail(&state, Collection::MapUnits, &path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/map-subunits/{id}",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Map subunit"), (status = 404, description = "Unknown id"))
)]
pub(crate) async fn map_subunit_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    detail(&state, Collection::MapSubunits, &path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/sovereign-states/{id}/countries",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Countries of a sovereign state"))
)]
pub(crate) async fn sovereign_state_countries(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let children = CatalogRepository::children(
        state.store.as_ref(),
        Collection::Countries,
        "sovereign_state_id",
        &path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(list_envelope("countries", &children)))
}

#[utoipa::path(
    get,
    path = "/countries/{id}/map-units",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Map units of a country"))
)]
pub(crate) async fn country_map_units(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let children = CatalogRepository::children(
        state.store.as_ref(),
        Collection::MapUnits,
        "country_id",
        &path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(list_envelope("map_units", &children)))
}

#[utoipa::path(
    get,
    path = "/map-units/{id}/subunits",
    tag = "Administrative tiers",
    params(("id" = String, Path)),
    responses((status = 200, description = "Subunits of a map unit"))
)]
pub(crate) async fn map_unit_subunits(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let children = CatalogRepository::children(
        state.store.as_ref(),
        Collection::MapSubunits,
        "map_unit_id",
        &path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(list_envelope("map_subunits", &children)))
}
