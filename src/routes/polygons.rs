//! Country polygon reads for map rendering. Restricted to the `countries`
//! collection so the same landmass is never double-counted across tiers.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::responses::list_envelope;
use crate::repositories::CatalogRepository;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/polygons/country/{id}",
    tag = "Polygons",
    params(("id" = String, Path)),
    responses(
        (status = 200, description = "Country polygon with bounds"),
        (status = 404, description = "Unknown, inactive, or geometry-less country")
    )
)]
pub(crate) async fn by_country(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let polygon =
        CatalogRepository::polygon_by_country(state.store.as_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(polygon))
}

#[utoipa::path(
    get,
    path = "/polygons/continent/{continent}",
    tag = "Polygons",
    params(("continent" = String, Path)),
    responses((status = 200, description = "Active country polygons of the continent"))
)]
pub(crate) async fn by_continent(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let continent = path.into_inner();
    if continent.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required parameter: continent".to_string(),
        ));
    }

    let polygons =
        CatalogRepository::polygons_by_continent(state.store.as_ref(), &continent).await?;
    Ok(HttpResponse::Ok().json(list_envelope("polygons", &polygons)))
}

#[utoipa::path(
    get,
    path = "/polygons/world",
    tag = "Polygons",
    responses((status = 200, description = "Every active country polygon"))
)]
pub(crate) async fn world(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let polygons = CatalogRepository::polygons_world(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(list_envelope("polygons", &polygons)))
}
