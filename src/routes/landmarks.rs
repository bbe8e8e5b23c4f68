use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::errors::AppError;
use crate::models::requests::{LandmarkListQuery, NearbyQuery};
use crate::models::responses::list_envelope;
use crate::repositories::CatalogRepository;
use crate::validation::validate_radius;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/landmarks",
    tag = "Landmarks",
    params(
        ("country" = Option<String>, Query),
        ("type" = Option<String>, Query),
        ("category" = Option<String>, Query),
        ("limit" = Option<usize>, Query)
    ),
    responses((status = 200, description = "Landmark listing"))
)]
pub(crate) async fn list_landmarks(
    state: web::Data<AppState>,
    query: web::Query<LandmarkListQuery>,
) -> Result<HttpResponse, AppError> {
    let items = CatalogRepository::list_landmarks(state.store.as_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(list_envelope("landmarks", &items)))
}

#[utoipa::path(
    get,
    path = "/landmarks/{id}",
    tag = "Landmarks",
    params(("id" = String, Path)),
    responses((status = 200, description = "Landmark"), (status = 404, description = "Unknown id"))
)]
pub(crate) async fn landmark_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let landmark =
        CatalogRepository::landmark_detail(state.store.as_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(landmark))
}

/// Radius-filtered landmarks with per-record great-circle distance.
#[utoipa::path(
    get,
    path = "/landmarks/nearby",
    tag = "Landmarks",
    params(
        ("lat" = f64, Query),
        ("lon" = f64, Query),
        ("radius" = Option<f64>, Query, description = "Metres, default 1000"),
        ("limit" = Option<usize>, Query, description = "Default 20")
    ),
    responses(
        (status = 200, description = "Nearby landmarks, nearest first"),
        (status = 400, description = "Invalid coordinates or radius")
    )
)]
pub(crate) async fn nearby_landmarks(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;
    validate_radius(query.radius)?;

    let items = CatalogRepository::nearby_landmarks(
        state.store.as_ref(),
        query.lat,
        query.lon,
        query.radius,
        query.limit,
    )
    .await?;
    Ok(HttpResponse::Ok().json(list_envelope("landmarks", &items)))
}
