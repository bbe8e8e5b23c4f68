use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::errors::AppError;
use crate::models::requests::{BatchClassifyRequest, PointQuery};
use crate::models::responses::list_envelope;
use crate::models::ClassifyPayload;
use crate::repositories::CoastlineRepository;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/coastline/classify",
    tag = "Coastline",
    params(("lat" = f64, Query), ("lon" = f64, Query)),
    responses(
        (status = 200, description = "Land/ocean classification", body = ClassifyPayload),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub(crate) async fn classify(
    state: web::Data<AppState>,
    query: web::Query<PointQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let result =
        CoastlineRepository::classify(state.store.as_ref(), query.lat, query.lon).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/coastline/distance",
    tag = "Coastline",
    params(("lat" = f64, Query), ("lon" = f64, Query)),
    responses(
        (status = 200, description = "Distance to the nearest known coastline"),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub(crate) async fn distance(
    state: web::Data<AppState>,
    query: web::Query<PointQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let result =
        CoastlineRepository::distance_to_coast(state.store.as_ref(), query.lat, query.lon)
            .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    post,
    path = "/coastline/batch-classify",
    tag = "Coastline",
    request_body = BatchClassifyRequest,
    responses(
        (status = 200, description = "Per-point classification, input order preserved"),
        (status = 400, description = "Invalid body, coordinates, or batch size")
    )
)]
pub(crate) async fn batch_classify(
    state: web::Data<AppState>,
    body: web::Json<BatchClassifyRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let results =
        CoastlineRepository::batch_classify(state.store.as_ref(), &body.points).await?;
    Ok(HttpResponse::Ok().json(list_envelope("results", &results)))
}
