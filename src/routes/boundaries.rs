use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::errors::AppError;
use crate::models::requests::{BatchLookupRequest, BoundariesQuery};
use crate::models::responses::list_envelope;
use crate::repositories::{BoundaryRepository, EnrichmentRepository};
use crate::AppState;

/// Hierarchical spatial resolution: every administrative entity, across all
/// four tiers, whose polygon contains the point.
#[utoipa::path(
    get,
    path = "/boundaries/containing",
    tag = "Boundaries",
    params(
        ("lat" = f64, Query),
        ("lon" = f64, Query),
        ("include_geometry" = Option<bool>, Query, description = "Return stored geometry verbatim")
    ),
    responses(
        (status = 200, description = "Containing boundaries in tier order"),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub(crate) async fn containing(
    state: web::Data<AppState>,
    query: web::Query<BoundariesQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let matches = BoundaryRepository::resolve(state.store.as_ref(), query.lat, query.lon).await?;

    let mut boundaries = matches.into_boundaries();
    if !query.include_geometry {
        for boundary in &mut boundaries {
            boundary.entity.geometry.clear();
        }
    }
    Ok(HttpResponse::Ok().json(list_envelope("boundaries", &boundaries)))
}

/// Bulk square enrichment for the core grid service.
#[utoipa::path(
    post,
    path = "/boundaries/batch-lookup",
    tag = "Boundaries",
    request_body = BatchLookupRequest,
    responses(
        (status = 200, description = "Per-square enrichment, input order preserved"),
        (status = 400, description = "Invalid body, coordinates, or batch size")
    )
)]
pub(crate) async fn batch_lookup(
    state: web::Data<AppState>,
    body: web::Json<BatchLookupRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let results = EnrichmentRepository::enrich(
        state.store.as_ref(),
        &body.points,
        body.include_coastline,
    )
    .await?;
    Ok(HttpResponse::Ok().json(list_envelope("results", &results)))
}
