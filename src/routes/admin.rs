//! Admin write surface. Ingest owns all mutation; these endpoints exist so
//! callers get a deliberate 501 rather than a routing 404.

use actix_web::HttpResponse;

use crate::errors::AppError;

#[utoipa::path(
    post,
    path = "/countries",
    tag = "Admin",
    responses((status = 501, description = "Writes are handled by the ingest pipeline"))
)]
pub(crate) async fn create_country() -> Result<HttpResponse, AppError> {
    Err(AppError::NotImplemented(
        "Country writes are handled by the ingest pipeline".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/landmarks",
    tag = "Admin",
    responses((status = 501, description = "Writes are handled by the ingest pipeline"))
)]
pub(crate) async fn create_landmark() -> Result<HttpResponse, AppError> {
    Err(AppError::NotImplemented(
        "Landmark writes are handled by the ingest pipeline".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/boundaries",
    tag = "Admin",
    responses((status = 501, description = "Writes are handled by the ingest pipeline"))
)]
pub(crate) async fn create_boundary() -> Result<HttpResponse, AppError> {
    Err(AppError::NotImplemented(
        "Boundary writes are handled by the ingest pipeline".to_string(),
    ))
}
