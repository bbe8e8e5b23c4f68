use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::responses::list_envelope;
use crate::repositories::CatalogRepository;
use crate::AppState;

/// The achievement catalog is derived on demand from active landmarks and
/// restaurants; nothing is persisted.
#[utoipa::path(
    get,
    path = "/achievements/definitions",
    tag = "Achievements",
    responses((status = 200, description = "Union of landmark and restaurant achievements"))
)]
pub(crate) async fn definitions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let achievements =
        CatalogRepository::achievement_definitions(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(list_envelope("achievements", &achievements)))
}
