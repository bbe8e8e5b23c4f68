use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::requests::BulkCountriesQuery;
use crate::models::responses::BulkCountriesPayload;
use crate::repositories::CatalogRepository;
use crate::AppState;

/// Deduplicated country universe for consumers that need every country in
/// one response: sovereign states first, then countries not already seen,
/// with territory status and sovereign display names resolved.
#[utoipa::path(
    get,
    path = "/countries/bulk",
    tag = "Administrative tiers",
    params(("user_id" = Option<String>, Query, description = "Echoed back in the envelope")),
    responses(
        (status = 200, description = "Country universe", body = BulkCountriesPayload)
    )
)]
pub(crate) async fn bulk_countries(
    state: web::Data<AppState>,
    query: web::Query<BulkCountriesQuery>,
) -> Result<HttpResponse, AppError> {
    let countries =
        CatalogRepository::bulk_countries(state.store.as_ref(), &state.config.cdn_base_url)
            .await?;

    Ok(HttpResponse::Ok().json(BulkCountriesPayload {
        count: countries.len(),
        countries,
        user_id: query.into_inner().user_id,
        visited_count: 0,
    }))
}
