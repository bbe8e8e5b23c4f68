use actix_web::{web, HttpResponse};

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is alive"))
)]
pub(crate) async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "System",
    responses((status = 200, description = "Prometheus text metrics"))
)]
pub(crate) async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let uptime = state.started.elapsed().as_secs();
    let body = format!(
        "# HELP geocontext_uptime_seconds Seconds since process start.\n\
         # TYPE geocontext_uptime_seconds counter\n\
         geocontext_uptime_seconds {uptime}\n\
         # HELP geocontext_service_info Static service metadata.\n\
         # TYPE geocontext_service_info gauge\n\
         geocontext_service_info{{name=\"geocontext-api\",version=\"{version}\"}} 1\n",
        version = env!("CARGO_PKG_VERSION"),
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}
