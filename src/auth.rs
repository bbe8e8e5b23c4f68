//! Shared-secret service gate.
//!
//! Every request except `OPTIONS` preflights, `/health`, `/metrics` and the
//! API docs must carry `X-Service-Auth` matching the configured secret. The
//! comparison is constant-time so response latency does not reveal how many
//! leading bytes of a candidate match. An unset secret disables the gate.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, ResponseError};
use futures::future::{ready, LocalBoxFuture, Ready};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

pub const AUTH_HEADER: &str = "x-service-auth";

const OPEN_PATHS: &[&str] = &["/health", "/metrics", "/openapi.json"];

/// Constant-time equality of a candidate against the configured secret.
pub fn verify_secret(candidate: &str, secret: &str) -> bool {
    candidate.as_bytes().ct_eq(secret.as_bytes()).into()
}

fn is_open_path(path: &str) -> bool {
    OPEN_PATHS.contains(&path) || path.starts_with("/docs")
}

pub struct ServiceGate {
    secret: Option<String>,
}

impl ServiceGate {
    pub fn new(secret: Option<String>) -> Self {
        ServiceGate { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ServiceGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ServiceGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ServiceGateMiddleware {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct ServiceGateMiddleware<S> {
    service: S,
    secret: Option<String>,
}

impl<S> ServiceGateMiddleware<S> {
    fn is_authorized(&self, req: &ServiceRequest) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };
        if req.method() == Method::OPTIONS || is_open_path(req.path()) {
            return true;
        }
        req.headers()
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|candidate| verify_secret(candidate, secret))
            .unwrap_or(false)
    }
}

impl<S, B> Service<ServiceRequest> for ServiceGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.is_authorized(&req) {
            let fut = self.service.call(req);
            Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
        } else {
            log::warn!("rejected unauthenticated request to {}", req.path());
            let denied = AppError::Unauthorized("Missing or invalid service credentials".into());
            let response = req.into_response(denied.error_response());
            Box::pin(ready(Ok(response.map_into_right_body())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};

    #[test]
    fn secret_comparison() {
        assert!(verify_secret("s3cret", "s3cret"));
        assert!(!verify_secret("s3cres", "s3cret"));
        assert!(!verify_secret("s3cret0", "s3cret"));
        assert!(!verify_secret("", "s3cret"));
    }

    #[test]
    fn open_paths() {
        assert!(is_open_path("/health"));
        assert!(is_open_path("/metrics"));
        assert!(is_open_path("/docs/index.html"));
        assert!(!is_open_path("/countries"));
    }

    async fn ping() -> &'static str {
        "pong"
    }

    macro_rules! gated_app {
        ($secret:expr) => {
            actix_test::init_service(
                App::new()
                    .wrap(ServiceGate::new($secret))
                    .route("/health", web::get().to(ping))
                    .route("/countries", web::get().to(ping)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn gate_disabled_without_secret() {
        let app = gated_app!(None);
        let req = actix_test::TestRequest::get().uri("/countries").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_and_wrong_secret_rejected() {
        let app = gated_app!(Some("s3cret".to_string()));

        let req = actix_test::TestRequest::get().uri("/countries").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Differs only in the last byte.
        let req = actix_test::TestRequest::get()
            .uri("/countries")
            .insert_header(("X-Service-Auth", "s3cres"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn correct_secret_accepted() {
        let app = gated_app!(Some("s3cret".to_string()));
        let req = actix_test::TestRequest::get()
            .uri("/countries")
            .insert_header(("X-Service-Auth", "s3cret"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn preflight_and_health_bypass_the_gate() {
        let app = gated_app!(Some("s3cret".to_string()));

        let req = actix_test::TestRequest::with_uri("/countries")
            .method(Method::OPTIONS)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
