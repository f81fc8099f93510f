use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;
use crate::extractors::acting_user::USER_ID_HEADER;

/// One `request_completed` line per request; level follows the status class.
///
/// Veto routes also carry the matched route pattern, the `session_id` path
/// segment and the acting user, so a session's history can be pulled from
/// the logs without parsing URLs.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Request fields known only once routing has run.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RouteFields {
    pub route: Option<String>,
    pub session_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl RouteFields {
    pub(crate) fn from_request(req: &HttpRequest) -> Self {
        Self {
            route: req.match_pattern(),
            session_id: req
                .match_info()
                .get("session_id")
                .and_then(|raw| raw.parse().ok()),
            user_id: req
                .headers()
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|raw| raw.trim().parse().ok()),
        }
    }
}

fn log_completion(
    method: &str,
    path: &str,
    status: StatusCode,
    duration_us: u64,
    trace_id: &str,
    fields: &RouteFields,
) {
    let status_code = status.as_u16();
    let route = fields.route.as_deref().unwrap_or("unmatched");

    macro_rules! completed {
        ($level:ident) => {
            $level!(
                http.method = %method,
                url.path = %path,
                http.route = %route,
                http.status_code = status_code,
                veto.session_id = fields.session_id,
                enduser.id = fields.user_id,
                duration_us,
                trace_id = %trace_id,
                "request_completed"
            )
        };
    }

    if status.is_server_error() {
        completed!(error);
    } else if status.is_client_error() {
        completed!(warn);
    } else {
        completed!(info);
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, fields) = match &result {
                Ok(res) => (res.status(), RouteFields::from_request(res.request())),
                Err(err) => (err.as_response_error().status_code(), RouteFields::default()),
            };
            let duration_us = start.elapsed().as_micros() as u64;

            log_completion(&method, &path, status, duration_us, &trace_id, &fields);

            result
        })
    }
}
