use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use veto_backend::routes;
use veto_backend::state::app_state::AppState;
use veto_backend::{RequestTrace, StructuredLogger, TraceSpan};

/// Initialize the full route table over `state` with the same middleware
/// stack `main.rs` installs, so error bodies carry a real trace id.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
