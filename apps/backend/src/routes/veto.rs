//! Player-facing veto endpoints. The acting user comes from the gateway's
//! `X-User-Id` header; events are published only after the transaction
//! has committed.

use actix_web::http::header::ETAG;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::domain::types::Side;
use crate::error::AppError;
use crate::extractors::{ActingUser, MatchId, SessionId, ValidatedJson};
use crate::http::etag::{if_none_match_hits, veto_etag};
use crate::services::veto::{VetoOutcome, VetoService, VetoView};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub map_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SideRequest {
    pub side: Side,
}

fn view_response(status: StatusCode, view: &VetoView) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((ETAG, veto_etag(view.session.id, view.session.version)))
        .json(view)
}

async fn publish_and_respond(
    app_state: &AppState,
    status: StatusCode,
    outcome: VetoOutcome,
) -> HttpResponse {
    let view = outcome.view();
    app_state.events.publish_all(outcome.events).await;
    view_response(status, &view)
}

/// POST /api/matches/{match_id}/veto
///
/// 201 with the new session, or 200 with the existing one.
async fn create_session(
    http_req: HttpRequest,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoService::new(app_state.directory.clone());
    let match_id = match_id.0;

    let (outcome, created) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.create_session(txn, match_id).await })
    })
    .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(publish_and_respond(&app_state, status, outcome).await)
}

/// GET /api/veto/{session_id}
///
/// Honors `If-None-Match` against the session's ETag.
async fn get_view(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoService::new(app_state.directory.clone());
    let id = session_id.0;

    let view = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.load_view(txn, id).await })
    })
    .await?;

    let etag = veto_etag(view.session.id, view.session.version);
    if if_none_match_hits(http_req.headers(), &etag) {
        return Ok(HttpResponse::NotModified()
            .insert_header((ETAG, etag))
            .finish());
    }
    Ok(view_response(StatusCode::OK, &view))
}

/// POST /api/veto/{session_id}/roll
async fn roll(
    http_req: HttpRequest,
    session_id: SessionId,
    user: ActingUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoService::new(app_state.directory.clone());
    let (id, user_id) = (session_id.0, user.id());

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.roll(txn, id, user_id).await })
    })
    .await?;

    Ok(publish_and_respond(&app_state, StatusCode::OK, outcome).await)
}

/// POST /api/veto/{session_id}/actions  `{ "map_id": "..." }`
async fn submit_action(
    http_req: HttpRequest,
    session_id: SessionId,
    user: ActingUser,
    body: ValidatedJson<ActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoService::new(app_state.directory.clone());
    let (id, user_id) = (session_id.0, user.id());
    let map_id = body.into_inner().map_id;

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.apply_action(txn, id, user_id, &map_id).await })
    })
    .await?;

    Ok(publish_and_respond(&app_state, StatusCode::OK, outcome).await)
}

/// POST /api/veto/{session_id}/side  `{ "side": "attack" | "defense" }`
async fn choose_side(
    http_req: HttpRequest,
    session_id: SessionId,
    user: ActingUser,
    body: ValidatedJson<SideRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoService::new(app_state.directory.clone());
    let (id, user_id) = (session_id.0, user.id());
    let side = body.side;

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.choose_side(txn, id, user_id, side).await })
    })
    .await?;

    Ok(publish_and_respond(&app_state, StatusCode::OK, outcome).await)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/{match_id}/veto", web::post().to(create_session))
        .route("/veto/{session_id}", web::get().to(get_view))
        .route("/veto/{session_id}/roll", web::post().to(roll))
        .route("/veto/{session_id}/actions", web::post().to(submit_action))
        .route("/veto/{session_id}/side", web::post().to(choose_side));
}
