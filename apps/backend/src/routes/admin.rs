//! Administrative veto endpoints: health scans and repairs.
//!
//! Access control is enforced by the gateway in front of `/api/admin`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::domain::diagnostics::HealthReport;
use crate::error::AppError;
use crate::extractors::{SessionId, ValidatedJson};
use crate::services::veto_health::VetoHealthService;
use crate::services::veto_repair::{RepairOutcome, VetoRepairService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForceCompleteRequest {
    pub map_id: String,
}

#[derive(Debug, Serialize)]
struct ActiveHealthResponse {
    #[serde(with = "time::serde::rfc3339")]
    scanned_at: OffsetDateTime,
    total: usize,
    unhealthy: usize,
    stuck: usize,
    sessions: Vec<HealthReport>,
}

async fn publish_and_respond(app_state: &AppState, mut outcome: RepairOutcome) -> HttpResponse {
    let events = std::mem::take(&mut outcome.events);
    app_state.events.publish_all(events).await;
    HttpResponse::Ok().json(outcome)
}

/// GET /api/admin/veto/health
async fn scan_active(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoHealthService::new(app_state.diagnostics);
    let now = OffsetDateTime::now_utc();

    let sessions = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.scan_active(txn, now).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ActiveHealthResponse {
        scanned_at: now,
        total: sessions.len(),
        unhealthy: sessions.iter().filter(|r| !r.is_healthy()).count(),
        stuck: sessions.iter().filter(|r| r.is_stuck).count(),
        sessions,
    }))
}

/// GET /api/admin/veto/{session_id}/health
async fn scan_session(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let service = VetoHealthService::new(app_state.diagnostics);
    let id = session_id.0;
    let now = OffsetDateTime::now_utc();

    let report = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { service.scan(txn, id, now).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// POST /api/admin/veto/{session_id}/reset
async fn reset(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = session_id.0;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { VetoRepairService.reset(txn, id).await })
    })
    .await?;
    Ok(publish_and_respond(&app_state, outcome).await)
}

/// POST /api/admin/veto/{session_id}/rollback
async fn rollback(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = session_id.0;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { VetoRepairService.rollback_last_action(txn, id).await })
    })
    .await?;
    Ok(publish_and_respond(&app_state, outcome).await)
}

/// POST /api/admin/veto/{session_id}/force-complete  `{ "map_id": "..." }`
async fn force_complete(
    http_req: HttpRequest,
    session_id: SessionId,
    body: ValidatedJson<ForceCompleteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = session_id.0;
    let map_id = body.into_inner().map_id;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { VetoRepairService.force_complete(txn, id, &map_id).await })
    })
    .await?;
    Ok(publish_and_respond(&app_state, outcome).await)
}

/// POST /api/admin/veto/{session_id}/fix-turn-sync
///
/// 200 either way; `changed: false` means the turn was already correct.
async fn fix_turn_sync(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = session_id.0;
    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { VetoRepairService.fix_turn_sync(txn, id).await })
    })
    .await?;
    Ok(publish_and_respond(&app_state, outcome).await)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(scan_active))
        .route("/{session_id}/health", web::get().to(scan_session))
        .route("/{session_id}/reset", web::post().to(reset))
        .route("/{session_id}/rollback", web::post().to(rollback))
        .route("/{session_id}/force-complete", web::post().to(force_complete))
        .route("/{session_id}/fix-turn-sync", web::post().to(fix_turn_sync));
}
