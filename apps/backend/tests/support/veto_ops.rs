//! One-call wrappers that run a veto service operation in its own committed
//! transaction, the way a route handler would.

use time::OffsetDateTime;
use veto_backend::db::txn::with_txn;
use veto_backend::domain::diagnostics::HealthReport;
use veto_backend::domain::types::Side;
use veto_backend::services::veto::{VetoOutcome, VetoService, VetoView};
use veto_backend::services::veto_health::VetoHealthService;
use veto_backend::services::veto_repair::{RepairOutcome, VetoRepairService};
use veto_backend::AppError;

use super::fixtures::TestEnv;

fn service(env: &TestEnv) -> VetoService {
    VetoService::new(env.state.directory.clone())
}

pub async fn create(env: &TestEnv, match_id: i64) -> Result<(VetoOutcome, bool), AppError> {
    let service = service(env);
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { service.create_session(txn, match_id).await })
    })
    .await
}

pub async fn roll(env: &TestEnv, session_id: i64, user_id: i64) -> Result<VetoOutcome, AppError> {
    let service = service(env);
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { service.roll(txn, session_id, user_id).await })
    })
    .await
}

pub async fn act(
    env: &TestEnv,
    session_id: i64,
    user_id: i64,
    map_id: &str,
) -> Result<VetoOutcome, AppError> {
    let service = service(env);
    let map_id = map_id.to_string();
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { service.apply_action(txn, session_id, user_id, &map_id).await })
    })
    .await
}

pub async fn choose_side(
    env: &TestEnv,
    session_id: i64,
    user_id: i64,
    side: Side,
) -> Result<VetoOutcome, AppError> {
    let service = service(env);
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { service.choose_side(txn, session_id, user_id, side).await })
    })
    .await
}

pub async fn view(env: &TestEnv, session_id: i64) -> Result<VetoView, AppError> {
    let service = service(env);
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { service.load_view(txn, session_id).await })
    })
    .await
}

pub async fn reset(env: &TestEnv, session_id: i64) -> Result<RepairOutcome, AppError> {
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { VetoRepairService.reset(txn, session_id).await })
    })
    .await
}

pub async fn rollback(env: &TestEnv, session_id: i64) -> Result<RepairOutcome, AppError> {
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { VetoRepairService.rollback_last_action(txn, session_id).await })
    })
    .await
}

pub async fn force_complete(
    env: &TestEnv,
    session_id: i64,
    map_id: &str,
) -> Result<RepairOutcome, AppError> {
    let map_id = map_id.to_string();
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { VetoRepairService.force_complete(txn, session_id, &map_id).await })
    })
    .await
}

pub async fn fix_turn_sync(env: &TestEnv, session_id: i64) -> Result<RepairOutcome, AppError> {
    with_txn(None, &env.state, |txn| {
        Box::pin(async move { VetoRepairService.fix_turn_sync(txn, session_id).await })
    })
    .await
}

pub async fn scan(
    env: &TestEnv,
    session_id: i64,
    now: OffsetDateTime,
) -> Result<HealthReport, AppError> {
    let db = veto_backend::db::require_db(&env.state)?;
    VetoHealthService::new(env.state.diagnostics)
        .scan(db, session_id, now)
        .await
}

pub async fn scan_active(
    env: &TestEnv,
    now: OffsetDateTime,
) -> Result<Vec<HealthReport>, AppError> {
    let db = veto_backend::db::require_db(&env.state)?;
    VetoHealthService::new(env.state.diagnostics)
        .scan_active(db, now)
        .await
}

/// Create and roll a session for `match_id`; returns the rolled outcome.
pub async fn started(env: &TestEnv, match_id: i64) -> Result<VetoOutcome, AppError> {
    let (created, _) = create(env, match_id).await?;
    roll(env, created.session.id, super::fixtures::USER_A).await
}

/// Play `maps` in order, each by whichever team holds the turn.
pub async fn play(
    env: &TestEnv,
    session_id: i64,
    maps: &[&str],
) -> Result<VetoOutcome, AppError> {
    let mut last = None;
    for map in maps {
        let current = view(env, session_id).await?;
        let team = current
            .session
            .current_turn_team_id
            .expect("a team should hold the turn while playing");
        last = Some(act(env, session_id, env.user_of(team), map).await?);
    }
    Ok(last.expect("play needs at least one map"))
}
