// Health scans over stored sessions.

use time::{Duration, OffsetDateTime};
use veto_backend::db::txn::with_txn;
use veto_backend::domain::diagnostics::HealthIssue;
use veto_backend::domain::types::{ActionKind, VetoStatus};
use veto_backend::repos::actions::{self, NewAction};
use veto_backend::repos::sessions::{self, SessionChange};
use veto_backend::{AppError, ErrorCode};

use crate::support::fixtures::{BO1_MATCH, BO3_MATCH, MAP_POOL};
use crate::support::test_env;
use crate::support::veto_ops::{create, play, scan, scan_active, started, view};
use crate::support::TestEnv;

/// Append a ledger row directly, bypassing every protocol check.
async fn append_raw(
    env: &TestEnv,
    session_id: i64,
    order_number: usize,
    action: NewAction,
) -> Result<(), AppError> {
    with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            actions::append(txn, session_id, order_number, action, OffsetDateTime::now_utc())
                .await?;
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn fresh_and_running_sessions_are_healthy() -> Result<(), AppError> {
    let env = test_env().await?;
    let now = OffsetDateTime::now_utc();

    let (pending, _) = create(&env, BO3_MATCH).await?;
    let report = scan(&env, pending.session.id, now).await?;
    assert!(report.is_healthy(), "{:?}", report.issues);
    assert!(!report.is_stuck);
    assert_eq!(report.status, VetoStatus::Pending);
    assert_eq!(report.expected_action_count, 7);

    let rolled = started(&env, BO1_MATCH).await?;
    play(&env, rolled.session.id, &MAP_POOL[..2]).await?;
    let report = scan(&env, rolled.session.id, OffsetDateTime::now_utc()).await?;
    assert!(report.is_healthy(), "{:?}", report.issues);
    assert_eq!(report.action_count, 2);
    assert_eq!(report.match_id, BO1_MATCH);
    Ok(())
}

#[tokio::test]
async fn idle_banning_session_is_stale_and_stuck() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;

    let later = OffsetDateTime::now_utc() + Duration::hours(25);
    let report = scan(&env, rolled.session.id, later).await?;

    assert!(report.is_stuck);
    assert!(
        report
            .issues
            .iter()
            .any(|i| matches!(i, HealthIssue::Stale { idle_minutes } if *idle_minutes >= 24 * 60)),
        "{:?}",
        report.issues
    );
    Ok(())
}

#[tokio::test]
async fn stored_turn_mismatch_is_reported() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    let (home, away) = rolled.session.teams().expect("rolled session has teams");

    with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            let session = sessions::require_session(txn, sid).await?;
            sessions::apply_change(txn, SessionChange::of(&session).current_turn(Some(away)))
                .await?;
            Ok::<_, AppError>(())
        })
    })
    .await?;

    let report = scan(&env, sid, OffsetDateTime::now_utc()).await?;
    assert_eq!(
        report.issues,
        vec![HealthIssue::TurnDesync {
            expected: Some(home),
            actual: Some(away),
        }]
    );
    assert!(report.is_stuck);
    Ok(())
}

#[tokio::test]
async fn ledger_anomalies_are_reported() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    let (home, _) = rolled.session.teams().expect("rolled session has teams");

    append_raw(
        &env,
        sid,
        3,
        NewAction::by_team(ActionKind::Ban, "dust2", home, env.user_of(home)),
    )
    .await?;

    let report = scan(&env, sid, OffsetDateTime::now_utc()).await?;
    assert!(report.issues.contains(&HealthIssue::UnknownMap {
        map_id: "dust2".to_string(),
    }));
    assert!(report.issues.contains(&HealthIssue::OrderNumberGap {
        position: 1,
        found: 3,
    }));
    Ok(())
}

#[tokio::test]
async fn repeated_scans_agree_and_leave_the_session_alone() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO3_MATCH).await?;
    let sid = rolled.session.id;
    play(&env, sid, &MAP_POOL[..2]).await?;
    let (home, _) = rolled.session.teams().expect("rolled session has teams");

    // Out of sync: the ledger says home is next after two bans.
    with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            let session = sessions::require_session(txn, sid).await?;
            sessions::apply_change(txn, SessionChange::of(&session).current_turn(None)).await?;
            Ok::<_, AppError>(())
        })
    })
    .await?;

    let before = view(&env, sid).await?;
    let now = OffsetDateTime::now_utc() + Duration::hours(30);

    let first = scan(&env, sid, now).await?;
    let second = scan(&env, sid, now).await?;
    assert_eq!(first, second);
    assert!(first.issues.contains(&HealthIssue::TurnDesync {
        expected: Some(home),
        actual: None,
    }));
    assert!(first.is_stuck);

    let after = view(&env, sid).await?;
    assert_eq!(after.session.version, before.session.version);
    assert_eq!(after.session.updated_at, before.session.updated_at);
    assert_eq!(after.session, before.session);
    assert_eq!(after.actions, before.actions);
    Ok(())
}

#[tokio::test]
async fn scan_active_skips_completed_sessions() -> Result<(), AppError> {
    let env = test_env().await?;

    let (pending, _) = create(&env, BO3_MATCH).await?;
    let finished = started(&env, BO1_MATCH).await?;
    play(&env, finished.session.id, &MAP_POOL[..6]).await?;

    let reports = scan_active(&env, OffsetDateTime::now_utc()).await?;
    let ids: Vec<i64> = reports.iter().map(|r| r.session_id).collect();
    assert_eq!(ids, vec![pending.session.id]);
    Ok(())
}

#[tokio::test]
async fn scanning_an_unknown_session_is_not_found() -> Result<(), AppError> {
    let env = test_env().await?;
    let err = scan(&env, 777, OffsetDateTime::now_utc()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SessionNotFound);
    Ok(())
}
