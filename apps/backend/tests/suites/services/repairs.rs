// Administrative repairs: reset, rollback, force-complete and turn sync.

use veto_backend::db::txn::with_txn;
use veto_backend::domain::types::{ActionKind, VetoStatus};
use veto_backend::realtime::{RepairKind, VetoEvent};
use veto_backend::repos::sessions::{self, SessionChange};
use veto_backend::{AppError, ErrorCode};

use crate::support::fixtures::{BO1_MATCH, BO3_MATCH, MAP_POOL, USER_B};
use crate::support::test_env;
use crate::support::veto_ops::{
    act, create, fix_turn_sync, force_complete, play, reset, roll, rollback, started, view,
};
use crate::support::TestEnv;

/// Overwrite the stored turn without touching the ledger.
async fn corrupt_turn(env: &TestEnv, session_id: i64, turn: Option<i64>) -> Result<(), AppError> {
    with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            let session = sessions::require_session(txn, session_id).await?;
            sessions::apply_change(txn, SessionChange::of(&session).current_turn(turn)).await?;
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn reset_returns_to_pending_and_allows_a_new_roll() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    play(&env, sid, &MAP_POOL[..3]).await?;

    let out = reset(&env, sid).await?;
    assert_eq!(out.repair, RepairKind::Reset);
    assert!(out.changed);
    assert!(out.actions.is_empty());
    assert_eq!(out.session.status, VetoStatus::Pending);
    assert_eq!(out.session.home_team_id, None);
    assert_eq!(out.session.away_team_id, None);
    assert_eq!(out.session.current_turn_team_id, None);
    assert_eq!(out.session.roll_seed, None);
    assert_eq!(out.session.roll_timestamp, None);
    assert_eq!(out.session.started_at, None);
    assert_eq!(
        out.events,
        vec![VetoEvent::SessionRepaired {
            session_id: sid,
            repair: RepairKind::Reset,
            version: out.session.version,
        }]
    );

    let stored = view(&env, sid).await?;
    assert!(stored.actions.is_empty());
    assert_eq!(stored.session.order, rolled.session.order, "pool survives a reset");

    let rerolled = roll(&env, sid, USER_B).await?;
    assert_eq!(rerolled.session.status, VetoStatus::Banning);
    Ok(())
}

#[tokio::test]
async fn reset_reopens_a_completed_session() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    play(&env, rolled.session.id, &MAP_POOL[..6]).await?;

    let out = reset(&env, rolled.session.id).await?;
    assert_eq!(out.session.status, VetoStatus::Pending);
    assert_eq!(out.session.completed_at, None);
    Ok(())
}

#[tokio::test]
async fn rollback_then_resubmit() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    let (home, away) = rolled.session.teams().expect("rolled session has teams");
    play(&env, sid, &MAP_POOL[..2]).await?;

    let out = rollback(&env, sid).await?;
    assert_eq!(out.repair, RepairKind::Rollback);
    assert_eq!(out.actions.len(), 1);
    assert_eq!(out.session.status, VetoStatus::Banning);
    assert_eq!(out.session.current_turn_team_id, Some(away));
    assert!(out.message.contains(MAP_POOL[1]));

    // The same team can ban the same map again.
    let again = act(&env, sid, env.user_of(away), MAP_POOL[1]).await?;
    assert_eq!(again.actions.len(), 2);
    assert_eq!(again.actions[1].order_number, 2);
    assert_eq!(again.session.current_turn_team_id, Some(away));

    let first_removed = rollback(&env, sid).await?;
    assert_eq!(first_removed.actions.len(), 1);
    let emptied = rollback(&env, sid).await?;
    assert!(emptied.actions.is_empty());
    assert_eq!(emptied.session.current_turn_team_id, Some(home));
    Ok(())
}

#[tokio::test]
async fn rollback_on_empty_ledger_is_rejected() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;

    let err = rollback(&env, rolled.session.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoActionsToRollback);
    assert_eq!(err.status().as_u16(), 409);
    Ok(())
}

#[tokio::test]
async fn rollback_of_bo1_completion_removes_system_pick_and_last_ban() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    let (home, _) = rolled.session.teams().expect("rolled session has teams");
    play(&env, sid, &MAP_POOL[..6]).await?;

    let out = rollback(&env, sid).await?;
    assert_eq!(out.actions.len(), 5);
    assert!(out.actions.iter().all(|a| a.action == ActionKind::Ban));
    assert_eq!(out.session.status, VetoStatus::Banning);
    assert_eq!(out.session.completed_at, None);
    assert_eq!(out.session.current_turn_team_id, Some(home));

    let done = act(&env, sid, env.user_of(home), MAP_POOL[6]).await?;
    assert_eq!(done.session.status, VetoStatus::Completed);
    assert_eq!(
        done.actions.last().map(|a| a.map_id.as_str()),
        Some(MAP_POOL[5]),
        "the system picks whatever map is left"
    );
    Ok(())
}

#[tokio::test]
async fn rollback_from_side_choice_reopens_banning() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO3_MATCH).await?;
    let sid = rolled.session.id;
    let (home, _) = rolled.session.teams().expect("rolled session has teams");
    play(&env, sid, &MAP_POOL).await?;

    let out = rollback(&env, sid).await?;
    assert_eq!(out.actions.len(), 6);
    assert_eq!(out.session.status, VetoStatus::Banning);
    assert_eq!(out.session.current_turn_team_id, Some(home));

    let current = view(&env, sid).await?;
    assert_eq!(current.next_action, Some(ActionKind::Pick));
    Ok(())
}

#[tokio::test]
async fn force_complete_replaces_the_ledger() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    play(&env, sid, &MAP_POOL[..3]).await?;

    let out = force_complete(&env, sid, "bind").await?;
    assert_eq!(out.repair, RepairKind::ForceComplete);
    assert_eq!(out.session.status, VetoStatus::Completed);
    assert_eq!(out.session.current_turn_team_id, None);
    assert!(out.session.completed_at.is_some());

    let stored = view(&env, sid).await?;
    assert_eq!(stored.actions.len(), 1);
    let pick = &stored.actions[0];
    assert_eq!(pick.order_number, 1);
    assert_eq!(pick.action, ActionKind::Pick);
    assert_eq!(pick.map_id, "bind");
    assert!(pick.is_system());
    Ok(())
}

#[tokio::test]
async fn force_complete_works_before_the_roll() -> Result<(), AppError> {
    let env = test_env().await?;
    let (created, _) = create(&env, BO1_MATCH).await?;

    let out = force_complete(&env, created.session.id, "haven").await?;
    assert_eq!(out.session.status, VetoStatus::Completed);
    assert_eq!(out.actions.len(), 1);
    Ok(())
}

#[tokio::test]
async fn roll_cannot_reopen_a_forced_completion() -> Result<(), AppError> {
    let env = test_env().await?;
    let (created, _) = create(&env, BO1_MATCH).await?;
    let sid = created.session.id;
    force_complete(&env, sid, "haven").await?;

    let err = roll(&env, sid, USER_B).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
    assert_eq!(err.status().as_u16(), 409);

    let stored = view(&env, sid).await?;
    assert_eq!(stored.session.status, VetoStatus::Completed);
    assert_eq!(stored.session.home_team_id, None);
    assert_eq!(stored.actions.len(), 1);
    assert_eq!(stored.actions[0].map_id, "haven");

    // Reset is the way out of a completed session.
    reset(&env, sid).await?;
    let rolled = roll(&env, sid, USER_B).await?;
    assert_eq!(rolled.session.status, VetoStatus::Banning);
    Ok(())
}

#[tokio::test]
async fn force_complete_rejects_maps_outside_the_pool() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    play(&env, rolled.session.id, &MAP_POOL[..1]).await?;

    let err = force_complete(&env, rolled.session.id, "dust2")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownMap);

    let untouched = view(&env, rolled.session.id).await?;
    assert_eq!(untouched.actions.len(), 1);
    assert_eq!(untouched.session.status, VetoStatus::Banning);
    Ok(())
}

#[tokio::test]
async fn fix_turn_sync_is_a_no_op_when_consistent() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;

    let out = fix_turn_sync(&env, sid).await?;
    assert!(!out.changed);
    assert_eq!(out.message, "No issue found");
    assert!(out.events.is_empty());
    assert_eq!(out.session.version, rolled.session.version);
    Ok(())
}

#[tokio::test]
async fn fix_turn_sync_restores_the_expected_turn() -> Result<(), AppError> {
    let env = test_env().await?;
    let rolled = started(&env, BO1_MATCH).await?;
    let sid = rolled.session.id;
    let (home, away) = rolled.session.teams().expect("rolled session has teams");
    play(&env, sid, &MAP_POOL[..1]).await?;

    corrupt_turn(&env, sid, Some(home)).await?;

    let out = fix_turn_sync(&env, sid).await?;
    assert!(out.changed);
    assert_eq!(out.repair, RepairKind::TurnSync);
    assert_eq!(out.session.current_turn_team_id, Some(away));
    assert_eq!(
        out.message,
        format!("Current turn changed from team {home} to team {away}")
    );
    Ok(())
}
