// with_txn under the commit-on-ok policy this binary installs.

use veto_backend::db::txn::with_txn;
use veto_backend::db::txn_policy::{current, TxnPolicy};
use veto_backend::domain::types::BestOf;
use veto_backend::domain::veto_order::VetoOrder;
use veto_backend::infra::state::build_state;
use veto_backend::repos::sessions;
use veto_backend::{AppError, ErrorCode};

use crate::support::fixtures::MAP_POOL;
use crate::support::test_env;

fn bo1_order() -> VetoOrder {
    VetoOrder::new(BestOf::Bo1, MAP_POOL.iter().map(|m| m.to_string()).collect())
        .expect("fixture pool is valid")
}

#[tokio::test]
async fn ok_commits() -> Result<(), AppError> {
    assert_eq!(current(), TxnPolicy::CommitOnOk);
    let env = test_env().await?;

    let created = with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            Ok::<_, AppError>(sessions::create_session(txn, 42, &bo1_order()).await?)
        })
    })
    .await?;

    let db = veto_backend::db::require_db(&env.state)?;
    let found = sessions::find_by_match(db, 42).await?;
    assert_eq!(found.map(|s| s.id), Some(created.id));
    Ok(())
}

#[tokio::test]
async fn err_rolls_back() -> Result<(), AppError> {
    let env = test_env().await?;

    let result: Result<(), AppError> = with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            sessions::create_session(txn, 43, &bo1_order()).await?;
            Err::<(), _>(AppError::internal("forced failure after insert"))
        })
    })
    .await;
    assert_eq!(result.unwrap_err().code(), ErrorCode::InternalError);

    let db = veto_backend::db::require_db(&env.state)?;
    assert!(sessions::find_by_match(db, 43).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_match_is_a_conflict() -> Result<(), AppError> {
    let env = test_env().await?;

    with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            Ok::<_, AppError>(sessions::create_session(txn, 44, &bo1_order()).await?)
        })
    })
    .await?;

    let err = with_txn(None, &env.state, |txn| {
        Box::pin(async move {
            Ok::<_, AppError>(sessions::create_session(txn, 44, &bo1_order()).await?)
        })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SessionExists);
    assert_eq!(err.status().as_u16(), 409);
    Ok(())
}

#[tokio::test]
async fn missing_db_is_unavailable() -> Result<(), AppError> {
    let state = build_state().build().await?;

    let err = with_txn(None, &state, |_txn| Box::pin(async move { Ok::<_, AppError>(()) }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
    assert_eq!(err.status().as_u16(), 503);
    Ok(())
}
