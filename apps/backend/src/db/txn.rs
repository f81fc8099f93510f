use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::debug;

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A shared transaction that tests inject into request extensions so several
/// requests observe one uncommitted unit of work.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<SharedTxn> {
        req.extensions().get::<SharedTxn>().cloned()
    }
}

/// Execute `f` within a database transaction.
///
/// 1) A `SharedTxn` in the request extensions is used as-is (no commit/rollback here).
/// 2) Otherwise a transaction is opened; on `Ok` the process `TxnPolicy` decides
///    between commit and rollback, on `Err` it is rolled back.
///
/// Callers write `|txn| Box::pin(async move { ... })` and move owned values in.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> LocalBoxFuture<'a, Result<R, AppError>>,
{
    // Clone out of the extensions before awaiting so no RefCell borrow is held.
    if let Some(shared) = req.and_then(SharedTxn::from_req) {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            match txn_policy::current() {
                txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                txn_policy::TxnPolicy::RollbackOnOk => {
                    debug!("txn_policy=rollback_on_ok");
                    txn.rollback().await?
                }
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; the original error wins.
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
