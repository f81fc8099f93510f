//! Administrative repairs for veto sessions.
//!
//! These are the only operations allowed to step outside normal turn order.
//! Each one reads the session, rewrites the ledger and/or session fields and
//! writes the session back under its version guard, all in the caller's
//! transaction.

use sea_orm::DatabaseTransaction;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::domain::session::{user_action_count, VetoAction, VetoSession};
use crate::domain::turn_sequencer::expected_turn;
use crate::domain::types::VetoStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::realtime::{RepairKind, VetoEvent};
use crate::repos::actions::NewAction;
use crate::repos::sessions::SessionChange;
use crate::repos::{actions, sessions};

#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    pub repair: RepairKind,
    /// False when the repair found nothing to do.
    pub changed: bool,
    pub message: String,
    pub session: VetoSession,
    pub actions: Vec<VetoAction>,
    #[serde(skip)]
    pub events: Vec<VetoEvent>,
}

impl RepairOutcome {
    fn applied(
        repair: RepairKind,
        message: String,
        session: VetoSession,
        actions: Vec<VetoAction>,
    ) -> Self {
        let events = vec![VetoEvent::SessionRepaired {
            session_id: session.id,
            repair,
            version: session.version,
        }];
        Self {
            repair,
            changed: true,
            message,
            session,
            actions,
            events,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct VetoRepairService;

impl VetoRepairService {
    /// Wipe the ledger and return the session to `pending`, roll included.
    pub async fn reset(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
    ) -> Result<RepairOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        let removed = actions::clear(txn, session_id).await?;
        let updated =
            sessions::apply_change(txn, SessionChange::of(&session).back_to_pending()).await?;

        warn!(
            session_id,
            previous_status = %session.status,
            removed_actions = removed,
            "Veto session reset"
        );
        Ok(RepairOutcome::applied(
            RepairKind::Reset,
            format!("Session reset to pending; {removed} action(s) removed"),
            updated,
            Vec::new(),
        ))
    }

    /// Undo the most recent move.
    ///
    /// A system pick that completed a best-of-one goes together with the ban
    /// that triggered it, so the session lands back on a team's turn.
    pub async fn rollback_last_action(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
    ) -> Result<RepairOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        let mut ledger = actions::list_for_session(txn, session_id).await?;

        let last = ledger.pop().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::NoActionsToRollback,
                format!("Session {session_id} has no actions to roll back"),
            )
        })?;
        actions::delete(txn, last.id).await?;
        let mut removed = vec![last];

        if removed[0].is_system() && user_action_count(&ledger) >= session.order.user_actions() {
            if let Some(trigger) = ledger.pop() {
                actions::delete(txn, trigger.id).await?;
                removed.push(trigger);
            }
        }

        let status = match session.status {
            VetoStatus::Completed | VetoStatus::SideChoice => VetoStatus::Banning,
            other => other,
        };
        let turn = expected_turn(
            status,
            &session.order,
            user_action_count(&ledger),
            session.home_team_id,
            session.away_team_id,
        );
        let change = SessionChange::of(&session)
            .status(status)
            .current_turn(turn)
            .clear_completed_at();
        let updated = sessions::apply_change(txn, change).await?;

        let maps: Vec<&str> = removed.iter().map(|a| a.map_id.as_str()).collect();
        warn!(
            session_id,
            removed = ?maps,
            status = %updated.status,
            "Rolled back last veto action"
        );
        let message = format!("Removed {} action(s): {}", removed.len(), maps.join(", "));
        Ok(RepairOutcome::applied(
            RepairKind::Rollback,
            message,
            updated,
            ledger,
        ))
    }

    /// Replace the ledger with a single system pick of `map_id` and complete.
    pub async fn force_complete(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
        map_id: &str,
    ) -> Result<RepairOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        if !session.order.contains_map(map_id) {
            return Err(DomainError::validation(
                ValidationKind::UnknownMap,
                format!("Map '{map_id}' is not in this veto's pool"),
            )
            .into());
        }

        let removed = actions::clear(txn, session_id).await?;
        let now = OffsetDateTime::now_utc();
        let pick = actions::append(txn, session_id, 1, NewAction::system_pick(map_id), now).await?;
        let change = SessionChange::of(&session)
            .status(VetoStatus::Completed)
            .current_turn(None)
            .completed_at(now);
        let updated = sessions::apply_change(txn, change).await?;

        warn!(
            session_id,
            map_id,
            removed_actions = removed,
            "Veto session force-completed"
        );
        Ok(RepairOutcome::applied(
            RepairKind::ForceComplete,
            format!("Session completed on '{map_id}'"),
            updated,
            vec![pick],
        ))
    }

    /// Recompute whose turn it is from the ledger; writes only on mismatch.
    pub async fn fix_turn_sync(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
    ) -> Result<RepairOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        let ledger = actions::list_for_session(txn, session_id).await?;
        let expected = expected_turn(
            session.status,
            &session.order,
            user_action_count(&ledger),
            session.home_team_id,
            session.away_team_id,
        );

        if expected == session.current_turn_team_id {
            info!(session_id, "Turn already in sync");
            return Ok(RepairOutcome {
                repair: RepairKind::TurnSync,
                changed: false,
                message: "No issue found".to_string(),
                session,
                actions: ledger,
                events: Vec::new(),
            });
        }

        let previous = session.current_turn_team_id;
        let updated =
            sessions::apply_change(txn, SessionChange::of(&session).current_turn(expected)).await?;
        warn!(
            session_id,
            ?previous,
            ?expected,
            "Current turn resynchronized"
        );
        Ok(RepairOutcome::applied(
            RepairKind::TurnSync,
            format!(
                "Current turn changed from {} to {}",
                describe_team(previous),
                describe_team(expected)
            ),
            updated,
            ledger,
        ))
    }
}

fn describe_team(team: Option<i64>) -> String {
    team.map_or_else(|| "none".to_string(), |t| format!("team {t}"))
}
