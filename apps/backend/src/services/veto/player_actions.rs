use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{wrong_phase, VetoOutcome, VetoService};
use crate::domain::session::{remaining_maps, user_action_count, VetoAction};
use crate::domain::turn_sequencer::{expected_action, expected_turn};
use crate::domain::types::{ActionKind, Side, VetoStatus};
use crate::domain::veto_order::VetoOrder;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::realtime::VetoEvent;
use crate::repos::actions::NewAction;
use crate::repos::sessions::SessionChange;
use crate::repos::{actions, sessions};

fn recorded(action: &VetoAction, version: i32) -> VetoEvent {
    VetoEvent::ActionRecorded {
        session_id: action.session_id,
        order_number: action.order_number,
        action: action.action,
        map_id: action.map_id.clone(),
        team_id: action.team_id,
        version,
    }
}

impl VetoService {
    /// Ban or pick `map_id` for the acting user's team.
    ///
    /// The append and the session update commit together or not at all: the
    /// session write is guarded by the version and the turn that were read.
    pub async fn apply_action(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
        user_id: i64,
        map_id: &str,
    ) -> Result<VetoOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        let team = self.directory.teams.team_of(user_id).await?;

        if session.status != VetoStatus::Banning {
            return Err(wrong_phase(VetoStatus::Banning, session.status).into());
        }
        let (home, away) = session.teams().ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Session {session_id} is banning without home/away teams"),
            )
        })?;
        let team = match team {
            Some(team) if team == home || team == away => team,
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::NotAParticipant,
                    format!("User {user_id} is not on either team of this veto"),
                )
                .into())
            }
        };
        if session.current_turn_team_id != Some(team) {
            return Err(DomainError::validation(
                ValidationKind::NotYourTurn,
                format!("It is not team {team}'s turn"),
            )
            .into());
        }
        if !session.order.contains_map(map_id) {
            return Err(DomainError::validation(
                ValidationKind::UnknownMap,
                format!("Map '{map_id}' is not in this veto's pool"),
            )
            .into());
        }

        let mut ledger = actions::list_for_session(txn, session_id).await?;
        if ledger.iter().any(|a| a.map_id == map_id) {
            return Err(DomainError::validation(
                ValidationKind::MapAlreadyActioned,
                format!("Map '{map_id}' was already banned or picked"),
            )
            .into());
        }

        let kind = expected_action(&session.order, ledger.len());
        let now = OffsetDateTime::now_utc();
        let action = actions::append(
            txn,
            session_id,
            ledger.len() + 1,
            NewAction::by_team(kind, map_id, team, user_id),
            now,
        )
        .await?;
        debug!(
            session_id,
            order_number = action.order_number,
            action = %kind,
            map_id,
            team_id = team,
            "Veto action appended"
        );
        ledger.push(action);

        let done = user_action_count(&ledger);
        let mut change = SessionChange::of(&session).guard_turn(&session);
        let mut auto_pick = None;

        if done >= session.order.user_actions() {
            match &session.order {
                VetoOrder::Bo1(_) => {
                    let last = remaining_maps(&session.order, &ledger)
                        .first()
                        .map(|m| (*m).to_string());
                    if let Some(last) = last {
                        let pick = actions::append(
                            txn,
                            session_id,
                            ledger.len() + 1,
                            NewAction::system_pick(last),
                            now,
                        )
                        .await?;
                        auto_pick = Some(pick.clone());
                        ledger.push(pick);
                    }
                    change = change
                        .status(VetoStatus::Completed)
                        .current_turn(None)
                        .completed_at(now);
                }
                VetoOrder::Bo3(_) => {
                    change = change
                        .status(VetoStatus::SideChoice)
                        .current_turn(Some(home));
                }
            }
        } else {
            let next = expected_turn(
                VetoStatus::Banning,
                &session.order,
                done,
                Some(home),
                Some(away),
            );
            change = change.current_turn(next);
        }

        let updated = sessions::apply_change(txn, change).await?;

        let mut events: Vec<VetoEvent> = ledger
            .iter()
            .rev()
            .take(if auto_pick.is_some() { 2 } else { 1 })
            .rev()
            .map(|a| recorded(a, updated.version))
            .collect();
        if updated.status != session.status {
            info!(
                session_id,
                from = %session.status,
                to = %updated.status,
                "Veto phase changed"
            );
            events.push(VetoEvent::PhaseChanged {
                session_id,
                status: updated.status,
                current_turn_team_id: updated.current_turn_team_id,
                version: updated.version,
            });
        }
        if let Some(pick) = &auto_pick {
            info!(session_id, map_id = %pick.map_id, "Deciding map picked by the system");
        }

        Ok(VetoOutcome {
            session: updated,
            actions: ledger,
            events,
        })
    }

    /// Home team chooses its starting side on the deciding map.
    pub async fn choose_side(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
        user_id: i64,
        side: Side,
    ) -> Result<VetoOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;

        if session.status != VetoStatus::SideChoice {
            return Err(wrong_phase(VetoStatus::SideChoice, session.status).into());
        }
        let (home, away) = session.teams().ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Session {session_id} is in side choice without home/away teams"),
            )
        })?;
        let team = self.participant_team(user_id, (home, away)).await?;
        if team != home {
            return Err(DomainError::validation(
                ValidationKind::NotHomeTeam,
                "Only the home team chooses the starting side",
            )
            .into());
        }

        let mut ledger = actions::list_for_session(txn, session_id).await?;
        let deciding = ledger
            .iter_mut()
            .rev()
            .find(|a| a.action == ActionKind::Pick)
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Session {session_id} has no pick to attach a side to"),
                )
            })?;
        actions::record_side(txn, deciding.id, side).await?;
        deciding.side = Some(side);

        let now = OffsetDateTime::now_utc();
        let change = SessionChange::of(&session)
            .guard_turn(&session)
            .status(VetoStatus::Completed)
            .current_turn(None)
            .completed_at(now);
        let updated = sessions::apply_change(txn, change).await?;

        info!(session_id, team_id = team, ?side, "Starting side chosen, veto completed");

        let events = vec![
            VetoEvent::SideChosen {
                session_id,
                side,
                version: updated.version,
            },
            VetoEvent::PhaseChanged {
                session_id,
                status: updated.status,
                current_turn_team_id: updated.current_turn_team_id,
                version: updated.version,
            },
        ];
        Ok(VetoOutcome {
            session: updated,
            actions: ledger,
            events,
        })
    }
}
