use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{wrong_phase, VetoOutcome, VetoService};
use crate::domain::dice::{assign_home_away, generate_seed};
use crate::domain::turn_sequencer::expected_turn;
use crate::domain::types::{BestOf, VetoStatus};
use crate::domain::veto_order::VetoOrder;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::realtime::VetoEvent;
use crate::repos::sessions::SessionChange;
use crate::repos::{actions, sessions};

impl VetoService {
    /// Create the veto session for a match that became ready.
    ///
    /// Idempotent: when the match already has a session it is returned as-is
    /// and the flag is `false`. The format and map pool are read once here and
    /// frozen into the session's veto order.
    pub async fn create_session(
        &self,
        txn: &DatabaseTransaction,
        match_id: i64,
    ) -> Result<(VetoOutcome, bool), AppError> {
        if let Some(session) = sessions::find_by_match(txn, match_id).await? {
            debug!(match_id, session_id = session.id, "Veto session already exists");
            let actions = actions::list_for_session(txn, session.id).await?;
            return Ok((
                VetoOutcome {
                    session,
                    actions,
                    events: Vec::new(),
                },
                false,
            ));
        }

        let info = self
            .directory
            .matches
            .find_match(match_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Match, format!("Match {match_id} not found"))
            })?;
        let best_of = BestOf::try_from(info.best_of)?;

        let pool = self
            .directory
            .map_pools
            .map_pool(info.tournament_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::MapPool,
                    format!("Tournament {} has no map pool", info.tournament_id),
                )
            })?;
        let order = VetoOrder::new(best_of, pool)?;

        let session = sessions::create_session(txn, match_id, &order).await?;
        info!(
            match_id,
            session_id = session.id,
            best_of = best_of.games(),
            pool_size = order.map_pool().len(),
            "Veto session created"
        );

        let events = vec![VetoEvent::SessionCreated {
            session_id: session.id,
            match_id,
        }];
        Ok((
            VetoOutcome {
                session,
                actions: Vec::new(),
                events,
            },
            true,
        ))
    }

    /// Roll the dice: fix home/away and open the banning phase.
    pub async fn roll(
        &self,
        txn: &DatabaseTransaction,
        session_id: i64,
        user_id: i64,
    ) -> Result<VetoOutcome, AppError> {
        let session = sessions::require_session(txn, session_id).await?;

        if session.home_team_id.is_some() {
            return Err(DomainError::validation(
                ValidationKind::AlreadyRolled,
                "Home and away are already assigned for this session",
            )
            .into());
        }
        if session.status != VetoStatus::Pending {
            return Err(wrong_phase(VetoStatus::Pending, session.status).into());
        }

        let info = self
            .directory
            .matches
            .find_match(session.match_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Match,
                    format!("Match {} not found", session.match_id),
                )
            })?;
        self.participant_team(user_id, (info.team1_id, info.team2_id))
            .await?;

        let seed = generate_seed();
        let (home, away) = assign_home_away(seed, info.team1_id, info.team2_id);
        let first_turn = expected_turn(
            VetoStatus::Banning,
            &session.order,
            0,
            Some(home),
            Some(away),
        );
        let now = OffsetDateTime::now_utc();

        let change = SessionChange::of(&session)
            .status(VetoStatus::Banning)
            .teams(home, away)
            .current_turn(first_turn)
            .roll(seed, now, user_id)
            .started_at(now);
        let updated = sessions::apply_change(txn, change).await?;

        info!(
            session_id,
            home_team_id = home,
            away_team_id = away,
            initiator = user_id,
            "Dice rolled"
        );

        let events = vec![
            VetoEvent::DiceRolled {
                session_id,
                home_team_id: home,
                away_team_id: away,
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
            actions: Vec::new(),
            events,
        })
    }
}
