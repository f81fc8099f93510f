//! Veto protocol service: bootstraps sessions and applies player moves on top
//! of the session store and the action ledger.
//!
//! Every method runs inside the caller's transaction and returns the events
//! the transition produced; the caller publishes them after commit.

mod bootstrap;
mod player_actions;
mod view;

use crate::directory::Directory;
use crate::domain::session::{VetoAction, VetoSession};
use crate::domain::types::VetoStatus;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::realtime::VetoEvent;

pub use view::VetoView;

#[derive(Clone, Debug)]
pub struct VetoService {
    directory: Directory,
}

/// State after a mutation plus the events it produced, in order.
#[derive(Debug, Clone)]
pub struct VetoOutcome {
    pub session: VetoSession,
    pub actions: Vec<VetoAction>,
    pub events: Vec<VetoEvent>,
}

impl VetoOutcome {
    pub fn view(&self) -> VetoView {
        VetoView::new(self.session.clone(), self.actions.clone())
    }
}

fn wrong_phase(expected: VetoStatus, actual: VetoStatus) -> DomainError {
    DomainError::validation(
        ValidationKind::WrongPhase,
        format!("Session is {actual}, this move needs {expected}"),
    )
}

impl VetoService {
    pub fn new(directory: Directory) -> Self {
        Self { directory }
    }

    /// Team of `user_id`, which must be one of `teams`.
    async fn participant_team(
        &self,
        user_id: i64,
        teams: (i64, i64),
    ) -> Result<i64, DomainError> {
        match self.directory.teams.team_of(user_id).await? {
            Some(team) if team == teams.0 || team == teams.1 => Ok(team),
            _ => Err(DomainError::validation(
                ValidationKind::NotAParticipant,
                format!("User {user_id} is not on either team of this match"),
            )),
        }
    }
}
