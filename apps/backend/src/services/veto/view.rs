use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::VetoService;
use crate::domain::session::{remaining_maps, user_action_count, VetoAction, VetoSession};
use crate::domain::turn_sequencer::expected_action;
use crate::domain::types::{ActionKind, VetoStatus};
use crate::error::AppError;
use crate::repos::{actions, sessions};

/// What a client needs to render a veto: the session, its ledger, the maps
/// still open and the kind of move expected next.
#[derive(Debug, Clone, Serialize)]
pub struct VetoView {
    pub session: VetoSession,
    pub actions: Vec<VetoAction>,
    pub remaining_maps: Vec<String>,
    pub next_action: Option<ActionKind>,
}

impl VetoView {
    pub fn new(session: VetoSession, actions: Vec<VetoAction>) -> Self {
        let remaining_maps = remaining_maps(&session.order, &actions)
            .into_iter()
            .map(str::to_string)
            .collect();
        let next_action = (session.status == VetoStatus::Banning
            && user_action_count(&actions) < session.order.user_actions())
        .then(|| expected_action(&session.order, actions.len()));
        Self {
            session,
            actions,
            remaining_maps,
            next_action,
        }
    }
}

impl VetoService {
    pub async fn load_view<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
    ) -> Result<VetoView, AppError> {
        let session = sessions::require_session(conn, session_id).await?;
        let actions = actions::list_for_session(conn, session_id).await?;
        Ok(VetoView::new(session, actions))
    }
}
