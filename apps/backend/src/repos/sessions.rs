//! Veto session repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::sessions_sea as sessions_adapter;
use crate::domain::session::VetoSession;
use crate::domain::types::VetoStatus;
use crate::domain::veto_order::VetoOrder;
use crate::entities::veto_sessions::{self, SessionStatus};
use crate::errors::domain::DomainError;

impl From<VetoStatus> for SessionStatus {
    fn from(status: VetoStatus) -> Self {
        match status {
            VetoStatus::Pending => SessionStatus::Pending,
            VetoStatus::Banning => SessionStatus::Banning,
            VetoStatus::SideChoice => SessionStatus::SideChoice,
            VetoStatus::Completed => SessionStatus::Completed,
        }
    }
}

impl From<SessionStatus> for VetoStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Pending => VetoStatus::Pending,
            SessionStatus::Banning => VetoStatus::Banning,
            SessionStatus::SideChoice => VetoStatus::SideChoice,
            SessionStatus::Completed => VetoStatus::Completed,
        }
    }
}

impl TryFrom<veto_sessions::Model> for VetoSession {
    type Error = DomainError;

    fn try_from(row: veto_sessions::Model) -> Result<Self, Self::Error> {
        Ok(VetoSession {
            id: row.id,
            match_id: row.match_id,
            status: row.status.into(),
            order: VetoOrder::from_json(&row.veto_order)?,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            current_turn_team_id: row.current_turn_team_id,
            roll_seed: row.roll_seed,
            roll_timestamp: row.roll_timestamp,
            roll_initiator_id: row.roll_initiator_id,
            started_at: row.started_at,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}

/// Field changes for one conditional write, expressed in domain types.
///
/// Mirrors `sessions_sea::SessionUpdate`; every write is guarded by the
/// version the caller read.
#[derive(Debug, Clone)]
pub struct SessionChange {
    inner: sessions_adapter::SessionUpdate,
}

impl SessionChange {
    /// Start a change against `session` as it was read.
    pub fn of(session: &VetoSession) -> Self {
        Self {
            inner: sessions_adapter::SessionUpdate::new(session.id, session.version),
        }
    }

    /// Additionally require the current turn to still be what was read.
    pub fn guard_turn(mut self, session: &VetoSession) -> Self {
        self.inner = self.inner.expect_turn(session.current_turn_team_id);
        self
    }

    pub fn status(mut self, status: VetoStatus) -> Self {
        self.inner = self.inner.with_status(status.into());
        self
    }

    pub fn teams(mut self, home: i64, away: i64) -> Self {
        self.inner = self.inner.with_teams(home, away);
        self
    }

    pub fn current_turn(mut self, team_id: Option<i64>) -> Self {
        self.inner = self.inner.with_current_turn(team_id);
        self
    }

    pub fn roll(mut self, seed: i64, at: OffsetDateTime, initiator: i64) -> Self {
        self.inner = self.inner.with_roll(seed, at, initiator);
        self
    }

    pub fn started_at(mut self, at: OffsetDateTime) -> Self {
        self.inner = self.inner.with_started_at(at);
        self
    }

    pub fn completed_at(mut self, at: OffsetDateTime) -> Self {
        self.inner = self.inner.with_completed_at(at);
        self
    }

    pub fn clear_completed_at(mut self) -> Self {
        self.inner = self.inner.clear_completed_at();
        self
    }

    /// Back to a freshly bootstrapped state: no teams, no roll, no timestamps.
    pub fn back_to_pending(mut self) -> Self {
        self.inner = self
            .inner
            .with_status(SessionStatus::Pending)
            .clear_teams()
            .with_current_turn(None)
            .clear_roll()
            .clear_started_at()
            .clear_completed_at();
        self
    }
}

/// Find a session or fail with `SESSION_NOT_FOUND`.
pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<VetoSession, DomainError> {
    let row = sessions_adapter::require_session(conn, session_id).await?;
    VetoSession::try_from(row)
}

pub async fn find_by_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<VetoSession>, DomainError> {
    sessions_adapter::find_by_match_id(conn, match_id)
        .await?
        .map(VetoSession::try_from)
        .transpose()
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<VetoSession>, DomainError> {
    sessions_adapter::list_active(conn)
        .await?
        .into_iter()
        .map(VetoSession::try_from)
        .collect()
}

pub async fn create_session(
    txn: &DatabaseTransaction,
    match_id: i64,
    order: &VetoOrder,
) -> Result<VetoSession, DomainError> {
    let dto = sessions_adapter::SessionCreate::new(match_id, order.to_json()?);
    let row = sessions_adapter::create_session(txn, dto).await?;
    VetoSession::try_from(row)
}

/// Apply a guarded change; `OPTIMISTIC_LOCK` if the row moved on since it was read.
pub async fn apply_change(
    txn: &DatabaseTransaction,
    change: SessionChange,
) -> Result<VetoSession, DomainError> {
    let row = sessions_adapter::update_session(txn, change.inner).await?;
    VetoSession::try_from(row)
}
