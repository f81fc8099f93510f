//! Action ledger repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::actions_sea as actions_adapter;
use crate::domain::session::VetoAction;
use crate::domain::types::{ActionKind, Side};
use crate::entities::veto_actions::{self, ActionType, SideChoice};
use crate::errors::domain::{DomainError, InfraErrorKind};

impl From<ActionKind> for ActionType {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Ban => ActionType::Ban,
            ActionKind::Pick => ActionType::Pick,
        }
    }
}

impl From<ActionType> for ActionKind {
    fn from(kind: ActionType) -> Self {
        match kind {
            ActionType::Ban => ActionKind::Ban,
            ActionType::Pick => ActionKind::Pick,
        }
    }
}

impl From<Side> for SideChoice {
    fn from(side: Side) -> Self {
        match side {
            Side::Attack => SideChoice::Attack,
            Side::Defense => SideChoice::Defense,
        }
    }
}

impl From<SideChoice> for Side {
    fn from(side: SideChoice) -> Self {
        match side {
            SideChoice::Attack => Side::Attack,
            SideChoice::Defense => Side::Defense,
        }
    }
}

impl TryFrom<veto_actions::Model> for VetoAction {
    type Error = DomainError;

    fn try_from(row: veto_actions::Model) -> Result<Self, Self::Error> {
        let order_number = u16::try_from(row.order_number).map_err(|_| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!(
                    "veto action {} has negative order number {}",
                    row.id, row.order_number
                ),
            )
        })?;
        Ok(VetoAction {
            id: row.id,
            session_id: row.session_id,
            order_number,
            action: row.action.into(),
            map_id: row.map_id,
            team_id: row.team_id,
            performed_by: row.performed_by,
            performed_at: row.performed_at,
            side: row.side.map(Side::from),
        })
    }
}

/// One entry to append, in domain terms.
#[derive(Debug, Clone)]
pub struct NewAction {
    pub action: ActionKind,
    pub map_id: String,
    /// `(team_id, user_id)` for team actions, `None` for system actions.
    pub actor: Option<(i64, i64)>,
}

impl NewAction {
    pub fn by_team(
        action: ActionKind,
        map_id: impl Into<String>,
        team_id: i64,
        user_id: i64,
    ) -> Self {
        Self {
            action,
            map_id: map_id.into(),
            actor: Some((team_id, user_id)),
        }
    }

    pub fn system_pick(map_id: impl Into<String>) -> Self {
        Self {
            action: ActionKind::Pick,
            map_id: map_id.into(),
            actor: None,
        }
    }
}

fn to_order_number(order_number: usize) -> Result<i16, DomainError> {
    i16::try_from(order_number).map_err(|_| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("order number {order_number} out of range"),
        )
    })
}

pub async fn list_for_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<VetoAction>, DomainError> {
    actions_adapter::list_by_session(conn, session_id)
        .await?
        .into_iter()
        .map(VetoAction::try_from)
        .collect()
}

/// Append at `order_number` (1-based).
pub async fn append(
    txn: &DatabaseTransaction,
    session_id: i64,
    order_number: usize,
    new: NewAction,
    at: OffsetDateTime,
) -> Result<VetoAction, DomainError> {
    let order_number = to_order_number(order_number)?;
    let dto = match new.actor {
        Some((team_id, user_id)) => actions_adapter::ActionCreate::by_team(
            session_id,
            order_number,
            new.action.into(),
            new.map_id,
            team_id,
            user_id,
            at,
        ),
        None => actions_adapter::ActionCreate::system(
            session_id,
            order_number,
            new.action.into(),
            new.map_id,
            at,
        ),
    };
    let row = actions_adapter::insert_action(txn, dto).await?;
    VetoAction::try_from(row)
}

pub async fn delete(txn: &DatabaseTransaction, action_id: i64) -> Result<(), DomainError> {
    actions_adapter::delete_by_id(txn, action_id).await?;
    Ok(())
}

/// Drop the whole ledger of a session; returns how many entries were removed.
pub async fn clear(txn: &DatabaseTransaction, session_id: i64) -> Result<u64, DomainError> {
    Ok(actions_adapter::delete_by_session(txn, session_id).await?)
}

pub async fn record_side(
    txn: &DatabaseTransaction,
    action_id: i64,
    side: Side,
) -> Result<(), DomainError> {
    actions_adapter::set_side(txn, action_id, side.into()).await?;
    Ok(())
}
