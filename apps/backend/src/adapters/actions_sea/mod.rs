//! SeaORM adapter for the veto action ledger.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::veto_actions::{self, SideChoice};

pub mod dto;

pub use dto::ActionCreate;

/// Ledger of a session ordered by `order_number`.
pub async fn list_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<veto_actions::Model>, sea_orm::DbErr> {
    veto_actions::Entity::find()
        .filter(veto_actions::Column::SessionId.eq(session_id))
        .order_by_asc(veto_actions::Column::OrderNumber)
        .all(conn)
        .await
}

/// Insert one action. The unique indexes on `(session_id, order_number)` and
/// `(session_id, map_id)` reject concurrent or duplicate appends.
pub async fn insert_action<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ActionCreate,
) -> Result<veto_actions::Model, sea_orm::DbErr> {
    let action = veto_actions::ActiveModel {
        id: NotSet,
        session_id: Set(dto.session_id),
        action: Set(dto.action),
        map_id: Set(dto.map_id),
        team_id: Set(dto.team_id),
        order_number: Set(dto.order_number),
        performed_by: Set(dto.performed_by),
        performed_at: Set(dto.performed_at),
        side: Set(None),
    };

    action.insert(conn).await
}

pub async fn delete_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    action_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = veto_actions::Entity::delete_by_id(action_id)
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Remove a session's whole ledger; returns the number of rows deleted.
pub async fn delete_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = veto_actions::Entity::delete_many()
        .filter(veto_actions::Column::SessionId.eq(session_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn set_side<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    action_id: i64,
    side: SideChoice,
) -> Result<(), sea_orm::DbErr> {
    let res = veto_actions::Entity::update_many()
        .col_expr(veto_actions::Column::Side, Expr::val(side).into())
        .filter(veto_actions::Column::Id.eq(action_id))
        .exec(conn)
        .await?;
    if res.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "veto action {action_id} not found"
        )));
    }
    Ok(())
}
