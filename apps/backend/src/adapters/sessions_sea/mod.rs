//! SeaORM adapter for veto sessions - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::veto_sessions::{self, SessionStatus};
use crate::infra::db_errors::{OPTIMISTIC_LOCK_PREFIX, SESSION_NOT_FOUND_PREFIX};

pub mod dto;

pub use dto::{SessionCreate, SessionUpdate};

// Adapter functions return DbErr; repos map to DomainError via From<DbErr>.

fn session_not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{SESSION_NOT_FOUND_PREFIX}{id}"))
}

/// Apply a conditional update guarded by `version` (and optionally the current
/// turn), bump `version` and `updated_at`, then refetch.
///
/// Zero rows affected means either the row is gone (`SESSION_NOT_FOUND`) or it
/// moved on since it was read (`OPTIMISTIC_LOCK` with both versions).
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_version: i32,
    expected_turn: Option<Option<i64>>,
    configure_update: F,
) -> Result<veto_sessions::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(
        sea_orm::UpdateMany<veto_sessions::Entity>,
    ) -> sea_orm::UpdateMany<veto_sessions::Entity>,
{
    let now = time::OffsetDateTime::now_utc();

    let mut update = configure_update(veto_sessions::Entity::update_many())
        .col_expr(veto_sessions::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            veto_sessions::Column::Version,
            Expr::col(veto_sessions::Column::Version).add(1),
        )
        .filter(veto_sessions::Column::Id.eq(id))
        .filter(veto_sessions::Column::Version.eq(expected_version));

    update = match expected_turn {
        Some(Some(team_id)) => update.filter(veto_sessions::Column::CurrentTurnTeamId.eq(team_id)),
        Some(None) => update.filter(veto_sessions::Column::CurrentTurnTeamId.is_null()),
        None => update,
    };

    let result = update.exec(conn).await?;

    if result.rows_affected == 0 {
        return match veto_sessions::Entity::find_by_id(id).one(conn).await? {
            Some(row) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"session_id\":{id},\"expected\":{expected_version},\"actual\":{}}}",
                row.version
            ))),
            None => Err(session_not_found(id)),
        };
    }

    require_session(conn, id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<veto_sessions::Model>, sea_orm::DbErr> {
    veto_sessions::Entity::find_by_id(session_id).one(conn).await
}

/// Find a session by id or fail with a `SESSION_NOT_FOUND:{id}` payload.
pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<veto_sessions::Model, sea_orm::DbErr> {
    find_by_id(conn, session_id)
        .await?
        .ok_or_else(|| session_not_found(session_id))
}

pub async fn find_by_match_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<veto_sessions::Model>, sea_orm::DbErr> {
    veto_sessions::Entity::find()
        .filter(veto_sessions::Column::MatchId.eq(match_id))
        .one(conn)
        .await
}

/// Every session not yet completed, oldest first.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<veto_sessions::Model>, sea_orm::DbErr> {
    veto_sessions::Entity::find()
        .filter(veto_sessions::Column::Status.ne(SessionStatus::Completed))
        .order_by_asc(veto_sessions::Column::Id)
        .all(conn)
        .await
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<veto_sessions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let session = veto_sessions::ActiveModel {
        id: NotSet,
        match_id: Set(dto.match_id),
        status: Set(SessionStatus::Pending),
        veto_order: Set(dto.veto_order),
        home_team_id: Set(None),
        away_team_id: Set(None),
        current_turn_team_id: Set(None),
        roll_seed: Set(None),
        roll_timestamp: Set(None),
        roll_initiator_id: Set(None),
        started_at: Set(None),
        completed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        version: Set(1),
    };

    session.insert(conn).await
}

pub async fn update_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionUpdate,
) -> Result<veto_sessions::Model, sea_orm::DbErr> {
    use veto_sessions::Column;

    let SessionUpdate {
        id,
        expected_version,
        expected_turn,
        status,
        home_team_id,
        away_team_id,
        current_turn_team_id,
        roll_seed,
        roll_timestamp,
        roll_initiator_id,
        started_at,
        completed_at,
    } = dto;

    optimistic_update_then_fetch(conn, id, expected_version, expected_turn, |mut update| {
        if let Some(status) = status {
            update = update.col_expr(Column::Status, Expr::val(status).into());
        }
        for (col, value) in [
            (Column::HomeTeamId, home_team_id),
            (Column::AwayTeamId, away_team_id),
            (Column::CurrentTurnTeamId, current_turn_team_id),
            (Column::RollSeed, roll_seed),
            (Column::RollInitiatorId, roll_initiator_id),
        ] {
            if let Some(v) = value {
                update = update.col_expr(col, Expr::val(v).into());
            }
        }
        for (col, value) in [
            (Column::RollTimestamp, roll_timestamp),
            (Column::StartedAt, started_at),
            (Column::CompletedAt, completed_at),
        ] {
            if let Some(v) = value {
                update = update.col_expr(col, Expr::val(v).into());
            }
        }
        update
    })
    .await
}
