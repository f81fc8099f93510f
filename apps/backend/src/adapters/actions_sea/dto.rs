//! DTOs for actions_sea adapter.

use time::OffsetDateTime;

use crate::entities::veto_actions::ActionType;

/// DTO for appending one ledger entry.
#[derive(Debug, Clone)]
pub struct ActionCreate {
    pub session_id: i64,
    pub order_number: i16,
    pub action: ActionType,
    pub map_id: String,
    pub team_id: Option<i64>,
    pub performed_by: Option<i64>,
    pub performed_at: OffsetDateTime,
}

impl ActionCreate {
    /// A team action taken by `user_id` on behalf of `team_id`.
    pub fn by_team(
        session_id: i64,
        order_number: i16,
        action: ActionType,
        map_id: impl Into<String>,
        team_id: i64,
        user_id: i64,
        performed_at: OffsetDateTime,
    ) -> Self {
        Self {
            session_id,
            order_number,
            action,
            map_id: map_id.into(),
            team_id: Some(team_id),
            performed_by: Some(user_id),
            performed_at,
        }
    }

    /// A system action: no team, no user.
    pub fn system(
        session_id: i64,
        order_number: i16,
        action: ActionType,
        map_id: impl Into<String>,
        performed_at: OffsetDateTime,
    ) -> Self {
        Self {
            session_id,
            order_number,
            action,
            map_id: map_id.into(),
            team_id: None,
            performed_by: None,
            performed_at,
        }
    }
}
