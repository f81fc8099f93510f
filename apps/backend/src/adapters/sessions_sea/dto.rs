//! DTOs for the sessions_sea adapter.

use time::OffsetDateTime;

use crate::entities::veto_sessions::SessionStatus;

/// DTO for bootstrapping a session in `pending`.
#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub match_id: i64,
    pub veto_order: String,
}

impl SessionCreate {
    pub fn new(match_id: i64, veto_order: impl Into<String>) -> Self {
        Self {
            match_id,
            veto_order: veto_order.into(),
        }
    }
}

/// Conditional update of a session row.
///
/// Nullable columns are three-state: `None` = no change, `Some(Some(v))` = set,
/// `Some(None)` = clear. The write only lands when the row still carries
/// `expected_version` and, if `expected_turn` is set, that current turn.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub expected_turn: Option<Option<i64>>,
    pub status: Option<SessionStatus>,
    pub home_team_id: Option<Option<i64>>,
    pub away_team_id: Option<Option<i64>>,
    pub current_turn_team_id: Option<Option<i64>>,
    pub roll_seed: Option<Option<i64>>,
    pub roll_timestamp: Option<Option<OffsetDateTime>>,
    pub roll_initiator_id: Option<Option<i64>>,
    pub started_at: Option<Option<OffsetDateTime>>,
    pub completed_at: Option<Option<OffsetDateTime>>,
}

impl SessionUpdate {
    pub fn new(id: i64, expected_version: i32) -> Self {
        Self {
            id,
            expected_version,
            expected_turn: None,
            status: None,
            home_team_id: None,
            away_team_id: None,
            current_turn_team_id: None,
            roll_seed: None,
            roll_timestamp: None,
            roll_initiator_id: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn expect_turn(mut self, team_id: Option<i64>) -> Self {
        self.expected_turn = Some(team_id);
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_teams(mut self, home: i64, away: i64) -> Self {
        self.home_team_id = Some(Some(home));
        self.away_team_id = Some(Some(away));
        self
    }

    pub fn clear_teams(mut self) -> Self {
        self.home_team_id = Some(None);
        self.away_team_id = Some(None);
        self
    }

    pub fn with_current_turn(mut self, team_id: Option<i64>) -> Self {
        self.current_turn_team_id = Some(team_id);
        self
    }

    pub fn with_roll(mut self, seed: i64, at: OffsetDateTime, initiator: i64) -> Self {
        self.roll_seed = Some(Some(seed));
        self.roll_timestamp = Some(Some(at));
        self.roll_initiator_id = Some(Some(initiator));
        self
    }

    pub fn clear_roll(mut self) -> Self {
        self.roll_seed = Some(None);
        self.roll_timestamp = Some(None);
        self.roll_initiator_id = Some(None);
        self
    }

    pub fn with_started_at(mut self, at: OffsetDateTime) -> Self {
        self.started_at = Some(Some(at));
        self
    }

    pub fn clear_started_at(mut self) -> Self {
        self.started_at = Some(None);
        self
    }

    pub fn with_completed_at(mut self, at: OffsetDateTime) -> Self {
        self.completed_at = Some(Some(at));
        self
    }

    pub fn clear_completed_at(mut self) -> Self {
        self.completed_at = Some(None);
        self
    }
}
