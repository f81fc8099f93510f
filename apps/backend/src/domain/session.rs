//! Domain models for a veto session and its ledger.

use serde::Serialize;
use time::OffsetDateTime;

use super::types::{ActionKind, Side, VetoStatus};
use super::veto_order::VetoOrder;

/// Veto session domain model.
///
/// Converted from the database row by the session repository; holds
/// everything the sequencer, engine and diagnostics need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VetoSession {
    pub id: i64,
    pub match_id: i64,
    pub status: VetoStatus,
    pub order: VetoOrder,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub current_turn_team_id: Option<i64>,
    pub roll_seed: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub roll_timestamp: Option<OffsetDateTime>,
    pub roll_initiator_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

impl VetoSession {
    /// Home and away team ids, once both are assigned.
    pub fn teams(&self) -> Option<(i64, i64)> {
        Some((self.home_team_id?, self.away_team_id?))
    }

    /// True when all three roll fields are present.
    pub fn has_complete_roll(&self) -> bool {
        self.roll_seed.is_some()
            && self.roll_timestamp.is_some()
            && self.roll_initiator_id.is_some()
    }
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VetoAction {
    pub id: i64,
    pub session_id: i64,
    pub order_number: u16,
    pub action: ActionKind,
    pub map_id: String,
    pub team_id: Option<i64>,
    pub performed_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub performed_at: OffsetDateTime,
    pub side: Option<Side>,
}

impl VetoAction {
    /// System actions (auto-pick, forced completion) carry no team.
    pub fn is_system(&self) -> bool {
        self.team_id.is_none()
    }
}

/// Number of ledger entries made by a team rather than the system.
pub fn user_action_count(actions: &[VetoAction]) -> usize {
    actions.iter().filter(|a| !a.is_system()).count()
}

/// Maps from the pool not yet banned or picked, in pool order.
pub fn remaining_maps<'a>(order: &'a VetoOrder, actions: &[VetoAction]) -> Vec<&'a str> {
    order
        .map_pool()
        .iter()
        .filter(|m| !actions.iter().any(|a| &a.map_id == *m))
        .map(String::as_str)
        .collect()
}
