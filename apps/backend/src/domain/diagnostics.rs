//! Read-only consistency scanner for veto sessions.
//!
//! `scan` is a pure function of the session, its ledger and the clock value it
//! is handed: it never mutates and gives the same report for the same inputs.
//! Every check is independent, so one broken field never hides another.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::session::{user_action_count, VetoAction, VetoSession};
use super::turn_sequencer::expected_turn;
use super::types::VetoStatus;

/// Idle time after which a `banning` session is reported stale.
pub const DEFAULT_STALE_AFTER: Duration = Duration::hours(24);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthIssue {
    /// Past `pending` but home or away is unset.
    MissingTeamAssignment,
    SameTeamBothSides { team_id: i64 },
    /// `banning` with no activity for longer than the stale window.
    Stale { idle_minutes: i64 },
    /// Past `pending` without a complete seed/timestamp/initiator triple.
    IncompleteRollData,
    TurnDesync {
        expected: Option<i64>,
        actual: Option<i64>,
    },
    DuplicateMap { map_id: String, occurrences: usize },
    ActionCountExceeded { count: usize, expected: usize },
    /// Order numbers are not `1..=n` without holes or repeats.
    OrderNumberGap { position: usize, found: u16 },
    UnknownMap { map_id: String },
}

impl fmt::Display for HealthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthIssue::MissingTeamAssignment => {
                write!(f, "session left pending but home/away teams are not assigned")
            }
            HealthIssue::SameTeamBothSides { team_id } => {
                write!(f, "team {team_id} is assigned as both home and away")
            }
            HealthIssue::Stale { idle_minutes } => {
                write!(f, "no veto activity for {idle_minutes} minutes")
            }
            HealthIssue::IncompleteRollData => write!(f, "dice roll data is incomplete"),
            HealthIssue::TurnDesync { expected, actual } => write!(
                f,
                "current turn is {} but the ledger says {}",
                fmt_team(*actual),
                fmt_team(*expected)
            ),
            HealthIssue::DuplicateMap {
                map_id,
                occurrences,
            } => write!(f, "map {map_id} appears {occurrences} times in the ledger"),
            HealthIssue::ActionCountExceeded { count, expected } => {
                write!(f, "{count} actions recorded, at most {expected} expected")
            }
            HealthIssue::OrderNumberGap { position, found } => write!(
                f,
                "action at position {position} has order number {found}, expected {}",
                position
            ),
            HealthIssue::UnknownMap { map_id } => {
                write!(f, "map {map_id} is not in the session's pool")
            }
        }
    }
}

fn fmt_team(team: Option<i64>) -> String {
    match team {
        Some(id) => format!("team {id}"),
        None => "nobody".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub session_id: i64,
    pub match_id: i64,
    pub status: VetoStatus,
    pub issues: Vec<HealthIssue>,
    pub is_stuck: bool,
    pub action_count: usize,
    pub expected_action_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    pub stale_after: Duration,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

impl Diagnostics {
    pub fn new(stale_after: Duration) -> Self {
        Self { stale_after }
    }

    pub fn scan(
        &self,
        session: &VetoSession,
        actions: &[VetoAction],
        now: OffsetDateTime,
    ) -> HealthReport {
        let mut issues = Vec::new();
        let status = session.status;
        let last_activity = last_activity(session, actions);

        if status != VetoStatus::Pending
            && (session.home_team_id.is_none() || session.away_team_id.is_none())
        {
            issues.push(HealthIssue::MissingTeamAssignment);
        }

        if let Some((home, away)) = session.teams() {
            if home == away {
                issues.push(HealthIssue::SameTeamBothSides { team_id: home });
            }
        }

        if status == VetoStatus::Banning {
            let idle = now - last_activity;
            if idle > self.stale_after {
                issues.push(HealthIssue::Stale {
                    idle_minutes: idle.whole_minutes(),
                });
            }
        }

        if matches!(status, VetoStatus::Banning | VetoStatus::SideChoice)
            && !session.has_complete_roll()
        {
            issues.push(HealthIssue::IncompleteRollData);
        }

        let expected = expected_turn(
            status,
            &session.order,
            user_action_count(actions),
            session.home_team_id,
            session.away_team_id,
        );
        if expected != session.current_turn_team_id {
            issues.push(HealthIssue::TurnDesync {
                expected,
                actual: session.current_turn_team_id,
            });
        }

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for action in actions {
            *seen.entry(action.map_id.as_str()).or_default() += 1;
        }
        for (map_id, occurrences) in &seen {
            if *occurrences > 1 {
                issues.push(HealthIssue::DuplicateMap {
                    map_id: (*map_id).to_string(),
                    occurrences: *occurrences,
                });
            }
        }

        let expected_action_count = session.order.total_actions();
        if actions.len() > expected_action_count {
            issues.push(HealthIssue::ActionCountExceeded {
                count: actions.len(),
                expected: expected_action_count,
            });
        }

        let mut order_numbers: Vec<u16> = actions.iter().map(|a| a.order_number).collect();
        order_numbers.sort_unstable();
        if let Some((idx, found)) = order_numbers
            .iter()
            .enumerate()
            .find(|(idx, n)| usize::from(**n) != idx + 1)
        {
            issues.push(HealthIssue::OrderNumberGap {
                position: idx + 1,
                found: *found,
            });
        }

        for map_id in seen.keys() {
            if !session.order.contains_map(map_id) {
                issues.push(HealthIssue::UnknownMap {
                    map_id: (*map_id).to_string(),
                });
            }
        }

        let is_stuck = !issues.is_empty() && status == VetoStatus::Banning;

        HealthReport {
            session_id: session.id,
            match_id: session.match_id,
            status,
            issues,
            is_stuck,
            action_count: actions.len(),
            expected_action_count,
            last_activity,
        }
    }
}

/// Most recent of: any action, the roll, the start, the creation.
pub fn last_activity(session: &VetoSession, actions: &[VetoAction]) -> OffsetDateTime {
    actions
        .iter()
        .map(|a| a.performed_at)
        .chain(session.roll_timestamp)
        .chain(session.started_at)
        .fold(session.created_at, OffsetDateTime::max)
}
