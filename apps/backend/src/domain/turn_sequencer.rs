//! Turn sequencing: which action comes next and which team takes it.
//!
//! Everything here is a pure function of the veto order and the number of
//! actions already in the ledger. The protocol engine, the health scanner and
//! the turn-sync repair all go through [`expected_turn`] so they cannot drift
//! apart.

use super::types::{ActionKind, Seat, VetoStatus};
use super::veto_order::{VetoOrder, BO1_TURN_TABLE, BO3_SEQUENCE};

/// Action type required at `action_index` (0-based ledger position).
///
/// Best-of-one bans until a single map remains; that last map is picked by
/// the system. Best-of-three indices past the fixed sequence fall back to
/// `Ban`.
pub fn expected_action(order: &VetoOrder, action_index: usize) -> ActionKind {
    match order {
        VetoOrder::Bo1(_) => {
            if action_index + 1 < order.total_actions() {
                ActionKind::Ban
            } else {
                ActionKind::Pick
            }
        }
        VetoOrder::Bo3(_) => BO3_SEQUENCE
            .get(action_index)
            .copied()
            .unwrap_or(ActionKind::Ban),
    }
}

/// Seat due to act at `action_index`.
///
/// Best-of-one follows [`BO1_TURN_TABLE`]; larger pools continue by
/// alternating from the table's last entry. Best-of-three alternates starting
/// with home.
pub fn acting_seat(order: &VetoOrder, action_index: usize) -> Seat {
    match order {
        VetoOrder::Bo1(_) => match BO1_TURN_TABLE.get(action_index) {
            Some(seat) => *seat,
            None => {
                let past = action_index - BO1_TURN_TABLE.len();
                let last = BO1_TURN_TABLE[BO1_TURN_TABLE.len() - 1];
                if past % 2 == 0 {
                    last.other()
                } else {
                    last
                }
            }
        },
        VetoOrder::Bo3(_) => {
            if action_index % 2 == 0 {
                Seat::Home
            } else {
                Seat::Away
            }
        }
    }
}

pub fn acting_team(order: &VetoOrder, action_index: usize, home: i64, away: i64) -> i64 {
    acting_seat(order, action_index).team(home, away)
}

/// The `current_turn_team_id` a consistent session must hold.
///
/// `user_action_count` counts team actions only; system picks never take a
/// turn. Returns `None` where no team is due (pending, completed, or teams
/// not yet assigned).
pub fn expected_turn(
    status: VetoStatus,
    order: &VetoOrder,
    user_action_count: usize,
    home: Option<i64>,
    away: Option<i64>,
) -> Option<i64> {
    let (home, away) = (home?, away?);
    match status {
        VetoStatus::Banning => {
            if user_action_count >= order.user_actions() {
                None
            } else {
                Some(acting_team(order, user_action_count, home, away))
            }
        }
        VetoStatus::SideChoice => Some(home),
        VetoStatus::Pending | VetoStatus::Completed => None,
    }
}

/// Full turn plan for a session: `(expected action, acting seat)` for every
/// team action, in order.
pub fn plan(order: &VetoOrder) -> Vec<(ActionKind, Seat)> {
    (0..order.user_actions())
        .map(|i| (expected_action(order, i), acting_seat(order, i)))
        .collect()
}
