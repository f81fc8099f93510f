//! Property tests for turn sequencing and health scanning (pure domain, no DB).
//!
//! Properties tested:
//! - The plan has one entry per team action and only names home or away
//! - Best-of-three strictly alternates starting with home
//! - A ledger built by following the plan always scans healthy
//! - Dice assignment is a deterministic permutation of the two teams

use proptest::prelude::*;
use time::macros::datetime;
use time::Duration;

use crate::domain::diagnostics::Diagnostics;
use crate::domain::dice::assign_home_away;
use crate::domain::session::{VetoAction, VetoSession};
use crate::domain::test_gens;
use crate::domain::turn_sequencer::{acting_team, expected_turn, plan};
use crate::domain::types::{ActionKind, Seat, VetoStatus};
use crate::domain::veto_order::VetoOrder;

fn banning_session(order: VetoOrder, home: i64, away: i64) -> VetoSession {
    let t0 = datetime!(2026-03-01 18:00 UTC);
    VetoSession {
        id: 1,
        match_id: 1,
        status: VetoStatus::Banning,
        order,
        home_team_id: Some(home),
        away_team_id: Some(away),
        current_turn_team_id: Some(home),
        roll_seed: Some(1),
        roll_timestamp: Some(t0),
        roll_initiator_id: Some(1),
        started_at: Some(t0),
        completed_at: None,
        created_at: t0,
        updated_at: t0,
        version: 1,
    }
}

proptest! {
    #![proptest_config(test_gens::proptest_config())]

    #[test]
    fn prop_plan_matches_user_action_count(order in test_gens::veto_order()) {
        let steps = plan(&order);
        prop_assert_eq!(steps.len(), order.user_actions());
        prop_assert!(steps.len() <= order.total_actions());
    }

    #[test]
    fn prop_bo3_alternates_from_home(order in test_gens::veto_order()) {
        prop_assume!(order.has_side_choice());
        for (i, (_, seat)) in plan(&order).into_iter().enumerate() {
            let expected = if i % 2 == 0 { Seat::Home } else { Seat::Away };
            prop_assert_eq!(seat, expected);
        }
    }

    #[test]
    fn prop_banning_turn_is_always_a_participant(
        order in test_gens::veto_order(),
        (home, away) in test_gens::team_pair(),
        done in 0usize..16,
    ) {
        match expected_turn(VetoStatus::Banning, &order, done, Some(home), Some(away)) {
            Some(team) => {
                prop_assert!(team == home || team == away);
                prop_assert!(done < order.user_actions());
            }
            None => prop_assert!(done >= order.user_actions()),
        }
    }

    #[test]
    fn prop_following_the_plan_scans_healthy(
        order in test_gens::veto_order(),
        (home, away) in test_gens::team_pair(),
        steps_taken in 0usize..12,
    ) {
        let steps = plan(&order);
        let steps_taken = steps_taken.min(steps.len().saturating_sub(1));
        let mut session = banning_session(order.clone(), home, away);

        let actions: Vec<VetoAction> = steps
            .iter()
            .take(steps_taken)
            .enumerate()
            .map(|(i, (kind, _))| VetoAction {
                id: i as i64 + 1,
                session_id: 1,
                order_number: (i + 1) as u16,
                action: *kind,
                map_id: order.map_pool()[i].clone(),
                team_id: Some(acting_team(&order, i, home, away)),
                performed_by: Some(1),
                performed_at: session.created_at + Duration::seconds(i as i64),
                side: None,
            })
            .collect();
        session.current_turn_team_id = Some(acting_team(&order, steps_taken, home, away));

        let now = session.created_at + Duration::minutes(5);
        let report = Diagnostics::default().scan(&session, &actions, now);
        prop_assert!(report.is_healthy(), "issues: {:?}", report.issues);
        prop_assert!(!report.is_stuck);
        prop_assert!(actions
            .iter()
            .all(|a| a.action == ActionKind::Ban || order.has_side_choice()));
    }

    #[test]
    fn prop_dice_is_deterministic_permutation(
        seed in any::<i64>(),
        (t1, t2) in test_gens::team_pair(),
    ) {
        let (home, away) = assign_home_away(seed, t1, t2);
        prop_assert_eq!((home, away), assign_home_away(seed, t1, t2));
        prop_assert!((home, away) == (t1, t2) || (home, away) == (t2, t1));
    }
}
