//! Domain layer: pure veto protocol types and rules.

pub mod diagnostics;
pub mod dice;
pub mod session;
pub mod turn_sequencer;
pub mod types;
pub mod veto_order;

#[cfg(test)]
mod tests_props_sequencer;

// Re-exports for ergonomics
pub use diagnostics::{Diagnostics, HealthIssue, HealthReport};
pub use session::{remaining_maps, user_action_count, VetoAction, VetoSession};
pub use turn_sequencer::{expected_action, expected_turn};
pub use types::{ActionKind, BestOf, Seat, Side, VetoStatus};
pub use veto_order::VetoOrder;
