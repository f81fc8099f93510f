pub mod veto;
pub mod veto_health;
pub mod veto_repair;
