pub mod veto_actions;
pub mod veto_sessions;

pub use veto_actions::Entity as VetoActions;
pub use veto_actions::Model as VetoActionRow;
pub use veto_sessions::Entity as VetoSessions;
pub use veto_sessions::Model as VetoSessionRow;
