pub mod actions_sea;
pub mod sessions_sea;
