//! Repository layer: adapter rows in, domain models out.

pub mod actions;
pub mod sessions;
