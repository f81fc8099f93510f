//! Backend test support utilities
//!
//! Shared helpers for the backend's integration test binaries. Currently this
//! is the unified logging bootstrap installed via `ctor` in `tests/common`.

pub mod logging;
