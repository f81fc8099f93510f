#![allow(dead_code)]

pub mod app_builder;
pub mod veto_ops;

pub use app_builder::create_test_app;
pub use fixtures::{test_env, TestEnv};
