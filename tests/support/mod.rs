//! Shared utilities for the behavioural tests.

pub mod github_api;
pub mod harness;
