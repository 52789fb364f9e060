//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Defaults and settings derived from merged layers
//! - `field_resolution`: Token, repository URL, command and wait resolution

mod helpers;
