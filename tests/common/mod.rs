#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: registries and descriptor construction helpers
//! - `assertions`: assertion helpers with better failure messages

pub mod assertions;
pub mod fixtures;

pub use fixtures::{descriptor, fixture_registry, java_lang_registry, lookup};

pub use assertions::{assert_err, assert_error_contains, assert_malformed, assert_ok};
