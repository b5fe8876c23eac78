//! Shared test fixtures for teamforge crates.
//!
//! This crate provides data and configuration fixtures for testing.
//! It does NOT depend on `teamforge-scoring` or later crates to avoid
//! circular dependencies.
//!
//! - [`candidates`] - Hand-checked enriched candidates and synthetic rosters
//! - [`config`] - Configuration documents with a sample evaluation model
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! teamforge-test = { workspace = true }
//! ```

pub mod candidates;
pub mod config;

pub use candidates::{butterfree, charmander, ivysaur, synthetic_roster, trio_roster};
pub use config::{test_configuration, TEST_EVALUATION};
