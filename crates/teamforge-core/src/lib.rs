//! teamforge Core - Core types for exhaustive team ranking
//!
//! This crate provides the fundamental abstractions shared by every other
//! teamforge crate:
//! - Tabular values exchanged with table stores ([`Table`], [`Cell`])
//! - Enriched roster rows decoded into typed records ([`Candidate`], [`Roster`])
//! - Three-member teams and their order-insensitive identity ([`Team`], [`TeamKey`])
//! - The data-contract error type and the error taxonomy ([`DataError`], [`ErrorKind`])

pub mod candidate;
pub mod error;
pub mod table;
pub mod team;

pub use candidate::{columns, Candidate, DamageType, Roster};
pub use error::{DataError, ErrorKind};
pub use table::{Cell, Record, RowRef, Table};
pub use team::{Team, TeamKey, TEAM_SIZE};
