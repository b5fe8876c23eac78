//! Weighted team scoring for teamforge.
//!
//! This crate provides:
//! - Scoring features and their aggregation over a team ([`Feature`], [`AttackFeature`])
//! - Evaluation models: configured weights plus an optional combat-power cap ([`EvaluationModel`])
//! - Score breakdowns for a single team ([`Explanation`])
//! - Scored teams as produced in the inner loop and as persisted ([`ScoredTeam`], [`RankedTeam`])
//! - The bounded best-K ranking used by both evaluation and reduction ([`BestK`])
//!
//! # Architecture
//!
//! Models are immutable after construction and hold no interior state, so a
//! single `&EvaluationModel` is shared by every worker evaluating that model.

pub mod best_k;
pub mod error;
pub mod feature;
pub mod model;
pub mod scored;

pub use best_k::{BestK, Ranked};
pub use error::ScoringError;
pub use feature::{AttackFeature, Feature};
pub use model::{EvaluationModel, Explanation, FeatureContribution};
pub use scored::{RankedTeam, ScoredTeam};
