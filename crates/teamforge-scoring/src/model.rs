//! Evaluation models.
//!
//! An [`EvaluationModel`] turns a team into a number:
//!
//! ```text
//! score(team) = Σ weight_f × feature_f(team)
//! ```
//!
//! The combat-power cap is kept separate from the weighted sum. Callers that
//! rank teams go through [`ScoredTeam`](crate::ScoredTeam), which zeroes teams
//! breaking the cap; [`EvaluationModel::explain`] always shows the raw sum.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use teamforge_core::{Candidate, Cell, Record, RowRef, Table, Team};

use crate::error::ScoringError;
use crate::feature::{AttackFeature, Feature};

/// Column of the evaluation table holding the model name.
pub const EVALUATION_NAME_COLUMN: &str = "evaluation-name";

/// Column of the evaluation table holding the combat-power cap.
pub const MAX_CP_CONSTRAINT_COLUMN: &str = "max-cp-constraint";

/// A named scoring formula with an optional combat-power cap.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationModel {
    name: String,
    weights: [i64; Feature::COUNT],
    max_combat_power: Option<f64>,
    attack_weights: [i64; AttackFeature::COUNT],
    // non-zero weights in scoring order
    active: Vec<(Feature, f64)>,
}

impl EvaluationModel {
    /// Creates a model with every weight at zero and no constraint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: [0; Feature::COUNT],
            max_combat_power: None,
            attack_weights: [0; AttackFeature::COUNT],
            active: Vec::new(),
        }
    }

    /// Sets the weight of a team feature.
    pub fn with_weight(mut self, feature: Feature, weight: i64) -> Self {
        self.weights[feature.index()] = weight;
        self.active = Feature::ALL
            .into_iter()
            .filter(|f| self.weights[f.index()] != 0)
            .map(|f| (f, self.weights[f.index()] as f64))
            .collect();
        self
    }

    /// Caps the combat power of every team member.
    pub fn with_max_combat_power(mut self, max: f64) -> Self {
        self.max_combat_power = Some(max);
        self
    }

    /// Sets the weight of a per-candidate attack feature.
    pub fn with_attack_weight(mut self, feature: AttackFeature, weight: i64) -> Self {
        self.attack_weights[feature.index()] = weight;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self, feature: Feature) -> i64 {
        self.weights[feature.index()]
    }

    pub fn attack_weight(&self, feature: AttackFeature) -> i64 {
        self.attack_weights[feature.index()]
    }

    pub fn max_combat_power(&self) -> Option<f64> {
        self.max_combat_power
    }

    /// Raw weighted feature sum, ignoring the constraint.
    #[inline]
    pub fn score(&self, team: &Team<'_>) -> f64 {
        let members = team.members();
        self.active
            .iter()
            .fold(0.0, |acc, (feature, weight)| acc + feature.value(members) * weight)
    }

    /// False iff a cap is configured and some member's combat power exceeds it.
    #[inline]
    pub fn matches_constraints(&self, team: &Team<'_>) -> bool {
        match self.max_combat_power {
            Some(max) => team.members().iter().all(|c| c.combat_power <= max),
            None => true,
        }
    }

    /// Per-feature breakdown of the raw weighted sum.
    pub fn explain(&self, team: &Team<'_>) -> Explanation {
        let members = team.members();
        let mut score = 0.0;
        let mut contributions = Vec::with_capacity(Feature::COUNT);
        for feature in Feature::ALL {
            let value = feature.value(members);
            let weight = self.weight(feature);
            score += value * weight as f64;
            contributions.push((feature, FeatureContribution { value, weight }));
        }
        Explanation {
            contributions,
            score,
        }
    }

    /// Scores one candidate's attack combination.
    pub fn attack_score(&self, candidate: &Candidate) -> f64 {
        AttackFeature::ALL.into_iter().fold(0.0, |acc, feature| {
            acc + feature.value(candidate) * self.attack_weight(feature) as f64
        })
    }

    /// Decodes one evaluation table row.
    ///
    /// Absent weight columns default to 0; an absent or empty cap means
    /// no constraint.
    pub fn from_row(row: RowRef<'_>) -> Result<Self, ScoringError> {
        let name = row
            .text(EVALUATION_NAME_COLUMN)
            .map_err(|_| ScoringError::MissingModelName { row: row.index() })?;

        let mut model = Self::new(name);
        for feature in Feature::ALL {
            model = model.with_weight(feature, read_weight(row, &feature.weight_column())?);
        }
        for feature in AttackFeature::ALL {
            model = model.with_attack_weight(feature, read_weight(row, &feature.weight_column())?);
        }
        if let Some(max) = row.optional_number(MAX_CP_CONSTRAINT_COLUMN)? {
            model = model.with_max_combat_power(max);
        }
        Ok(model)
    }

    /// Decodes every row of an evaluation table.
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ScoringError> {
        table.rows().map(Self::from_row).collect()
    }

    /// Encodes models as an evaluation table.
    pub fn to_table<'a>(models: impl IntoIterator<Item = &'a EvaluationModel>) -> Table {
        Table::from_records(models)
    }
}

impl Record for EvaluationModel {
    fn columns() -> Vec<String> {
        let mut columns = vec![EVALUATION_NAME_COLUMN.to_string()];
        columns.extend(Feature::ALL.iter().map(|f| f.weight_column()));
        columns.push(MAX_CP_CONSTRAINT_COLUMN.to_string());
        columns.extend(AttackFeature::ALL.iter().map(|f| f.weight_column()));
        columns
    }

    fn to_cells(&self) -> Vec<Cell> {
        let mut cells = vec![Cell::from(self.name.as_str())];
        cells.extend(self.weights.iter().map(|w| Cell::from(*w)));
        cells.push(self.max_combat_power.into());
        cells.extend(self.attack_weights.iter().map(|w| Cell::from(*w)));
        cells
    }
}

fn read_weight(row: RowRef<'_>, column: &str) -> Result<i64, ScoringError> {
    match row.optional_number(column)? {
        None => Ok(0),
        Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        Some(value) => Err(ScoringError::InvalidWeight {
            column: column.to_string(),
            value,
        }),
    }
}

/// Value and weight of one feature for one team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub value: f64,
    pub weight: i64,
}

/// Breakdown of a team's raw score.
///
/// Serializes as a flat map: one `{value, weight}` entry per feature name,
/// plus `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    contributions: Vec<(Feature, FeatureContribution)>,
    score: f64,
}

impl Explanation {
    /// Raw weighted sum.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Contribution of a single feature.
    pub fn get(&self, feature: Feature) -> Option<&FeatureContribution> {
        self.contributions
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, c)| c)
    }

    /// Contributions in scoring order.
    pub fn contributions(&self) -> &[(Feature, FeatureContribution)] {
        &self.contributions
    }

    /// Contributions keyed by feature name.
    pub fn by_name(&self) -> BTreeMap<&'static str, FeatureContribution> {
        self.contributions
            .iter()
            .map(|(f, c)| (f.name(), *c))
            .collect()
    }
}

impl Serialize for Explanation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Entry<'a> {
            Feature(&'a FeatureContribution),
            Score(f64),
        }

        let mut map = serializer.serialize_map(Some(self.contributions.len() + 1))?;
        for (feature, contribution) in &self.contributions {
            map.serialize_entry(feature.name(), &Entry::Feature(contribution))?;
        }
        map.serialize_entry("score", &Entry::Score(self.score))?;
        map.end()
    }
}

#[cfg(test)]
mod tests;
