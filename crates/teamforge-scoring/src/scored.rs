//! Scored teams.
//!
//! [`ScoredTeam`] is the borrowed form built in the evaluation inner loop.
//! [`RankedTeam`] is the owned form persisted as a partition result or a
//! final result, and read back by the reducer.

use std::fmt;

use serde::{Deserialize, Serialize};
use teamforge_core::{Cell, DataError, Record, Table, Team, TeamKey, TEAM_SIZE};

use crate::best_k::Ranked;
use crate::model::EvaluationModel;

/// Member columns of a result table, in slot order.
pub const MEMBER_COLUMNS: [&str; TEAM_SIZE] = ["1", "2", "3"];

/// Score column of a result table.
pub const RESULT_COLUMN: &str = "result";

/// A team scored by one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTeam<'a> {
    team: Team<'a>,
    model: &'a str,
    score: f64,
}

impl<'a> ScoredTeam<'a> {
    /// Scores `team`, yielding 0 when it breaks the model's constraint.
    #[inline]
    pub fn new(team: Team<'a>, model: &'a EvaluationModel) -> Self {
        let score = if model.matches_constraints(&team) {
            model.score(&team)
        } else {
            0.0
        };
        Self {
            team,
            model: model.name(),
            score,
        }
    }

    pub fn team(&self) -> &Team<'a> {
        &self.team
    }

    pub fn model(&self) -> &'a str {
        self.model
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Owned copy holding member names in slot order.
    pub fn to_ranked(&self) -> RankedTeam {
        RankedTeam {
            names: self.team.names().map(str::to_string),
            score: self.score,
        }
    }
}

impl Ranked for ScoredTeam<'_> {
    type Key = [usize; TEAM_SIZE];

    fn score(&self) -> f64 {
        self.score
    }

    fn key(&self) -> Self::Key {
        self.team.sorted_rows()
    }
}

/// Member names and score of a retained team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    pub names: [String; TEAM_SIZE],
    pub score: f64,
}

impl RankedTeam {
    pub fn new<S: Into<String>>(names: [S; TEAM_SIZE], score: f64) -> Self {
        Self {
            names: names.map(Into::into),
            score,
        }
    }

    /// Encodes a ranking as a result table, preserving order.
    pub fn to_table<'a>(teams: impl IntoIterator<Item = &'a RankedTeam>) -> Table {
        Table::from_records(teams)
    }

    /// Decodes a result table, preserving order.
    ///
    /// A blank table decodes to an empty ranking.
    pub fn from_table(table: &Table) -> Result<Vec<Self>, DataError> {
        table
            .rows()
            .map(|row| {
                let names = [
                    row.text(MEMBER_COLUMNS[0])?,
                    row.text(MEMBER_COLUMNS[1])?,
                    row.text(MEMBER_COLUMNS[2])?,
                ];
                let score = row.number(RESULT_COLUMN)?;
                Ok(Self { names, score })
            })
            .collect()
    }
}

impl Record for RankedTeam {
    fn columns() -> Vec<String> {
        let mut columns: Vec<String> = MEMBER_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.push(RESULT_COLUMN.to_string());
        columns
    }

    fn to_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.names.iter().map(|n| Cell::from(n.as_str())).collect();
        cells.push(Cell::from(self.score));
        cells
    }
}

impl Ranked for RankedTeam {
    type Key = TeamKey;

    fn score(&self) -> f64 {
        self.score
    }

    fn key(&self) -> TeamKey {
        TeamKey::new(self.names.clone())
    }
}

impl fmt::Display for RankedTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] {}",
            self.names[0], self.names[1], self.names[2], self.score
        )
    }
}
