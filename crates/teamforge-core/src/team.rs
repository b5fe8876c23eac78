//! Three-member teams.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Roster};

/// Number of members in a team.
pub const TEAM_SIZE: usize = 3;

/// Three distinct roster rows.
///
/// Slot order is kept for display but is irrelevant for identity: two teams
/// are equal when they contain the same rows in any order.
#[derive(Debug, Clone, Copy)]
pub struct Team<'a> {
    rows: [usize; TEAM_SIZE],
    members: [&'a Candidate; TEAM_SIZE],
}

impl<'a> Team<'a> {
    /// Builds a team from roster positions.
    ///
    /// Returns `None` if any position is out of range or repeated.
    pub fn from_roster(roster: &'a Roster, rows: [usize; TEAM_SIZE]) -> Option<Self> {
        if rows[0] == rows[1] || rows[0] == rows[2] || rows[1] == rows[2] {
            return None;
        }
        Some(Self {
            rows,
            members: [
                roster.get(rows[0])?,
                roster.get(rows[1])?,
                roster.get(rows[2])?,
            ],
        })
    }

    /// Builds a team from pre-resolved members.
    ///
    /// The caller guarantees `rows` are pairwise distinct and that each member
    /// was read from the corresponding row.
    #[inline]
    pub fn from_parts(rows: [usize; TEAM_SIZE], members: [&'a Candidate; TEAM_SIZE]) -> Self {
        debug_assert!(rows[0] != rows[1] && rows[0] != rows[2] && rows[1] != rows[2]);
        Self { rows, members }
    }

    #[inline]
    pub fn members(&self) -> &[&'a Candidate; TEAM_SIZE] {
        &self.members
    }

    #[inline]
    pub fn rows(&self) -> [usize; TEAM_SIZE] {
        self.rows
    }

    /// Member names in slot order.
    pub fn names(&self) -> [&'a str; TEAM_SIZE] {
        [
            self.members[0].name.as_str(),
            self.members[1].name.as_str(),
            self.members[2].name.as_str(),
        ]
    }

    /// Row positions in ascending order.
    pub fn sorted_rows(&self) -> [usize; TEAM_SIZE] {
        let mut rows = self.rows;
        rows.sort_unstable();
        rows
    }

    /// Order-insensitive identity by member name.
    pub fn key(&self) -> TeamKey {
        TeamKey::new(self.names())
    }
}

impl PartialEq for Team<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_rows() == other.sorted_rows()
    }
}

impl Eq for Team<'_> {}

impl fmt::Display for Team<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.names();
        write!(f, "[{}, {}, {}]", a, b, c)
    }
}

/// Order-insensitive team identity: member names, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamKey([String; TEAM_SIZE]);

impl TeamKey {
    pub fn new<S: AsRef<str>>(names: [S; TEAM_SIZE]) -> Self {
        let mut names = names.map(|n| n.as_ref().to_string());
        names.sort_unstable();
        Self(names)
    }

    pub fn names(&self) -> &[String; TEAM_SIZE] {
        &self.0
    }
}
