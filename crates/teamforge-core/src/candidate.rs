//! Enriched candidates and the roster snapshot they live in.
//!
//! Enrichment produces one table per scoring model. Each row is decoded into a
//! [`Candidate`] exactly once, when the [`Roster`] is built; from then on the
//! inner scoring loop only does indexed reads on an immutable `Vec`.

use std::collections::HashSet;

use crate::error::DataError;
use crate::table::{Cell, Record, RowRef, Table};

/// Column names of the enriched roster table.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const REAL_ATTACK: &str = "Real attack";
    pub const REAL_DEFENCE: &str = "Real defence";
    pub const REAL_HP: &str = "Real HP";
    pub const ATTACK_CYCLE_LENGTH: &str = "Attack cycle length";
    /// Attack-cycle damage per turn.
    pub const DPT: &str = "DPT";
    pub const CP: &str = "CP";
}

/// Damage types a candidate can be vulnerable to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DamageType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl DamageType {
    pub const COUNT: usize = 18;

    /// Every damage type, in declaration order.
    pub const ALL: [DamageType; Self::COUNT] = [
        DamageType::Normal,
        DamageType::Fire,
        DamageType::Water,
        DamageType::Grass,
        DamageType::Electric,
        DamageType::Ice,
        DamageType::Fighting,
        DamageType::Poison,
        DamageType::Ground,
        DamageType::Flying,
        DamageType::Psychic,
        DamageType::Bug,
        DamageType::Rock,
        DamageType::Ghost,
        DamageType::Dragon,
        DamageType::Dark,
        DamageType::Steel,
        DamageType::Fairy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DamageType::Normal => "Normal",
            DamageType::Fire => "Fire",
            DamageType::Water => "Water",
            DamageType::Grass => "Grass",
            DamageType::Electric => "Electric",
            DamageType::Ice => "Ice",
            DamageType::Fighting => "Fighting",
            DamageType::Poison => "Poison",
            DamageType::Ground => "Ground",
            DamageType::Flying => "Flying",
            DamageType::Psychic => "Psychic",
            DamageType::Bug => "Bug",
            DamageType::Rock => "Rock",
            DamageType::Ghost => "Ghost",
            DamageType::Dragon => "Dragon",
            DamageType::Dark => "Dark",
            DamageType::Steel => "Steel",
            DamageType::Fairy => "Fairy",
        }
    }

    /// Column holding the vulnerability multiplier against this type.
    pub fn vulnerability_column(self) -> String {
        format!("{}_vuln", self.name())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One enriched roster row.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Unique within one model's roster.
    pub name: String,
    pub attack: f64,
    pub defence: f64,
    pub hp: f64,
    /// Turns per attack cycle; always positive.
    pub attack_cycle_length: f64,
    /// Attack-cycle damage per turn.
    pub attack_cycle_damage: f64,
    /// Current combat power.
    pub combat_power: f64,
    /// Vulnerability multiplier per damage type, indexed by [`DamageType::index`].
    pub vulnerabilities: [f64; DamageType::COUNT],
}

impl Candidate {
    /// Decodes a roster row, failing on any missing or malformed attribute.
    pub fn from_row(row: RowRef<'_>) -> Result<Self, DataError> {
        let attack_cycle_length = row.number(columns::ATTACK_CYCLE_LENGTH)?;
        if !(attack_cycle_length > 0.0) {
            return Err(DataError::InvalidValue {
                row: row.index(),
                attribute: columns::ATTACK_CYCLE_LENGTH.to_string(),
                value: attack_cycle_length.to_string(),
            });
        }

        let mut vulnerabilities = [0.0; DamageType::COUNT];
        for damage_type in DamageType::ALL {
            vulnerabilities[damage_type.index()] =
                row.number(&damage_type.vulnerability_column())?;
        }

        Ok(Self {
            name: row.text(columns::NAME)?,
            attack: row.number(columns::REAL_ATTACK)?,
            defence: row.number(columns::REAL_DEFENCE)?,
            hp: row.number(columns::REAL_HP)?,
            attack_cycle_length,
            attack_cycle_damage: row.number(columns::DPT)?,
            combat_power: row.number(columns::CP)?,
            vulnerabilities,
        })
    }

    /// Vulnerability multiplier against one damage type.
    pub fn vulnerability(&self, damage_type: DamageType) -> f64 {
        self.vulnerabilities[damage_type.index()]
    }
}

impl Record for Candidate {
    fn columns() -> Vec<String> {
        let mut cols: Vec<String> = [
            columns::NAME,
            columns::REAL_ATTACK,
            columns::REAL_DEFENCE,
            columns::REAL_HP,
            columns::ATTACK_CYCLE_LENGTH,
            columns::DPT,
            columns::CP,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        cols.extend(DamageType::ALL.iter().map(|t| t.vulnerability_column()));
        cols
    }

    fn to_cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::from(self.name.as_str()),
            self.attack.into(),
            self.defence.into(),
            self.hp.into(),
            self.attack_cycle_length.into(),
            self.attack_cycle_damage.into(),
            self.combat_power.into(),
        ];
        cells.extend(self.vulnerabilities.iter().map(|v| Cell::Number(*v)));
        cells
    }
}

/// Immutable snapshot of one scoring model's enriched roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    candidates: Vec<Candidate>,
}

impl Roster {
    /// Builds a roster from already-decoded candidates.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !seen.insert(candidate.name.as_str()) {
                return Err(DataError::DuplicateCandidate(candidate.name.clone()));
            }
        }
        Ok(Self { candidates })
    }

    /// Decodes every row of an enriched roster table.
    pub fn from_table(table: &Table) -> Result<Self, DataError> {
        let candidates = table
            .rows()
            .map(Candidate::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(candidates)
    }

    /// Encodes the roster back into a table.
    pub fn to_table(&self) -> Table {
        Table::from_records(&self.candidates)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Row position of the candidate with the given name.
    pub fn position(&self, name: &str) -> Result<usize, DataError> {
        self.candidates
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DataError::UnknownCandidate(name.to_string()))
    }
}
