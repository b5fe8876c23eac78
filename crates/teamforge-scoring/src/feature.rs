//! Scoring features.
//!
//! A feature is a named aggregation over the members of a team. Every feature
//! folds the members in slot order starting from `0.0`, so scores are
//! bit-for-bit reproducible across runs and platforms.

use std::fmt;
use std::str::FromStr;

use teamforge_core::{Candidate, DamageType, TEAM_SIZE};

use crate::error::ScoringError;

/// Team-level scoring features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Sum of attack.
    Attack,
    /// Sum of defence.
    Defence,
    /// Sum of HP.
    Hp,
    /// Sum of reciprocal attack-cycle length.
    AttackCycleLengthInverted,
    /// Sum of attack-cycle damage per turn.
    AttackCycleDamage,
    /// Minus one for every damage type the whole team is weak to.
    TypeVulnerability,
}

impl Feature {
    pub const COUNT: usize = 6;

    /// Every feature, in scoring order.
    pub const ALL: [Feature; Self::COUNT] = [
        Feature::Attack,
        Feature::Defence,
        Feature::Hp,
        Feature::AttackCycleLengthInverted,
        Feature::AttackCycleDamage,
        Feature::TypeVulnerability,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Attack => "attack",
            Feature::Defence => "defence",
            Feature::Hp => "hp",
            Feature::AttackCycleLengthInverted => "attack-cycle-length-inverted",
            Feature::AttackCycleDamage => "attack-cycle-damage",
            Feature::TypeVulnerability => "type-vulnerability",
        }
    }

    /// Column of the evaluation table holding this feature's weight.
    pub fn weight_column(self) -> String {
        format!("{}-weight", self.name())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Aggregates this feature over a team.
    #[inline]
    pub fn value(self, members: &[&Candidate; TEAM_SIZE]) -> f64 {
        match self {
            Feature::Attack => sum(members, |c| c.attack),
            Feature::Defence => sum(members, |c| c.defence),
            Feature::Hp => sum(members, |c| c.hp),
            Feature::AttackCycleLengthInverted => sum(members, |c| 1.0 / c.attack_cycle_length),
            Feature::AttackCycleDamage => sum(members, |c| c.attack_cycle_damage),
            Feature::TypeVulnerability => shared_vulnerabilities(members),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ScoringError::UnknownFeature(s.to_string()))
    }
}

/// Per-candidate features used to rank a candidate's attack combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttackFeature {
    AttackCycleLengthInverted,
    AttackCycleDamage,
}

impl AttackFeature {
    pub const COUNT: usize = 2;

    pub const ALL: [AttackFeature; Self::COUNT] = [
        AttackFeature::AttackCycleLengthInverted,
        AttackFeature::AttackCycleDamage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AttackFeature::AttackCycleLengthInverted => "attack-cycle-length-inverted",
            AttackFeature::AttackCycleDamage => "attack-cycle-damage",
        }
    }

    /// Column of the evaluation table holding this feature's weight.
    pub fn weight_column(self) -> String {
        format!("{}-attack-evaluation-weight", self.name())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn value(self, candidate: &Candidate) -> f64 {
        match self {
            AttackFeature::AttackCycleLengthInverted => 1.0 / candidate.attack_cycle_length,
            AttackFeature::AttackCycleDamage => candidate.attack_cycle_damage,
        }
    }
}

impl FromStr for AttackFeature {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttackFeature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ScoringError::UnknownFeature(s.to_string()))
    }
}

#[inline]
fn sum(members: &[&Candidate; TEAM_SIZE], attribute: impl Fn(&Candidate) -> f64) -> f64 {
    members.iter().fold(0.0, |acc, c| acc + attribute(*c))
}

fn shared_vulnerabilities(members: &[&Candidate; TEAM_SIZE]) -> f64 {
    let mut result = 0.0;
    for damage_type in DamageType::ALL {
        let all_weak = members.iter().all(|c| c.vulnerability(damage_type) > 1.0);
        result -= if all_weak { 1.0 } else { 0.0 };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, weak_to: &[DamageType]) -> Candidate {
        let mut vulnerabilities = [1.0; DamageType::COUNT];
        for t in weak_to {
            vulnerabilities[t.index()] = 1.6;
        }
        Candidate {
            name: name.to_string(),
            attack: 10.0,
            defence: 20.0,
            hp: 30.0,
            attack_cycle_length: 4.0,
            attack_cycle_damage: 2.5,
            combat_power: 500.0,
            vulnerabilities,
        }
    }

    #[test]
    fn test_sums() {
        let a = candidate("a", &[]);
        let b = candidate("b", &[]);
        let c = candidate("c", &[]);
        let team = [&a, &b, &c];
        assert_eq!(Feature::Attack.value(&team), 30.0);
        assert_eq!(Feature::Defence.value(&team), 60.0);
        assert_eq!(Feature::Hp.value(&team), 90.0);
        assert_eq!(Feature::AttackCycleLengthInverted.value(&team), 0.75);
        assert_eq!(Feature::AttackCycleDamage.value(&team), 7.5);
    }

    #[test]
    fn test_vulnerability_needs_whole_team() {
        use DamageType::*;
        let a = candidate("a", &[Fire, Ice, Rock]);
        let b = candidate("b", &[Fire, Ice]);
        let c = candidate("c", &[Fire, Rock]);
        assert_eq!(Feature::TypeVulnerability.value(&[&a, &b, &c]), -1.0);

        let d = candidate("d", &[Ice, Rock]);
        assert_eq!(Feature::TypeVulnerability.value(&[&a, &b, &d]), -1.0);
        assert_eq!(Feature::TypeVulnerability.value(&[&a, &c, &d]), -1.0);
        assert_eq!(Feature::TypeVulnerability.value(&[&b, &c, &d]), 0.0);
    }

    #[test]
    fn test_vulnerability_threshold_is_strict() {
        let mut a = candidate("a", &[]);
        a.vulnerabilities[DamageType::Water.index()] = 1.0;
        let b = candidate("b", &[DamageType::Water]);
        let c = candidate("c", &[DamageType::Water]);
        assert_eq!(Feature::TypeVulnerability.value(&[&a, &b, &c]), 0.0);
    }

    #[test]
    fn test_names_round_trip() {
        for f in Feature::ALL {
            assert_eq!(f.name().parse::<Feature>().unwrap(), f);
        }
        for f in AttackFeature::ALL {
            assert_eq!(f.name().parse::<AttackFeature>().unwrap(), f);
        }
        assert!("speed".parse::<Feature>().is_err());
        assert_eq!(Feature::Hp.weight_column(), "hp-weight");
        assert_eq!(
            AttackFeature::AttackCycleDamage.weight_column(),
            "attack-cycle-damage-attack-evaluation-weight"
        );
    }
}
