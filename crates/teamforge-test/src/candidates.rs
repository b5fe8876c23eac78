//! Enriched candidate fixtures.
//!
//! # Example
//!
//! ```
//! use teamforge_test::candidates::{trio_roster, synthetic_roster};
//!
//! assert_eq!(trio_roster().len(), 3);
//! assert_eq!(synthetic_roster(20).len(), 20);
//! ```

use teamforge_core::{Candidate, DamageType, Roster};

/// Grass/Poison candidate with fully enriched attributes.
pub fn ivysaur() -> Candidate {
    Candidate {
        name: "Ivysaur".to_string(),
        attack: 98.0,
        defence: 91.0,
        hp: 100.0,
        attack_cycle_length: 13.0,
        attack_cycle_damage: 8.653846153846153,
        combat_power: 944.0,
        vulnerabilities: [
            1.0,                // Normal
            1.25,               // Fire
            0.8,                // Water
            0.6400000000000001, // Grass
            0.8,                // Electric
            1.25,               // Ice
            0.8,                // Fighting
            1.0,                // Poison
            1.0,                // Ground
            1.25,               // Flying
            1.25,               // Psychic
            1.0,                // Bug
            1.0,                // Rock
            1.0,                // Ghost
            1.0,                // Dragon
            1.0,                // Dark
            1.0,                // Steel
            0.8,                // Fairy
        ],
    }
}

/// Fire candidate with fully enriched attributes.
pub fn charmander() -> Candidate {
    Candidate {
        name: "Charmander".to_string(),
        attack: 77.0,
        defence: 63.0,
        hp: 79.0,
        attack_cycle_length: 25.0,
        attack_cycle_damage: 6.6,
        combat_power: 549.0,
        vulnerabilities: [
            1.0, 0.8, 1.25, 0.8, 1.0, 0.8, 1.0, 1.0, 1.25, 1.0, 1.0, 0.8, 1.25, 1.0, 1.0, 1.0,
            0.8, 0.8,
        ],
    }
}

/// Bug/Flying candidate with fully enriched attributes.
pub fn butterfree() -> Candidate {
    Candidate {
        name: "Butterfree".to_string(),
        attack: 105.0,
        defence: 85.0,
        hp: 98.0,
        attack_cycle_length: 19.0,
        attack_cycle_damage: 7.947368421052632,
        combat_power: 975.0,
        vulnerabilities: [
            1.0,
            1.25,
            1.0,
            0.6400000000000001,
            1.25,
            1.25,
            0.6400000000000001,
            1.0,
            0.6400000000000001,
            1.25,
            1.0,
            0.8,
            1.5625,
            1.0,
            1.0,
            1.0,
            1.0,
            1.0,
        ],
    }
}

/// Roster of Ivysaur, Charmander and Butterfree, in that order.
pub fn trio_roster() -> Roster {
    Roster::new(vec![ivysaur(), charmander(), butterfree()]).unwrap()
}

/// Deterministic roster of `n` distinct candidates with varied attributes.
///
/// Names are `candidate-000`, `candidate-001`, ...; attribute values are
/// spread by co-prime strides so that scores rarely tie.
pub fn synthetic_roster(n: usize) -> Roster {
    let candidates = (0..n)
        .map(|i| {
            let mut vulnerabilities = [1.0; DamageType::COUNT];
            for t in DamageType::ALL {
                let slot = i + t.index() * 5;
                vulnerabilities[t.index()] = if slot % 7 == 0 {
                    1.6
                } else if slot % 5 == 0 {
                    0.625
                } else {
                    1.0
                };
            }
            Candidate {
                name: format!("candidate-{:03}", i),
                attack: 60.0 + ((i * 37) % 97) as f64,
                defence: 50.0 + ((i * 53) % 89) as f64,
                hp: 70.0 + ((i * 29) % 83) as f64,
                attack_cycle_length: 8.0 + ((i * 7) % 17) as f64,
                attack_cycle_damage: 5.0 + ((i * 13) % 31) as f64 / 10.0,
                combat_power: 500.0 + ((i * 71) % 1100) as f64,
                vulnerabilities,
            }
        })
        .collect();
    Roster::new(candidates).unwrap()
}
