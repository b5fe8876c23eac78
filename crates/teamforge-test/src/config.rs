//! Configuration fixtures.
//!
//! # Example
//!
//! ```
//! use teamforge_test::config::{test_configuration, TEST_EVALUATION};
//!
//! let config = test_configuration(1728, 10);
//! assert_eq!(config.require::<u64>("partition-size").unwrap(), 1728);
//! assert!(config.contains(&format!("evaluation.{}.weights", TEST_EVALUATION)));
//! ```

use teamforge_config::Configuration;

/// Name of the evaluation model defined by [`test_configuration`].
pub const TEST_EVALUATION: &str = "test-evaluation";

const MODEL_YAML: &str = r#"
store:
  evaluation: configuration
  enriched-library: memory
  partition: memory
  partition-result: memory
  result: memory
evaluation:
  test-evaluation:
    weights:
      attack: 1
      defence: 1
      hp: 1
      attack-cycle-length-inverted: 1500
      attack-cycle-damage: 10
      type-vulnerability: 100
    constraints:
      max-cp: 900
    attack-evaluation-weights:
      attack-cycle-length-inverted: 100
      attack-cycle-damage: 1
"#;

/// In-memory configuration with one evaluation model.
pub fn test_configuration(partition_size: u64, results_size: usize) -> Configuration {
    let mut config = Configuration::from_yaml_str(MODEL_YAML).unwrap();
    config
        .set("partition-size", &partition_size.to_string())
        .unwrap();
    config
        .set("results-size", &results_size.to_string())
        .unwrap();
    config
}
