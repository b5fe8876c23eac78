//! Evaluation models declared in configuration.
//!
//! ```yaml
//! evaluation:
//!   my-first-evaluation:
//!     weights:
//!       attack: 1
//!       attack-cycle-length-inverted: 1500
//!     constraints:
//!       max-cp: 1500
//!     attack-evaluation-weights:
//!       attack-cycle-damage: 1
//! ```
//!
//! Absent weights are 0 and an absent `max-cp` means no cap.

use teamforge_config::Configuration;
use teamforge_core::Table;
use teamforge_scoring::{AttackFeature, EvaluationModel, Feature};

use crate::error::StoreError;
use crate::kind::DataKind;
use crate::TableStore;

const STORE_NAME: &str = "configuration";

/// Root of the model definitions.
pub const EVALUATION_KEY: &str = "evaluation";

/// Serves the evaluation table from `evaluation.*` keys.
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    config: Configuration,
}

impl ConfigurationStore {
    pub fn new(config: &Configuration) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Decodes every model under `evaluation`, in document order.
    pub fn models(&self) -> Result<Vec<EvaluationModel>, StoreError> {
        let config = &self.config;
        config
            .keys(EVALUATION_KEY)
            .into_iter()
            .map(|name| -> Result<EvaluationModel, StoreError> {
                let base = format!("{}.{}", EVALUATION_KEY, name);
                let mut model = EvaluationModel::new(name);
                for feature in Feature::ALL {
                    let path = format!("{}.weights.{}", base, feature);
                    model = model.with_weight(feature, config.get_or(&path, 0)?);
                }
                for feature in AttackFeature::ALL {
                    let path = format!("{}.attack-evaluation-weights.{}", base, feature.name());
                    model = model.with_attack_weight(feature, config.get_or(&path, 0)?);
                }
                if let Some(max) = config.get_opt::<f64>(&format!("{}.constraints.max-cp", base))? {
                    model = model.with_max_combat_power(max);
                }
                Ok(model)
            })
            .collect()
    }
}

impl TableStore for ConfigurationStore {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError> {
        if kind != DataKind::Evaluation {
            return Err(StoreError::unsupported(
                STORE_NAME,
                format!("Data type {}", kind),
            ));
        }
        if key.is_some_and(|k| !k.is_empty()) {
            return Err(StoreError::unsupported(STORE_NAME, "Pagination"));
        }
        Ok(EvaluationModel::to_table(&self.models()?))
    }

    fn write(&self, _kind: DataKind, _key: Option<&str>, _table: &Table) -> Result<(), StoreError> {
        Err(StoreError::unsupported(STORE_NAME, "Writing"))
    }

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        Ok(kind == DataKind::Evaluation && key.map_or(true, str::is_empty))
    }
}
