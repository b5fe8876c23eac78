//! Partition, evaluate and reduce engine for teamforge.
//!
//! Ranking every three-member team of a roster is split into independent
//! tasks:
//!
//! 1. **Distribute**: the roster is cut into blocks sized so one task scores
//!    about `partition-size` teams, and one descriptor is written per block
//!    combination ([`make_blocks`], [`make_tasks`]).
//! 2. **Evaluate**: each task scores its teams and stores its best
//!    `results-size` ([`evaluate`]).
//! 3. **Reduce**: the per-task rankings of a model are merged into the final
//!    ranking ([`reduce`]).
//!
//! The steps exchange tables through a [`TableStore`](teamforge_store::TableStore)
//! only, so [`Engine`] can run them in one process ([`Engine::run`]) or one
//! step at a time from separate invocations.
//!
//! # Example
//!
//! ```
//! use teamforge_config::EngineSettings;
//! use teamforge_engine::Engine;
//! use teamforge_scoring::{EvaluationModel, Feature};
//! use teamforge_store::{DataKind, StoreRouter, TableStore};
//! use teamforge_test::synthetic_roster;
//!
//! let store = StoreRouter::in_memory();
//! let model = EvaluationModel::new("demo").with_weight(Feature::Attack, 1);
//! store.write(DataKind::Evaluation, None, &EvaluationModel::to_table([&model])).unwrap();
//! store.write(DataKind::EnrichedLibrary, Some("demo"), &synthetic_roster(10).to_table()).unwrap();
//!
//! let engine = Engine::new(store, EngineSettings::new(27, 3));
//! let report = engine.run().unwrap();
//! assert!(report.is_success());
//! assert_eq!(engine.result("demo").unwrap().len(), 3);
//! ```

mod engine;
mod error;
mod evaluator;
mod partition;
mod pipeline;
mod reducer;

pub use engine::Engine;
pub use error::EngineError;
pub use evaluator::evaluate;
pub use partition::{
    block_size, make_blocks, make_tasks, parse_task_name, task_count, task_name, Block,
    PartitionTask,
};
pub use pipeline::{ModelOutcome, RunReport};
pub use reducer::{merge, reduce};
