//! End-to-end run: distribute, evaluate on a worker pool, reduce.

use std::fmt;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use teamforge_core::ErrorKind;
use teamforge_scoring::{EvaluationModel, RankedTeam};
use teamforge_store::TableStore;
use tracing::{error, info};

use crate::engine::Engine;
use crate::error::EngineError;

/// Outcome of one model within a run.
#[derive(Debug)]
pub struct ModelOutcome {
    pub model: String,
    pub tasks: usize,
    pub result: Result<Vec<RankedTeam>, EngineError>,
}

impl ModelOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-model outcomes of a run, in evaluation-table order.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<ModelOutcome>,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ModelOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ModelOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn outcome(&self, model: &str) -> Option<&ModelOutcome> {
        self.outcomes.iter().find(|o| o.model == model)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(ranked) => writeln!(
                    f,
                    "{}: {} tasks, {} teams ranked",
                    outcome.model,
                    outcome.tasks,
                    ranked.len()
                )?,
                Err(e) => writeln!(f, "{}: failed: {}", outcome.model, e)?,
            }
        }
        write!(f, "completed in {:.2?}", self.duration)
    }
}

impl<S: TableStore> Engine<S> {
    /// Runs every model end to end.
    ///
    /// Partition tasks of a model run in parallel on a rayon pool sized by
    /// `worker-threads`. A data or storage failure fails only its model and
    /// is recorded in the report; configuration errors abort the run.
    pub fn run(&self) -> Result<RunReport, EngineError> {
        let start = Instant::now();
        let mut builder = ThreadPoolBuilder::new();
        if let Some(threads) = self.settings().worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        let models = self.models()?;

        info!(
            event = "run_start",
            models = models.len(),
            threads = pool.current_num_threads(),
            partition_volume = self.settings().partition_volume,
            results_size = self.settings().results_size,
        );

        let mut outcomes = Vec::with_capacity(models.len());
        for model in &models {
            let mut tasks = 0;
            let result = match self.run_model(model, &pool, &mut tasks) {
                Err(e) if e.kind() == ErrorKind::Configuration => return Err(e),
                Err(e) => {
                    error!(event = "model_failed", model = model.name(), error = %e);
                    Err(e)
                }
                ranked => ranked,
            };
            outcomes.push(ModelOutcome {
                model: model.name().to_string(),
                tasks,
                result,
            });
        }

        let report = RunReport {
            outcomes,
            duration: start.elapsed(),
        };
        info!(
            event = "run_end",
            models = report.outcomes.len(),
            failed = report.failures().count(),
            duration_ms = report.duration.as_millis() as u64,
        );
        Ok(report)
    }

    fn run_model(
        &self,
        model: &EvaluationModel,
        pool: &rayon::ThreadPool,
        tasks: &mut usize,
    ) -> Result<Vec<RankedTeam>, EngineError> {
        let roster = self.roster(model.name())?;
        let names = self.distribute_model(model.name(), &roster)?;
        *tasks = names.len();

        pool.install(|| {
            names.par_iter().try_for_each(|name| {
                let task = self.task(name)?;
                self.evaluate_loaded(&task, &roster, model).map(|_| ())
            })
        })?;

        self.reduce_tasks(model.name(), names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_config::EngineSettings;
    use teamforge_store::{DataKind, StoreRouter};
    use teamforge_test::{synthetic_roster, test_configuration, TEST_EVALUATION};

    #[test]
    fn test_run_single_model() {
        let mut config = test_configuration(64, 5);
        config.set("worker-threads", "2").unwrap();
        let engine = Engine::from_config(&config).unwrap();
        engine
            .store()
            .write(
                DataKind::EnrichedLibrary,
                Some(TEST_EVALUATION),
                &synthetic_roster(20).to_table(),
            )
            .unwrap();

        let report = engine.run().unwrap();
        assert!(report.is_success());
        let outcome = report.outcome(TEST_EVALUATION).unwrap();
        // 5 blocks of 4 rows
        assert_eq!(outcome.tasks, 35);
        assert_eq!(outcome.result.as_ref().unwrap().len(), 5);
        assert!(report.to_string().contains("test-evaluation: 35 tasks, 5 teams ranked"));
    }

    #[test]
    fn test_failed_model_does_not_abort_others() {
        let store = StoreRouter::in_memory();
        let models = [
            EvaluationModel::new("has-roster"),
            EvaluationModel::new("no-roster"),
        ];
        store
            .write(DataKind::Evaluation, None, &EvaluationModel::to_table(&models))
            .unwrap();
        store
            .write(
                DataKind::EnrichedLibrary,
                Some("has-roster"),
                &synthetic_roster(6).to_table(),
            )
            .unwrap();

        let engine = Engine::new(store, EngineSettings::new(1000, 3));
        let report = engine.run().unwrap();

        assert!(!report.is_success());
        assert!(report.outcome("has-roster").unwrap().is_success());
        let failed: Vec<_> = report.failures().map(|o| o.model.as_str()).collect();
        assert_eq!(failed, vec!["no-roster"]);
        assert!(matches!(
            report.outcome("no-roster").unwrap().result,
            Err(EngineError::MissingRoster(_))
        ));
    }

    #[test]
    fn test_empty_roster_gives_empty_result() {
        let store = StoreRouter::in_memory();
        store
            .write(
                DataKind::Evaluation,
                None,
                &EvaluationModel::to_table(&[EvaluationModel::new("m")]),
            )
            .unwrap();
        store
            .write(DataKind::EnrichedLibrary, Some("m"), &synthetic_roster(0).to_table())
            .unwrap();

        let engine = Engine::new(store, EngineSettings::new(1000, 3));
        let report = engine.run().unwrap();
        let outcome = report.outcome("m").unwrap();
        assert_eq!(outcome.tasks, 0);
        assert!(outcome.result.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_configuration_error_aborts() {
        let mut config = test_configuration(64, 5);
        config.set("store.evaluation", "memory").unwrap();
        config.set("store.partition", "configuration").unwrap();
        let engine = Engine::from_config(&config).unwrap();
        let models = [EvaluationModel::new("m")];
        engine
            .store()
            .write(DataKind::Evaluation, None, &EvaluationModel::to_table(&models))
            .unwrap();
        engine
            .store()
            .write(DataKind::EnrichedLibrary, Some("m"), &synthetic_roster(5).to_table())
            .unwrap();

        let err = engine.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
