//! Store-backed engine operations.
//!
//! [`Engine`] ties the pure partition, evaluation and reduction steps to a
//! [`TableStore`] and the engine settings. Each operation reads its inputs
//! from the store, runs, and writes its output back, so the operations can
//! run in separate processes as long as they share a store.

use teamforge_config::{Configuration, EngineSettings};
use teamforge_core::{DataError, Roster, Team, TEAM_SIZE};
use teamforge_scoring::{EvaluationModel, Explanation, RankedTeam, ScoredTeam};
use teamforge_store::{DataKind, StoreRouter, TableStore};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::evaluator::evaluate;
use crate::partition::{make_blocks, make_tasks, parse_task_name, task_count, task_name, PartitionTask};
use crate::reducer::reduce;

/// Engine operations over one store.
#[derive(Debug, Clone)]
pub struct Engine<S> {
    store: S,
    settings: EngineSettings,
}

impl Engine<StoreRouter> {
    /// Builds the store router and settings from configuration.
    pub fn from_config(config: &Configuration) -> Result<Self, EngineError> {
        let settings = EngineSettings::from_config(config)?;
        let store = StoreRouter::from_config(config)?;
        Ok(Self::new(store, settings))
    }
}

impl<S: TableStore> Engine<S> {
    pub fn new(store: S, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Every evaluation model, in table order.
    pub fn models(&self) -> Result<Vec<EvaluationModel>, EngineError> {
        let table = self.store.read(DataKind::Evaluation, None)?;
        Ok(EvaluationModel::from_table(&table)?)
    }

    /// The evaluation model named `name`.
    pub fn model(&self, name: &str) -> Result<EvaluationModel, EngineError> {
        self.models()?
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| EngineError::UnknownModel(name.to_string()))
    }

    /// The enriched roster of model `name`.
    ///
    /// An absent roster is an error; a present roster with no rows is not.
    pub fn roster(&self, name: &str) -> Result<Roster, EngineError> {
        if !self.store.contains(DataKind::EnrichedLibrary, Some(name))? {
            return Err(EngineError::MissingRoster(name.to_string()));
        }
        let table = self.store.read(DataKind::EnrichedLibrary, Some(name))?;
        Ok(Roster::from_table(&table)?)
    }

    /// Writes the partition descriptors of every model; returns the task names.
    pub fn distribute(&self) -> Result<Vec<String>, EngineError> {
        let mut names = Vec::new();
        for model in self.models()? {
            let roster = self.roster(model.name())?;
            names.extend(self.distribute_model(model.name(), &roster)?);
        }
        Ok(names)
    }

    /// Writes the partition descriptors of one model.
    ///
    /// Results of a previous distribution are removed, and so are descriptors
    /// numbered past the new task count, so a store can be reused.
    pub fn distribute_model(&self, model: &str, roster: &Roster) -> Result<Vec<String>, EngineError> {
        let blocks = make_blocks(roster.len(), self.settings.partition_volume);
        let tasks = make_tasks(model, &blocks);
        let mut names = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let name = task.name();
            self.store.remove(DataKind::PartitionResult, Some(&name))?;
            self.store
                .write(DataKind::Partition, Some(&name), &task.to_table())?;
            names.push(name);
        }

        let mut stale = 0;
        for seq in tasks.len().. {
            let name = task_name(model, seq);
            let descriptor = self.store.remove(DataKind::Partition, Some(&name))?;
            let result = self.store.remove(DataKind::PartitionResult, Some(&name))?;
            if !descriptor && !result {
                break;
            }
            stale += 1;
        }
        if stale > 0 {
            debug!(event = "distribute_cleanup", model, tasks = stale);
        }

        info!(
            event = "distribute_end",
            model,
            candidates = roster.len(),
            blocks = blocks.len(),
            tasks = tasks.len(),
        );
        Ok(names)
    }

    /// Reads the descriptor of the task named `name`.
    pub fn task(&self, name: &str) -> Result<PartitionTask, EngineError> {
        if !self.store.contains(DataKind::Partition, Some(name))? {
            return Err(EngineError::MissingPartition(name.to_string()));
        }
        let table = self.store.read(DataKind::Partition, Some(name))?;
        PartitionTask::from_table(name, &table)
    }

    /// Evaluates the task named `<model>.<seq>` and stores its best-K list.
    ///
    /// Returns the number of teams stored.
    pub fn evaluate(&self, name: &str) -> Result<usize, EngineError> {
        let (model_name, _) = parse_task_name(name)?;
        let task = self.task(name)?;
        let model = self.model(model_name)?;
        let roster = self.roster(model_name)?;
        self.evaluate_loaded(&task, &roster, &model)
    }

    /// Evaluates a task against an already loaded roster and model.
    pub fn evaluate_loaded(
        &self,
        task: &PartitionTask,
        roster: &Roster,
        model: &EvaluationModel,
    ) -> Result<usize, EngineError> {
        let ranked: Vec<RankedTeam> = evaluate(task, roster, model, self.settings.results_size)?
            .iter()
            .map(ScoredTeam::to_ranked)
            .collect();
        self.store.write(
            DataKind::PartitionResult,
            Some(&task.name()),
            &RankedTeam::to_table(&ranked),
        )?;
        Ok(ranked.len())
    }

    /// Reduces the partition results of one model and stores its ranking.
    ///
    /// The expected tasks are those a distribution of the model's current
    /// roster produces.
    pub fn reduce(&self, model: &str) -> Result<Vec<RankedTeam>, EngineError> {
        let roster = self.roster(model)?;
        let tasks = task_count(roster.len(), self.settings.partition_volume);
        self.reduce_tasks(model, tasks)
    }

    pub(crate) fn reduce_tasks(&self, model: &str, tasks: usize) -> Result<Vec<RankedTeam>, EngineError> {
        reduce(&self.store, model, tasks, self.settings.results_size)
    }

    /// Reduces every model; returns each model's stored ranking.
    pub fn reduce_all(&self) -> Result<Vec<(String, Vec<RankedTeam>)>, EngineError> {
        self.models()?
            .into_iter()
            .map(|model| {
                let ranked = self.reduce(model.name())?;
                Ok((model.name().to_string(), ranked))
            })
            .collect()
    }

    /// The stored final ranking of one model.
    pub fn result(&self, model: &str) -> Result<Vec<RankedTeam>, EngineError> {
        let table = self.store.read(DataKind::Result, Some(model))?;
        Ok(RankedTeam::from_table(&table)?)
    }

    /// Per-feature breakdown of one team under one model.
    ///
    /// Shows the raw weighted sum even when the team breaks the model's cap.
    pub fn explain<N: AsRef<str>>(
        &self,
        model: &str,
        names: [N; TEAM_SIZE],
    ) -> Result<Explanation, EngineError> {
        let evaluation = self.model(model)?;
        let roster = self.roster(model)?;
        let rows = [
            roster.position(names[0].as_ref())?,
            roster.position(names[1].as_ref())?,
            roster.position(names[2].as_ref())?,
        ];
        let team = Team::from_roster(&roster, rows)
            .ok_or_else(|| DataError::DuplicateCandidate(duplicated(&names).to_string()))?;
        Ok(evaluation.explain(&team))
    }
}

fn duplicated<N: AsRef<str>>(names: &[N; TEAM_SIZE]) -> &str {
    let [a, b, c] = [names[0].as_ref(), names[1].as_ref(), names[2].as_ref()];
    if a == b || a == c {
        a
    } else {
        b.min(c)
    }
}
