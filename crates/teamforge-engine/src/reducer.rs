//! Reduction of per-partition rankings into one ranking per model.

use teamforge_scoring::{BestK, RankedTeam};
use teamforge_store::{DataKind, TableStore};
use tracing::info;

use crate::error::EngineError;
use crate::partition::task_name;

/// Merges rankings in the given order, keeping the best `results_size`.
///
/// Equivalent to a stable sort of the concatenated lists by score
/// descending, truncated; a team appearing in several lists counts once.
pub fn merge<I>(lists: I, results_size: usize) -> Vec<RankedTeam>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = RankedTeam>,
{
    let mut best = BestK::new(results_size);
    for list in lists {
        best.extend(list);
    }
    best.into_sorted_vec()
}

/// Reduces the partition results of `model` and stores the final ranking.
///
/// Reads the results of tasks `<model>.0` to `<model>.<tasks - 1>` in
/// sequence order. Every one of them must have both a descriptor and a
/// result; locations past `tasks` are never read.
pub fn reduce<S>(
    store: &S,
    model: &str,
    tasks: usize,
    results_size: usize,
) -> Result<Vec<RankedTeam>, EngineError>
where
    S: TableStore + ?Sized,
{
    let mut best = BestK::new(results_size);

    for seq in 0..tasks {
        let name = task_name(model, seq);
        if !store.contains(DataKind::Partition, Some(&name))? {
            return Err(EngineError::MissingPartition(name));
        }
        if !store.contains(DataKind::PartitionResult, Some(&name))? {
            return Err(EngineError::MissingPartitionResult(name));
        }
        let table = store.read(DataKind::PartitionResult, Some(&name))?;
        best.extend(RankedTeam::from_table(&table)?);
    }

    let ranked = best.into_sorted_vec();
    store.write(DataKind::Result, Some(model), &RankedTeam::to_table(&ranked))?;
    info!(
        event = "reduce_end",
        model,
        partitions = tasks,
        retained = ranked.len(),
        best = ranked.first().map(|t| t.score),
    );
    Ok(ranked)
}
