//! Partition evaluation: the inner loop.
//!
//! For a task with blocks `(b1, b2, b3)` every index triple `i < j < k` with
//! `i ∈ b1`, `j ∈ b2`, `k ∈ b3` is scored once. Because tasks are block
//! combinations with repetition, each unordered team of the roster is
//! visited by exactly one task, and by exactly one triple within it.

use std::time::Instant;

use teamforge_core::{Roster, Team};
use teamforge_scoring::{BestK, EvaluationModel, ScoredTeam};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::partition::PartitionTask;

/// Scores every team of `task` and keeps the best `results_size`, best first.
///
/// Fails if the task reaches past the end of the roster.
pub fn evaluate<'a>(
    task: &PartitionTask,
    roster: &'a Roster,
    model: &'a EvaluationModel,
    results_size: usize,
) -> Result<Vec<ScoredTeam<'a>>, EngineError> {
    let max_row = task.max_row();
    if max_row >= roster.len() {
        return Err(EngineError::BlockOutOfRange {
            task: task.name(),
            hi: max_row,
            len: roster.len(),
        });
    }

    let start = Instant::now();
    let name = task.name();
    let candidates = roster.candidates();
    let [b1, b2, b3] = *task.blocks();
    let outer = b1.size();
    let step = (outer / 10).max(1);

    info!(
        event = "partition_start",
        task = %name,
        model = model.name(),
        volume = task.volume(),
    );

    let mut best = BestK::new(results_size);
    let mut evaluated: u64 = 0;

    for (done, i) in b1.rows().enumerate() {
        let first = &candidates[i];
        for j in b2.lo.max(i + 1)..=b2.hi {
            let second = &candidates[j];
            for k in b3.lo.max(j + 1)..=b3.hi {
                let team = Team::from_parts([i, j, k], [first, second, &candidates[k]]);
                best.offer(ScoredTeam::new(team, model));
                evaluated += 1;
            }
        }
        if (done + 1) % step == 0 {
            debug!(
                event = "partition_progress",
                task = %name,
                percent = (done + 1) * 100 / outer,
                evaluated,
            );
        }
    }

    let ranked = best.into_sorted_vec();
    info!(
        event = "partition_end",
        task = %name,
        evaluated,
        retained = ranked.len(),
        best = ranked.first().map(|t| t.score()),
        duration_ms = start.elapsed().as_millis() as u64,
    );
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{make_blocks, make_tasks, Block};
    use std::collections::HashSet;
    use teamforge_core::TeamKey;
    use teamforge_scoring::Feature;
    use teamforge_test::{synthetic_roster, trio_roster};

    fn model() -> EvaluationModel {
        EvaluationModel::new("m")
            .with_weight(Feature::Attack, 1)
            .with_weight(Feature::Hp, 2)
            .with_weight(Feature::AttackCycleLengthInverted, 1500)
            .with_weight(Feature::TypeVulnerability, 100)
    }

    fn all_teams(roster: &Roster, model: &EvaluationModel, volume: u64) -> Vec<TeamKey> {
        let blocks = make_blocks(roster.len(), volume);
        let mut keys = Vec::new();
        for task in make_tasks("m", &blocks) {
            for scored in evaluate(&task, roster, model, usize::MAX).unwrap() {
                keys.push(scored.team().key());
            }
        }
        keys
    }

    #[test]
    fn test_single_block_trio() {
        let roster = trio_roster();
        let model = model();
        let task = PartitionTask::new("m", 0, [Block::new(0, 2); 3]);
        let ranked = evaluate(&task, &roster, &model, 10).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].team().rows(), [0, 1, 2]);
    }

    #[test]
    fn test_every_team_exactly_once() {
        let n = 13;
        let roster = synthetic_roster(n);
        let model = model();
        for volume in [1, 8, 27, 64, 10_000] {
            let keys = all_teams(&roster, &model, volume);
            let unique: HashSet<_> = keys.iter().cloned().collect();
            assert_eq!(keys.len(), n * (n - 1) * (n - 2) / 6, "volume {}", volume);
            assert_eq!(unique.len(), keys.len(), "volume {}", volume);
        }
    }

    #[test]
    fn test_rows_are_distinct() {
        let roster = synthetic_roster(9);
        let model = model();
        for task in make_tasks("m", &make_blocks(9, 8)) {
            for scored in evaluate(&task, &roster, &model, 50).unwrap() {
                let [i, j, k] = scored.team().rows();
                assert!(i != j && i != k && j != k);
            }
        }
    }

    #[test]
    fn test_keeps_best_k_sorted() {
        let roster = synthetic_roster(12);
        let model = model();
        let task = PartitionTask::new("m", 0, [Block::new(0, 11); 3]);
        let all = evaluate(&task, &roster, &model, usize::MAX).unwrap();
        let top = evaluate(&task, &roster, &model, 5).unwrap();

        assert_eq!(all.len(), 220);
        assert_eq!(top.len(), 5);
        for w in all.windows(2) {
            assert!(w[0].score() >= w[1].score());
        }
        let expected: Vec<_> = all.iter().take(5).map(|t| t.team().rows()).collect();
        let actual: Vec<_> = top.iter().map(|t| t.team().rows()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_idempotent() {
        let roster = synthetic_roster(15);
        let model = model();
        let task = &make_tasks("m", &make_blocks(15, 125))[4];
        let first: Vec<_> = evaluate(task, &roster, &model, 7)
            .unwrap()
            .iter()
            .map(ScoredTeam::to_ranked)
            .collect();
        let second: Vec<_> = evaluate(task, &roster, &model, 7)
            .unwrap()
            .iter()
            .map(ScoredTeam::to_ranked)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_constraint_zeroes_everything() {
        let roster = trio_roster();
        let model = model().with_max_combat_power(900.0);
        let task = PartitionTask::new("m", 0, [Block::new(0, 2); 3]);
        let ranked = evaluate(&task, &roster, &model, 10).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score(), 0.0);
    }

    #[test]
    fn test_small_rosters_yield_nothing() {
        let model = model();
        for n in [1, 2] {
            let roster = synthetic_roster(n);
            let task = PartitionTask::new("m", 0, [Block::new(0, n - 1); 3]);
            assert!(evaluate(&task, &roster, &model, 10).unwrap().is_empty());
        }
    }

    #[test]
    fn test_zero_k_is_empty() {
        let roster = trio_roster();
        let model = model();
        let task = PartitionTask::new("m", 0, [Block::new(0, 2); 3]);
        assert!(evaluate(&task, &roster, &model, 0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_block() {
        let roster = trio_roster();
        let model = model();
        let task = PartitionTask::new("m", 7, [Block::new(0, 1), Block::new(2, 3), Block::new(2, 3)]);
        let err = evaluate(&task, &roster, &model, 10).unwrap_err();
        assert!(matches!(
            err,
            EngineError::BlockOutOfRange { hi: 3, len: 3, .. }
        ));
    }
}
