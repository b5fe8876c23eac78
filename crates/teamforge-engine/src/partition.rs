//! Partitioning of the team search space.
//!
//! The roster's row range `[0, n)` is cut into contiguous [`Block`]s of
//! `⌊volume^(1/3)⌋` rows, so that one block-triple holds roughly `volume`
//! index combinations. Every combination with repetition `b1 ≤ b2 ≤ b3` of
//! blocks becomes one [`PartitionTask`]; together the tasks cover every
//! unordered team exactly once.

use std::fmt;
use std::ops::RangeInclusive;

use teamforge_core::{Cell, DataError, Record, Table, TEAM_SIZE};
use teamforge_scoring::scored::MEMBER_COLUMNS;

use crate::error::EngineError;

/// Closed interval `[lo, hi]` of roster rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    pub lo: usize,
    pub hi: usize,
}

impl Block {
    pub fn new(lo: usize, hi: usize) -> Self {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    /// Number of rows; at least 1.
    pub fn size(&self) -> usize {
        self.hi - self.lo + 1
    }

    fn overlaps(&self, other: &Block) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.lo..=self.hi
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Side length of a block for a target partition volume.
///
/// Integer cube root, clamped to at least 1.
pub fn block_size(volume: u64) -> usize {
    let volume = u128::from(volume);
    let mut root = (volume as f64).cbrt() as u128;
    while root > 0 && root * root * root > volume {
        root -= 1;
    }
    while (root + 1) * (root + 1) * (root + 1) <= volume {
        root += 1;
    }
    root.max(1) as usize
}

/// Cuts `[0, n)` into contiguous blocks; the last one may be shorter.
pub fn make_blocks(n: usize, volume: u64) -> Vec<Block> {
    let size = block_size(volume);
    (0..n)
        .step_by(size)
        .map(|lo| Block::new(lo, (lo + size).min(n) - 1))
        .collect()
}

/// Number of tasks [`make_tasks`] yields for `n` rows, without building them.
pub fn task_count(n: usize, volume: u64) -> usize {
    let blocks = n.div_ceil(block_size(volume));
    blocks * (blocks + 1) * (blocks + 2) / 6
}

/// One block-triple to evaluate for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTask {
    model: String,
    seq: usize,
    blocks: [Block; TEAM_SIZE],
}

impl PartitionTask {
    pub fn new(model: impl Into<String>, seq: usize, blocks: [Block; TEAM_SIZE]) -> Self {
        Self {
            model: model.into(),
            seq,
            blocks,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn seq(&self) -> usize {
        self.seq
    }

    pub fn blocks(&self) -> &[Block; TEAM_SIZE] {
        &self.blocks
    }

    /// Store key of the descriptor and of the result: `<model>.<seq>`.
    pub fn name(&self) -> String {
        task_name(&self.model, self.seq)
    }

    /// Highest row any block reaches.
    pub fn max_row(&self) -> usize {
        self.blocks.iter().map(|b| b.hi).max().unwrap_or(0)
    }

    /// Upper bound on the index triples the blocks span.
    pub fn volume(&self) -> u64 {
        self.blocks.iter().map(|b| b.size() as u64).product()
    }

    /// Descriptor table: row 0 holds lower bounds, row 1 inclusive upper bounds.
    pub fn to_table(&self) -> Table {
        Table::from_records(&[
            Bounds(self.blocks.map(|b| b.lo)),
            Bounds(self.blocks.map(|b| b.hi)),
        ])
    }

    /// Decodes a descriptor table for the task named `name`.
    ///
    /// Blocks must be in order, and each pair must be equal or disjoint.
    pub fn from_table(name: &str, table: &Table) -> Result<Self, EngineError> {
        let (model, seq) = parse_task_name(name)?;
        let (Some(lows), Some(highs)) = (table.row(0), table.row(1)) else {
            return Err(EngineError::MissingPartition(name.to_string()));
        };

        let mut blocks = [Block::new(0, 0); TEAM_SIZE];
        for (slot, column) in MEMBER_COLUMNS.iter().enumerate() {
            let lo = row_index(lows.number(column)?, 0, column)?;
            let hi = row_index(highs.number(column)?, 1, column)?;
            if hi < lo {
                return Err(DataError::InvalidValue {
                    row: 1,
                    attribute: column.to_string(),
                    value: hi.to_string(),
                }
                .into());
            }
            blocks[slot] = Block::new(lo, hi);
        }
        for slot in 1..TEAM_SIZE {
            let (prev, block) = (blocks[slot - 1], blocks[slot]);
            if prev != block && (prev > block || prev.overlaps(&block)) {
                return Err(DataError::InvalidValue {
                    row: 0,
                    attribute: MEMBER_COLUMNS[slot].to_string(),
                    value: block.to_string(),
                }
                .into());
            }
        }
        Ok(Self::new(model, seq, blocks))
    }
}

// One descriptor row: a bound per team slot.
struct Bounds([usize; TEAM_SIZE]);

impl Record for Bounds {
    fn columns() -> Vec<String> {
        MEMBER_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn to_cells(&self) -> Vec<Cell> {
        self.0.iter().map(|&bound| Cell::from(bound)).collect()
    }
}

impl fmt::Display for PartitionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name(),
            self.blocks[0],
            self.blocks[1],
            self.blocks[2]
        )
    }
}

fn row_index(value: f64, row: usize, column: &str) -> Result<usize, DataError> {
    if value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(DataError::InvalidValue {
            row,
            attribute: column.to_string(),
            value: value.to_string(),
        })
    }
}

/// All block-triples `b1 ≤ b2 ≤ b3`, numbered from 0 in lexicographic order.
pub fn make_tasks(model: &str, blocks: &[Block]) -> Vec<PartitionTask> {
    let mut tasks = Vec::new();
    for i in 0..blocks.len() {
        for j in i..blocks.len() {
            for k in j..blocks.len() {
                let seq = tasks.len();
                tasks.push(PartitionTask::new(model, seq, [blocks[i], blocks[j], blocks[k]]));
            }
        }
    }
    tasks
}

pub fn task_name(model: &str, seq: usize) -> String {
    format!("{}.{}", model, seq)
}

/// Splits `<model>.<seq>` at the last dot.
pub fn parse_task_name(name: &str) -> Result<(&str, usize), EngineError> {
    name.rsplit_once('.')
        .filter(|(model, _)| !model.is_empty())
        .and_then(|(model, seq)| seq.parse().ok().map(|seq| (model, seq)))
        .ok_or_else(|| EngineError::InvalidTaskName(name.to_string()))
}
