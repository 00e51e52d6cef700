//! Chained range remapping
//!
//! Pushes value ranges through an ordered list of stages. At each stage a
//! range is split against the stage's rules:
//! 1. The part covered by a rule is shifted and advanced to the next stage
//! 2. Uncovered parts on either side are checked again at the same stage
//! 3. A range touching no rule passes through unchanged
//!
//! Only boundary fragments are tracked, so ranges spanning billions of
//! values resolve in time proportional to the number of rules they cross.

use crate::core::error::{RemapError, Result};
use crate::core::range::ValueRange;
use crate::core::stage::Stage;
use rayon::prelude::*;

/// Outcome of splitting a range against one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSplit {
    /// Translated (or passed-through) part, bound for the next stage
    pub advanced: ValueRange,
    /// Uncovered part before the matched rule, re-checked at this stage
    pub left: Option<ValueRange>,
    /// Part past the matched rule, re-checked at this stage
    pub right: Option<ValueRange>,
}

/// Split a non-empty range against the rules of a stage
///
/// Looks at the floor rule first: if the range starts inside it, the covered
/// prefix is translated and the rest becomes the right remainder. Otherwise
/// the ceiling rule is tried; if the range reaches it, the part before it is
/// the left remainder, the covered part is translated and anything past the
/// rule's end is the right remainder. With neither, the whole range advances
/// unchanged.
pub fn split_at_stage(stage: &Stage, range: ValueRange) -> StageSplit {
    let end = range.end();

    if let Some(floor) = stage.floor(range.start) {
        if floor.source_end() > range.start {
            let overlap_end = floor.source_end().min(end);
            return StageSplit {
                advanced: ValueRange::new(
                    floor.translate(range.start),
                    overlap_end - range.start,
                ),
                left: None,
                right: ValueRange::between(overlap_end, end),
            };
        }
    }

    if let Some(ceiling) = stage.ceiling(range.start) {
        if ceiling.source_start < end {
            let overlap_end = ceiling.source_end().min(end);
            return StageSplit {
                advanced: ValueRange::new(
                    ceiling.dest_start,
                    overlap_end - ceiling.source_start,
                ),
                left: ValueRange::between(range.start, ceiling.source_start),
                right: ValueRange::between(ceiling.source_end(), end),
            };
        }
    }

    StageSplit {
        advanced: range,
        left: None,
        right: None,
    }
}

/// An ordered pipeline of remap stages
///
/// Built once from an almanac, then queried read-only. Safe to share across
/// threads.
#[derive(Debug, Default)]
pub struct RemapGraph {
    stages: Vec<Stage>,
}

impl RemapGraph {
    /// Create a graph from stages in pipeline order
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Stages in pipeline order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Total number of rules across all stages
    pub fn total_rules(&self) -> usize {
        self.stages.iter().map(Stage::len).sum()
    }

    /// Lowest final value reachable from `range` entering at `stage_index`
    ///
    /// Returns `None` for an empty range. A `stage_index` equal to the
    /// number of stages means the range has already passed every stage.
    ///
    /// Remainders left at a stage are drained from a work stack, so the
    /// recursion depth is bounded by the stage count, not by the number of
    /// rules a range crosses.
    pub fn resolve(&self, range: ValueRange, stage_index: usize) -> Option<u64> {
        if range.is_empty() {
            return None;
        }
        let Some(stage) = self.stages.get(stage_index) else {
            return Some(range.start);
        };

        let mut lowest = None;
        let mut pending = vec![range];
        while let Some(fragment) = pending.pop() {
            let split = split_at_stage(stage, fragment);
            let advanced = self.resolve(split.advanced, stage_index + 1);
            lowest = [lowest, advanced].into_iter().flatten().min();
            pending.extend(split.left);
            pending.extend(split.right);
        }
        lowest
    }

    /// Lowest final value over all input ranges
    ///
    /// # Examples
    /// ```
    /// use fast_remap::{MappingRule, RemapGraph, Stage, ValueRange};
    ///
    /// let stage = Stage::new(0, [MappingRule::new(98, 50, 2), MappingRule::new(50, 52, 48)]);
    /// let graph = RemapGraph::new(vec![stage]);
    ///
    /// let seeds = [ValueRange::point(79), ValueRange::point(14)];
    /// assert_eq!(graph.lowest_location(&seeds), Some(14));
    /// ```
    pub fn lowest_location(&self, ranges: &[ValueRange]) -> Option<u64> {
        ranges
            .iter()
            .filter_map(|range| self.resolve(*range, 0))
            .min()
    }

    /// Same as [`RemapGraph::lowest_location`], resolving ranges on a rayon
    /// pool of `threads` workers
    pub fn lowest_location_parallel(
        &self,
        ranges: &[ValueRange],
        threads: usize,
    ) -> Result<Option<u64>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| RemapError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| {
            ranges
                .par_iter()
                .filter_map(|range| self.resolve(*range, 0))
                .min()
        }))
    }

    /// Map a single value through every stage
    pub fn map_value(&self, value: u64) -> u64 {
        self.stages
            .iter()
            .fold(value, |current, stage| stage.map_value(current))
    }

    /// Every range `range` turns into after the last stage
    ///
    /// The output lengths always add up to the input length. Output order
    /// follows the split order, not value order.
    pub fn map_range(&self, range: ValueRange) -> Vec<ValueRange> {
        let mut out = Vec::new();
        self.collect_range(range, 0, &mut out);
        out
    }

    fn collect_range(&self, range: ValueRange, stage_index: usize, out: &mut Vec<ValueRange>) {
        if range.is_empty() {
            return;
        }
        let Some(stage) = self.stages.get(stage_index) else {
            out.push(range);
            return;
        };

        let mut pending = vec![range];
        while let Some(fragment) = pending.pop() {
            let split = split_at_stage(stage, fragment);
            self.collect_range(split.advanced, stage_index + 1, out);
            pending.extend(split.left);
            pending.extend(split.right);
        }
    }
}
