//! Stage rule lookup
//!
//! Each stage keeps its mapping rules in a rust-lapper index sorted by
//! source start, so floor/ceiling lookups are binary searches.

use crate::core::range::ValueRange;
use rust_lapper::{Interval, Lapper};

/// A single `(source, destination, length)` shift rule
///
/// Any value `v` in `[source_start, source_start + length)` maps to
/// `v - source_start + dest_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingRule {
    /// Source start (inclusive)
    pub source_start: u64,
    /// Destination start (inclusive)
    pub dest_start: u64,
    /// Number of values covered
    pub length: u64,
}

impl MappingRule {
    /// Create a rule
    ///
    /// Callers building rules from untrusted input should go through
    /// [`MappingRule::checked`].
    pub fn new(source_start: u64, dest_start: u64, length: u64) -> Self {
        Self {
            source_start,
            dest_start,
            length,
        }
    }

    /// Create a rule, returning `None` if either end overflows a `u64`
    pub fn checked(source_start: u64, dest_start: u64, length: u64) -> Option<Self> {
        source_start.checked_add(length)?;
        dest_start.checked_add(length)?;
        Some(Self::new(source_start, dest_start, length))
    }

    /// Exclusive end of the source interval
    pub fn source_end(&self) -> u64 {
        self.source_start + self.length
    }

    /// Exclusive end of the destination interval
    pub fn dest_end(&self) -> u64 {
        self.dest_start + self.length
    }

    /// The source interval as a range
    pub fn source_range(&self) -> ValueRange {
        ValueRange::new(self.source_start, self.length)
    }

    /// Check if a source value is covered by this rule
    pub fn covers(&self, value: u64) -> bool {
        value >= self.source_start && value < self.source_end()
    }

    /// Shift a covered source value to its destination
    ///
    /// `value` must lie inside the source interval.
    pub fn translate(&self, value: u64) -> u64 {
        debug_assert!(self.covers(value), "{} outside rule source", value);
        self.dest_start + (value - self.source_start)
    }

    fn to_interval(self) -> Interval<u64, u64> {
        Interval {
            start: self.source_start,
            stop: self.source_end(),
            val: self.dest_start,
        }
    }

    fn from_interval(iv: &Interval<u64, u64>) -> Self {
        Self::new(iv.start, iv.val, iv.stop - iv.start)
    }
}

/// One level of the remap pipeline
///
/// Holds the disjoint rules of a single stage. Built once, then queried
/// read-only.
pub struct Stage {
    /// Position of the stage in the pipeline (0-based)
    index: usize,
    /// Stage name from the almanac header (e.g. "seed-to-soil")
    name: Option<String>,
    /// Source interval -> destination start
    rules: Lapper<u64, u64>,
}

impl Stage {
    /// Build a stage from its rules
    ///
    /// `Lapper::new` orders the rules by source start, ties broken by end.
    pub fn new<I>(index: usize, rules: I) -> Self
    where
        I: IntoIterator<Item = MappingRule>,
    {
        let intervals: Vec<Interval<u64, u64>> =
            rules.into_iter().map(MappingRule::to_interval).collect();

        Self {
            index,
            name: None,
            rules: Lapper::new(intervals),
        }
    }

    /// Attach the almanac name to the stage
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Position in the pipeline
    pub fn index(&self) -> usize {
        self.index
    }

    /// Almanac name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the stage has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in source order
    pub fn rules(&self) -> impl Iterator<Item = MappingRule> + '_ {
        self.rules.intervals.iter().map(MappingRule::from_interval)
    }

    /// Rule with the greatest source start `<= value`
    ///
    /// # Examples
    /// ```
    /// use fast_remap::{MappingRule, Stage};
    ///
    /// let stage = Stage::new(0, [MappingRule::new(50, 52, 48), MappingRule::new(98, 50, 2)]);
    /// assert_eq!(stage.floor(79).map(|r| r.source_start), Some(50));
    /// assert_eq!(stage.floor(98).map(|r| r.source_start), Some(98));
    /// assert_eq!(stage.floor(14), None);
    /// ```
    pub fn floor(&self, value: u64) -> Option<MappingRule> {
        let intervals = &self.rules.intervals;
        let idx = intervals.partition_point(|iv| iv.start <= value);
        idx.checked_sub(1)
            .map(|i| MappingRule::from_interval(&intervals[i]))
    }

    /// Rule with the smallest source start `>= value`
    ///
    /// # Examples
    /// ```
    /// use fast_remap::{MappingRule, Stage};
    ///
    /// let stage = Stage::new(0, [MappingRule::new(50, 52, 48), MappingRule::new(98, 50, 2)]);
    /// assert_eq!(stage.ceiling(14).map(|r| r.source_start), Some(50));
    /// assert_eq!(stage.ceiling(79).map(|r| r.source_start), Some(98));
    /// assert_eq!(stage.ceiling(99), None);
    /// ```
    pub fn ceiling(&self, value: u64) -> Option<MappingRule> {
        let intervals = &self.rules.intervals;
        let idx = intervals.partition_point(|iv| iv.start < value);
        intervals.get(idx).map(MappingRule::from_interval)
    }

    /// Rules whose source interval intersects `range`, in source order
    pub fn overlapping(&self, range: ValueRange) -> Vec<MappingRule> {
        if range.is_empty() {
            return vec![];
        }
        let mut found: Vec<MappingRule> = self
            .rules
            .find(range.start, range.end())
            .map(MappingRule::from_interval)
            .collect();
        found.sort_by_key(|r| (r.source_start, r.length));
        found
    }

    /// Map a single value through this stage
    ///
    /// Values outside every rule pass through unchanged.
    pub fn map_value(&self, value: u64) -> u64 {
        match self.floor(value) {
            Some(rule) if rule.covers(value) => rule.translate(value),
            _ => value,
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("rules", &self.rules().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_stage() -> Stage {
        // seed-to-soil from the worked example
        Stage::new(0, [MappingRule::new(98, 50, 2), MappingRule::new(50, 52, 48)])
            .with_name("seed-to-soil")
    }

    #[test]
    fn test_stage_creation() {
        let stage = create_test_stage();
        assert_eq!(stage.len(), 2);
        assert_eq!(stage.index(), 0);
        assert_eq!(stage.name(), Some("seed-to-soil"));

        let starts: Vec<u64> = stage.rules().map(|r| r.source_start).collect();
        assert_eq!(starts, vec![50, 98]);
    }

    #[test]
    fn test_floor_ceiling_on_boundaries() {
        let stage = create_test_stage();

        assert_eq!(stage.floor(50).unwrap().source_start, 50);
        assert_eq!(stage.ceiling(50).unwrap().source_start, 50);

        assert_eq!(stage.floor(97).unwrap().source_start, 50);
        assert_eq!(stage.ceiling(97).unwrap().source_start, 98);

        assert_eq!(stage.floor(1000).unwrap().source_start, 98);
        assert!(stage.ceiling(1000).is_none());

        assert!(stage.floor(0).is_none());
        assert_eq!(stage.ceiling(0).unwrap().source_start, 50);
    }

    #[test]
    fn test_empty_stage() {
        let stage = Stage::new(3, Vec::<MappingRule>::new());
        assert!(stage.is_empty());
        assert!(stage.floor(10).is_none());
        assert!(stage.ceiling(10).is_none());
        assert_eq!(stage.map_value(10), 10);
        assert!(stage.overlapping(ValueRange::new(0, 100)).is_empty());
    }

    #[test]
    fn test_map_value() {
        let stage = create_test_stage();
        assert_eq!(stage.map_value(79), 81);
        assert_eq!(stage.map_value(14), 14);
        assert_eq!(stage.map_value(55), 57);
        assert_eq!(stage.map_value(13), 13);
        assert_eq!(stage.map_value(98), 50);
        assert_eq!(stage.map_value(99), 51);
        assert_eq!(stage.map_value(100), 100);
    }

    #[test]
    fn test_overlapping() {
        let stage = create_test_stage();

        let found = stage.overlapping(ValueRange::new(90, 20));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].source_start, 50);
        assert_eq!(found[1].source_start, 98);

        assert!(stage.overlapping(ValueRange::new(0, 50)).is_empty());
        assert!(stage.overlapping(ValueRange::new(60, 0)).is_empty());
    }

    #[test]
    fn test_rule_translate() {
        let rule = MappingRule::new(50, 52, 48);
        assert_eq!(rule.source_end(), 98);
        assert_eq!(rule.dest_end(), 100);
        assert!(rule.covers(50));
        assert!(!rule.covers(98));
        assert_eq!(rule.translate(79), 81);
        assert_eq!(rule.source_range(), ValueRange::new(50, 48));
    }

    #[test]
    fn test_rule_checked() {
        assert!(MappingRule::checked(u64::MAX - 1, 0, 2).is_none());
        assert!(MappingRule::checked(0, u64::MAX, 1).is_none());
        assert!(MappingRule::checked(u64::MAX - 1, 0, 1).is_some());
    }
}
