//! Almanac parsing
//!
//! # Almanac Format
//!
//! ```text
//! seeds: 79 14 55 13
//!
//! seed-to-soil map:
//! 50 98 2
//! 52 50 48
//!
//! soil-to-fertilizer map:
//! 0 15 37
//! ```
//!
//! - The first non-empty line lists the seed values
//! - Each stage block starts with a `<name> map:` header
//! - Rule lines hold `destStart sourceStart length`
//! - A blank line or EOF closes the block

use crate::core::error::{AlmanacParseError, ParseResult};
use crate::core::graph::RemapGraph;
use crate::core::io::{buffered, detect_compression, CompressionFormat};
use crate::core::range::ValueRange;
use crate::core::stage::{MappingRule, Stage};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const SEEDS_PREFIX: &str = "seeds:";
const MAP_SUFFIX: &str = "map:";

/// How the seed header values are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Every value is a single seed
    #[default]
    Points,
    /// Values are `(start, length)` pairs
    Ranges,
}

impl SeedMode {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "points" | "point" | "values" => Some(SeedMode::Points),
            "ranges" | "range" | "pairs" => Some(SeedMode::Ranges),
            _ => None,
        }
    }
}

/// A named block of rules from the almanac
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBlock {
    /// Name before ` map:` (e.g. "seed-to-soil")
    pub name: String,
    /// Rules in file order
    pub rules: Vec<MappingRule>,
}

/// Result of parsing an almanac
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Almanac {
    /// Raw seed header values
    pub seeds: Vec<u64>,
    /// Stage blocks in pipeline order
    pub stages: Vec<StageBlock>,
}

impl Almanac {
    /// Interpret the seed values as input ranges
    pub fn seed_ranges(&self, mode: SeedMode) -> ParseResult<Vec<ValueRange>> {
        match mode {
            SeedMode::Points => Ok(self.seeds.iter().copied().map(ValueRange::point).collect()),
            SeedMode::Ranges => {
                if self.seeds.len() % 2 != 0 {
                    return Err(AlmanacParseError::OddSeedCount {
                        count: self.seeds.len(),
                    });
                }
                self.seeds
                    .chunks_exact(2)
                    .map(|pair| {
                        let (start, length) = (pair[0], pair[1]);
                        ValueRange::checked(start, length)
                            .ok_or(AlmanacParseError::SeedOverflow { start, length })
                    })
                    .collect()
            }
        }
    }

    /// Build the remap graph from the stage blocks
    pub fn graph(&self) -> RemapGraph {
        let stages = self
            .stages
            .iter()
            .enumerate()
            .map(|(index, block)| {
                log::debug!(
                    "stage {} '{}': {} rules",
                    index,
                    block.name,
                    block.rules.len()
                );
                Stage::new(index, block.rules.iter().copied()).with_name(block.name.clone())
            })
            .collect();
        RemapGraph::new(stages)
    }

    /// Total number of rules across all blocks
    pub fn total_rules(&self) -> usize {
        self.stages.iter().map(|b| b.rules.len()).sum()
    }
}

fn parse_number(token: &str, field: &'static str, line: usize) -> ParseResult<u64> {
    token.parse::<u64>().map_err(|_| AlmanacParseError::InvalidNumber {
        line,
        field,
        value: token.to_string(),
    })
}

/// Parse the `seeds:` header line
fn parse_seed_line(line: &str, line_number: usize) -> ParseResult<Vec<u64>> {
    let values = line
        .strip_prefix(SEEDS_PREFIX)
        .ok_or(AlmanacParseError::MissingSeeds)?;

    let seeds = values
        .split_whitespace()
        .map(|token| parse_number(token, "seed", line_number))
        .collect::<ParseResult<Vec<u64>>>()?;

    if seeds.is_empty() {
        return Err(AlmanacParseError::EmptySeeds { line: line_number });
    }
    Ok(seeds)
}

/// Parse a `destStart sourceStart length` rule line
fn parse_rule_line(line: &str, line_number: usize) -> ParseResult<MappingRule> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(AlmanacParseError::InvalidRuleLine {
            line: line_number,
            message: format!("Expected 3 fields, got {}", fields.len()),
        });
    }

    let dest_start = parse_number(fields[0], "destination start", line_number)?;
    let source_start = parse_number(fields[1], "source start", line_number)?;
    let length = parse_number(fields[2], "length", line_number)?;

    if length == 0 {
        return Err(AlmanacParseError::InvalidRuleLine {
            line: line_number,
            message: "Rule length must be greater than 0".to_string(),
        });
    }

    MappingRule::checked(source_start, dest_start, length).ok_or_else(|| {
        AlmanacParseError::InvalidCoordinates {
            line: line_number,
            message: format!(
                "Rule (dest {}, source {}, length {}) overflows 64 bits",
                dest_start, source_start, length
            ),
        }
    })
}

/// Parse an almanac from a reader
pub fn parse_almanac_reader<R: BufRead>(reader: R) -> ParseResult<Almanac> {
    let mut seeds: Option<Vec<u64>> = None;
    let mut stages: Vec<StageBlock> = Vec::new();
    let mut current: Option<StageBlock> = None;

    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // Blank line closes the open block
            if let Some(block) = current.take() {
                stages.push(block);
            }
            continue;
        }

        if seeds.is_none() {
            seeds = Some(parse_seed_line(trimmed, line_number)?);
            continue;
        }

        if let Some(name) = trimmed.strip_suffix(MAP_SUFFIX) {
            if let Some(block) = current.take() {
                stages.push(block);
            }
            current = Some(StageBlock {
                name: name.trim().to_string(),
                rules: Vec::new(),
            });
        } else if let Some(ref mut block) = current {
            block.rules.push(parse_rule_line(trimmed, line_number)?);
        } else {
            log::warn!("Skipping line {} outside any map block: {}", line_number, trimmed);
        }
    }

    if let Some(block) = current.take() {
        stages.push(block);
    }

    let seeds = seeds.ok_or(AlmanacParseError::MissingSeeds)?;
    if stages.is_empty() {
        return Err(AlmanacParseError::NoStages);
    }

    Ok(Almanac { seeds, stages })
}

/// Parse an almanac from a path
///
/// Automatically detects and handles compression:
/// - .gz extension or gzip magic bytes (1f 8b)
/// - .bz2 extension or bzip2 magic bytes (42 5a 68)
/// - Plain text otherwise
pub fn parse_almanac_file(path: &Path) -> ParseResult<Almanac> {
    if !path.exists() {
        return Err(AlmanacParseError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    match detect_compression(path)? {
        CompressionFormat::Gzip => parse_almanac_reader(buffered(flate2::read::GzDecoder::new(file))),
        CompressionFormat::Bzip2 => parse_almanac_reader(buffered(bzip2::read::BzDecoder::new(file))),
        CompressionFormat::Plain => parse_almanac_reader(buffered(file)),
    }
}

/// Parse an almanac from bytes
pub fn parse_almanac_bytes(data: &[u8]) -> ParseResult<Almanac> {
    parse_almanac_reader(BufReader::new(data))
}

/// Parse an almanac from a string
pub fn parse_almanac_str(input: &str) -> ParseResult<Almanac> {
    parse_almanac_bytes(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15
";

    #[test]
    fn test_parse_example() {
        let almanac = parse_almanac_str(EXAMPLE).unwrap();
        assert_eq!(almanac.seeds, vec![79, 14, 55, 13]);
        assert_eq!(almanac.stages.len(), 2);
        assert_eq!(almanac.stages[0].name, "seed-to-soil");
        assert_eq!(almanac.stages[1].name, "soil-to-fertilizer");
        assert_eq!(almanac.stages[0].rules[0], MappingRule::new(98, 50, 2));
        assert_eq!(almanac.total_rules(), 5);
    }

    #[test]
    fn test_graph_from_almanac() {
        let almanac = parse_almanac_str(EXAMPLE).unwrap();
        let graph = almanac.graph();
        assert_eq!(graph.stage_count(), 2);
        assert_eq!(graph.stages()[1].name(), Some("soil-to-fertilizer"));
        // 79 -> 81 -> 81
        assert_eq!(graph.map_value(79), 81);
        // 14 -> 14 -> 53
        assert_eq!(graph.map_value(14), 53);
    }

    #[test]
    fn test_seed_modes() {
        let almanac = parse_almanac_str(EXAMPLE).unwrap();

        let points = almanac.seed_ranges(SeedMode::Points).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], ValueRange::point(79));

        let ranges = almanac.seed_ranges(SeedMode::Ranges).unwrap();
        assert_eq!(ranges, vec![ValueRange::new(79, 14), ValueRange::new(55, 13)]);
    }

    #[test]
    fn test_odd_seed_count() {
        let almanac = parse_almanac_str("seeds: 1 2 3\n\na-to-b map:\n1 2 3\n").unwrap();
        let err = almanac.seed_ranges(SeedMode::Ranges).unwrap_err();
        assert!(matches!(err, AlmanacParseError::OddSeedCount { count: 3 }));
        // Point mode still accepts it
        assert_eq!(almanac.seed_ranges(SeedMode::Points).unwrap().len(), 3);
    }

    #[test]
    fn test_seed_range_overflow() {
        let input = format!("seeds: {} 2\n\na-to-b map:\n1 2 3\n", u64::MAX);
        let almanac = parse_almanac_str(&input).unwrap();
        assert!(matches!(
            almanac.seed_ranges(SeedMode::Ranges),
            Err(AlmanacParseError::SeedOverflow { .. })
        ));
    }

    #[test]
    fn test_missing_seeds() {
        let err = parse_almanac_str("seed-to-soil map:\n50 98 2\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::MissingSeeds));

        let err = parse_almanac_str("").unwrap_err();
        assert!(matches!(err, AlmanacParseError::MissingSeeds));
    }

    #[test]
    fn test_empty_seeds() {
        let err = parse_almanac_str("seeds:\n\na-to-b map:\n1 2 3\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::EmptySeeds { line: 1 }));
    }

    #[test]
    fn test_no_stages() {
        let err = parse_almanac_str("seeds: 1 2\n\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::NoStages));
    }

    #[test]
    fn test_invalid_rule_field_count() {
        let err = parse_almanac_str("seeds: 1\n\na-to-b map:\n1 2\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::InvalidRuleLine { line: 4, .. }));
    }

    #[test]
    fn test_invalid_rule_number() {
        let err = parse_almanac_str("seeds: 1\n\na-to-b map:\n1 x 3\n").unwrap_err();
        match err {
            AlmanacParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 4);
                assert_eq!(field, "source start");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_seed_number() {
        let err = parse_almanac_str("seeds: 1 -2\n\na-to-b map:\n1 2 3\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::InvalidNumber { line: 1, field: "seed", .. }));
    }

    #[test]
    fn test_zero_length_rule() {
        let err = parse_almanac_str("seeds: 1\n\na-to-b map:\n1 2 0\n").unwrap_err();
        assert!(matches!(err, AlmanacParseError::InvalidRuleLine { line: 4, .. }));
    }

    #[test]
    fn test_rule_overflow() {
        let input = format!("seeds: 1\n\na-to-b map:\n{} 0 2\n", u64::MAX);
        let err = parse_almanac_str(&input).unwrap_err();
        assert!(matches!(err, AlmanacParseError::InvalidCoordinates { line: 4, .. }));
    }

    #[test]
    fn test_empty_block_and_trailing_block() {
        let input = "seeds: 5\n\na-to-b map:\n\nb-to-c map:\n0 5 1";
        let almanac = parse_almanac_str(input).unwrap();
        assert_eq!(almanac.stages.len(), 2);
        assert!(almanac.stages[0].rules.is_empty());
        assert_eq!(almanac.stages[1].rules.len(), 1);
        assert_eq!(almanac.graph().map_value(5), 0);
    }

    #[test]
    fn test_stray_lines_skipped() {
        let input = "seeds: 5\nsome note\n\na-to-b map:\n0 5 1\n";
        let almanac = parse_almanac_str(input).unwrap();
        assert_eq!(almanac.stages.len(), 1);
    }

    #[test]
    fn test_seed_mode_from_str() {
        assert_eq!(SeedMode::from_str("points"), Some(SeedMode::Points));
        assert_eq!(SeedMode::from_str("RANGES"), Some(SeedMode::Ranges));
        assert_eq!(SeedMode::from_str("pairs"), Some(SeedMode::Ranges));
        assert_eq!(SeedMode::from_str("bogus"), None);
    }

    #[test]
    fn test_file_not_found() {
        let err = parse_almanac_file(Path::new("/nonexistent/almanac.txt")).unwrap_err();
        assert!(matches!(err, AlmanacParseError::FileNotFound(_)));
    }
}
