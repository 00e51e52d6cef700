//! FastRemap - chained range remapping
//!
//! Pushes seed values or seed ranges through an ordered chain of interval
//! maps and reports the lowest value that comes out the other end.
//!
//! # Features
//!
//! - Ranges are split only at rule boundaries, never enumerated
//! - O(log n) floor/ceiling rule lookup per stage
//! - Parallel resolution of independent input ranges with rayon
//! - Support for compressed almanac files (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use fast_remap::{parse_almanac_file, SeedMode};
//!
//! let almanac = parse_almanac_file("input.txt".as_ref())?;
//! let graph = almanac.graph();
//!
//! let seeds = almanac.seed_ranges(SeedMode::Ranges)?;
//! let lowest = graph.lowest_location(&seeds);
//! ```

pub mod core;

// Re-export commonly used types
pub use core::{
    parse_almanac_bytes, parse_almanac_file, parse_almanac_reader, parse_almanac_str,
    Almanac, AlmanacParseError, MappingRule, RemapError, RemapGraph, SeedMode, Stage,
    StageBlock, ValueRange,
};
