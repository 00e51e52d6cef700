//! Core range remapping functionality
//!
//! This module contains the almanac parser, the per-stage rule lookup,
//! and the recursive range propagation through the stage graph.

mod almanac;
mod error;
mod graph;
pub mod io;
mod range;
mod stage;

pub use almanac::{
    parse_almanac_bytes, parse_almanac_file, parse_almanac_reader, parse_almanac_str,
    Almanac, SeedMode, StageBlock,
};
pub use error::{AlmanacParseError, ParseResult, RemapError, Result};
pub use graph::{split_at_stage, RemapGraph, StageSplit};
pub use io::{detect_compression, CompressionFormat};
pub use range::ValueRange;
pub use stage::{MappingRule, Stage};
