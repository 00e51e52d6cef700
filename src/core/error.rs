//! Error types for FastRemap
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FastRemap operations
#[derive(Debug, Error)]
pub enum RemapError {
    /// Almanac parsing errors
    #[error("Almanac parse error: {0}")]
    Parse(#[from] AlmanacParseError),

    /// Worker pool could not be built
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing an almanac
///
/// Every variant tied to a line carries its 1-based line number.
#[derive(Debug, Error)]
pub enum AlmanacParseError {
    /// The input has no `seeds:` header line
    #[error("Missing 'seeds:' header line")]
    MissingSeeds,

    /// The `seeds:` header is present but lists no values
    #[error("Seed line at line {line} lists no values")]
    EmptySeeds { line: usize },

    /// Seed values must come in `(start, length)` pairs in range mode
    #[error("Seed ranges need an even number of values, got {count}")]
    OddSeedCount { count: usize },

    /// A seed range whose end does not fit in 64 bits
    #[error("Seed range starting at {start} with length {length} overflows")]
    SeedOverflow { start: u64, length: u64 },

    /// Invalid rule line format
    #[error("Invalid rule line at line {line}: {message}")]
    InvalidRuleLine { line: usize, message: String },

    /// Failed to parse integer
    #[error("Failed to parse {field} '{value}' at line {line}: expected a non-negative integer")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Rule coordinates do not fit in 64 bits
    #[error("Invalid coordinates at line {line}: {message}")]
    InvalidCoordinates { line: usize, message: String },

    /// The almanac has no stage blocks
    #[error("Almanac contains no stage blocks")]
    NoStages,

    /// File not found
    #[error("Almanac file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlmanacParseError {
    /// Line number the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptySeeds { line }
            | Self::InvalidRuleLine { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidCoordinates { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias for FastRemap operations
pub type Result<T> = std::result::Result<T, RemapError>;

/// Result type alias for almanac parsing operations
pub type ParseResult<T> = std::result::Result<T, AlmanacParseError>;
