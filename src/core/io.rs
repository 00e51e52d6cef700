//! Input opening
//!
//! Almanacs may arrive gzip or bzip2 compressed. The format is taken from
//! the file extension, falling back to the leading magic bytes.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Buffer size for almanac readers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    Ok(format_from_magic(&magic[..bytes_read]))
}

fn format_from_magic(magic: &[u8]) -> CompressionFormat {
    match magic {
        [0x1f, 0x8b, ..] => CompressionFormat::Gzip,
        // "BZh"
        [0x42, 0x5a, 0x68, ..] => CompressionFormat::Bzip2,
        _ => CompressionFormat::Plain,
    }
}

/// Wrap any byte source in a reader with the almanac buffer size
pub fn buffered<R: Read>(inner: R) -> BufReader<R> {
    BufReader::with_capacity(DEFAULT_BUFFER_SIZE, inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Write};
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_magic_detection() {
        assert_eq!(format_from_magic(&[0x1f, 0x8b, 0x08]), CompressionFormat::Gzip);
        assert_eq!(format_from_magic(b"BZh"), CompressionFormat::Bzip2);
        assert_eq!(format_from_magic(b"see"), CompressionFormat::Plain);
        assert_eq!(format_from_magic(&[0x1f]), CompressionFormat::Plain);
        assert_eq!(format_from_magic(&[]), CompressionFormat::Plain);
    }

    #[test]
    fn test_detect_plain_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"seeds: 1 2\n").unwrap();
        file.flush().unwrap();
        assert_eq!(detect_compression(file.path()).unwrap(), CompressionFormat::Plain);
    }

    #[test]
    fn test_detect_by_extension() {
        // Extension wins even when the content is plain text
        let mut file = Builder::new().suffix(".bz2").tempfile().unwrap();
        file.write_all(b"seeds: 1 2\n").unwrap();
        file.flush().unwrap();
        assert_eq!(detect_compression(file.path()).unwrap(), CompressionFormat::Bzip2);
    }

    #[test]
    fn test_buffered_reads_lines() {
        let reader = buffered(&b"seeds: 1 2\n\nsoil map:\n1 2 3\n"[..]);
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "soil map:");
    }
}
