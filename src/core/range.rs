//! Half-open value ranges

/// A half-open range of values `[start, start + length)`
///
/// A zero-length range is degenerate: it maps to nothing and is dropped
/// wherever it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRange {
    /// First value in the range
    pub start: u64,
    /// Number of values in the range
    pub length: u64,
}

impl ValueRange {
    /// Create a range from a start and a length
    ///
    /// The caller guarantees `start + length` fits in a `u64`; use
    /// [`ValueRange::checked`] for untrusted input.
    pub fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    /// Create a range, returning `None` if its end would overflow
    pub fn checked(start: u64, length: u64) -> Option<Self> {
        start.checked_add(length).map(|_| Self { start, length })
    }

    /// Create the range `[start, end)`, or `None` if it would be empty
    ///
    /// # Examples
    /// ```
    /// use fast_remap::ValueRange;
    /// assert_eq!(ValueRange::between(5, 8), Some(ValueRange::new(5, 3)));
    /// assert_eq!(ValueRange::between(8, 8), None);
    /// assert_eq!(ValueRange::between(9, 8), None);
    /// ```
    pub fn between(start: u64, end: u64) -> Option<Self> {
        (end > start).then(|| Self::new(start, end - start))
    }

    /// A single-value range
    pub fn point(value: u64) -> Self {
        Self::new(value, 1)
    }

    /// Exclusive end of the range
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    /// Check if the range is degenerate
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if a value falls inside the range
    pub fn contains(&self, value: u64) -> bool {
        value >= self.start && value < self.end()
    }

    /// Move the range so that it begins at `new_start`, keeping its length
    pub fn moved_to(&self, new_start: u64) -> Self {
        Self::new(new_start, self.length)
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
