//! Error types for the session core.

/// The play-field cannot hold a target of the configured size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {field_width}x{field_height} cannot hold a target of size {target_size}")]
pub struct PlacementError {
    pub field_width: u32,
    pub field_height: u32,
    pub target_size: u32,
}

/// Failures reading from or writing to a score store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be opened, written or flushed.
    #[error("score store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The csv layer failed below the record level (bad quoting, short rows).
    #[error("score store is unreadable: {0}")]
    Csv(#[from] csv::Error),

    /// A stored row parsed as csv but not as a score record.
    /// `row` is 1-based and does not count the header.
    #[error("malformed score record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },
}

/// Errors that stop a session from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session configuration: {0}")]
    InvalidBounds(#[from] PlacementError),

    #[error("session duration must be positive, got {0}s")]
    InvalidDuration(f64),
}
