//! Error types for the DTM merge crate.

use thiserror::Error;

/// Errors that can occur when loading, merging or writing DTM tiles.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No datasets to merge.
    #[error("No datasets found: {0}")]
    EmptyInput(String),

    /// A header field is absent, duplicated or unparsable.
    #[error("Header field '{field}' missing or malformed in {source_name}: {reason}")]
    HeaderFieldMissingOrMalformed {
        /// Name of the offending field, per the configured convention.
        field: String,
        /// File (or other source) the header came from.
        source_name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Grid data does not match the shape announced by the header.
    #[error("Malformed grid in {source_name}: {reason}")]
    MalformedGrid {
        /// File (or other source) the grid came from.
        source_name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A token could not be read as a number.
    #[error("Invalid numeric token '{0}'")]
    InvalidNumber(String),

    /// Two datasets share one identifier.
    #[error("Duplicate dataset identifier '{0}'")]
    DuplicateDataset(String),

    /// A dataset identifier does not name a loaded dataset.
    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    /// Tiles report differing cell sizes.
    #[error("Inconsistent cell size: tile '{tile}' has {found}, expected {expected}")]
    InconsistentCellSize {
        /// Identifier of the first tile that disagrees.
        tile: String,
        /// Cell size of the first tile.
        expected: f64,
        /// Cell size of the disagreeing tile.
        found: f64,
    },

    /// Aggregated statistics would lead to a division by zero.
    #[error("Degenerate statistics: {0}")]
    DegenerateStatistics(String),

    /// A placement index falls outside the output canvas.
    #[error("Tile '{tile}' maps to canvas cell ({row}, {col}) outside {height}x{width} canvas")]
    OutOfBounds {
        /// Identifier of the tile being placed.
        tile: String,
        /// Offending canvas row.
        row: i64,
        /// Offending canvas column.
        col: i64,
        /// Canvas height in rows.
        height: usize,
        /// Canvas width in columns.
        width: usize,
    },
}
