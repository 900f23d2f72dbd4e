//! Error types for the qurro-prep library.

use std::fmt;
use thiserror::Error;

/// Which axis of a table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "row"),
            Axis::Columns => write!(f, "column"),
        }
    }
}

/// A field name that cannot be used in the visualization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameConflict {
    /// A reserved name was used as a column of `table`.
    Reserved { name: String, table: String },
    /// The feature rankings and feature metadata share these column names.
    Shared { names: Vec<String> },
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameConflict::Reserved { name, table } => write!(
                f,
                "The {} can't contain any columns called \"{}\". \
                 Try changing the name of this column.",
                table, name
            ),
            NameConflict::Shared { names } => write!(
                f,
                "Column names for the feature metadata and feature rankings must be distinct \
                 (shared: {}). Try creating a copy of your feature metadata with identical \
                 columns renamed.",
                names.join(", ")
            ),
        }
    }
}

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid count value '{value}' at row {row}, column {col}")]
    InvalidCount {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Invalid ranking value '{value}' at row {row}, column {col}")]
    InvalidRank {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Sample ID mismatch: {0}")]
    SampleMismatch(String),

    #[error("Row \"{id}\" has {actual} value(s), but the header names {expected} column(s)")]
    RaggedRow {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("{axis} index {index} is out of bounds for a table with {len} {axis}(s)")]
    IndexOutOfBounds { axis: Axis, index: usize, len: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("{axis} IDs of the {table} are not unique (\"{id}\" occurs more than once)")]
    DuplicateKey {
        table: String,
        axis: Axis,
        id: String,
    },

    #[error("Less than {min} {axis}(s) found in the {table} (found {actual})")]
    Shape {
        table: String,
        axis: Axis,
        min: usize,
        actual: usize,
    },

    #[error("{0}")]
    ReservedName(NameConflict),

    #[error(
        "Of the {ranked} ranked features, {missing} {} not present in the count table.",
        was_or_were(.missing)
    )]
    UnmatchedFeatures { ranked: usize, missing: usize },

    #[error("No samples are shared between the sample metadata and the count table.")]
    NoSharedSamples,

    #[error("The count table is empty: every sample or every feature contains only zeros.")]
    EmptyTable,

    #[error(
        "Merging feature metadata would duplicate the column \"{name}\". \
         Try creating a copy of your feature metadata with this column renamed."
    )]
    DuplicateColumn { name: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn was_or_were(count: &usize) -> &'static str {
    if *count == 1 {
        "was"
    } else {
        "were"
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, PrepError>;
