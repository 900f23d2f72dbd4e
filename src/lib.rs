//! Table reconciliation for rank-ratio visualization.
//!
//! Prepares a feature × sample count table, feature rankings, sample metadata
//! and optional feature metadata for rendering. The tables come from
//! different pipelines, so they are validated, matched against each other and
//! pruned into one consistent, uniquely-keyed set before anything is drawn.
//!
//! # Overview
//!
//! - **data**: Table types (sparse and dense count tables, rankings, metadata)
//! - **validate**: ID uniqueness, minimum shape, reserved names, name sanitizing
//! - **align**: Matching the table with rankings and metadata, pruning empties
//! - **merge**: Feature metadata merged onto the rankings
//! - **export**: Sparse count mappings for serialization
//! - **report**: Non-fatal diagnostics
//! - **pipeline**: The whole run, end to end
//!
//! # Example
//!
//! ```no_run
//! use qurro_prep::prelude::*;
//!
//! let table = SparseCountTable::from_tsv("table.tsv").unwrap();
//! let ranks = FeatureRanks::from_tsv("differentials.tsv").unwrap();
//! let sample_metadata = Metadata::from_tsv("sample-metadata.tsv").unwrap();
//!
//! let mut notices: Vec<Notice> = Vec::new();
//! let reconciled = Reconciler::new()
//!     .run(table, ranks, sample_metadata, None, &mut notices)
//!     .unwrap();
//! println!("{}", reconciled.to_json().unwrap());
//! ```

pub mod align;
pub mod data;
pub mod error;
pub mod export;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod validate;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::align::{match_table_and_data, remove_empty_samples_and_features};
    pub use crate::data::{
        CountDict, CountTable, DenseCountTable, FeatureRanks, Metadata, SparseCountTable, Table,
        Variable,
    };
    pub use crate::error::{Axis, NameConflict, PrepError, Result};
    pub use crate::export::{sparsify, sparsify_count_dict};
    pub use crate::merge::merge_feature_metadata;
    pub use crate::pipeline::{MinShape, ReconcileConfig, Reconciled, Reconciler};
    pub use crate::report::{DiagnosticSink, Item, Level, Notice, NullSink, StderrSink};
    pub use crate::validate::{
        check_reserved_names, ensure_unique, sanitize, sanitize_columns, validate_shape,
        RESERVED_NAMES,
    };
}
