//! Validation of table identifiers and field names.

pub mod names;
pub mod sanitize;
pub mod unique;

pub use names::{
    check_reserved_names, RESERVED_FEATURE_FIELDS, RESERVED_NAMES, RESERVED_SAMPLE_FIELDS,
};
pub use sanitize::{sanitize, sanitize_columns};
pub use unique::{ensure_unique, validate_shape};
