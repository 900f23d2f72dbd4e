//! Identifier uniqueness and minimum-shape checks.

use crate::data::Table;
use crate::error::{Axis, PrepError, Result};
use std::collections::HashSet;

/// Fail if the row IDs, then the column IDs, of `table` are not unique.
///
/// Rows are checked first, so a table with both kinds of duplicate reports
/// the row duplicate.
pub fn ensure_unique<T: Table + ?Sized>(table: &T, name: &str) -> Result<()> {
    if let Some(id) = first_duplicate(table.row_ids()) {
        return Err(PrepError::DuplicateKey {
            table: name.to_string(),
            axis: Axis::Rows,
            id: id.to_string(),
        });
    }
    if let Some(id) = first_duplicate(table.column_ids()) {
        return Err(PrepError::DuplicateKey {
            table: name.to_string(),
            axis: Axis::Columns,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// [`ensure_unique`], then require at least `min_rows` rows and `min_cols`
/// columns.
pub fn validate_shape<T: Table + ?Sized>(
    table: &T,
    name: &str,
    min_rows: usize,
    min_cols: usize,
) -> Result<()> {
    ensure_unique(table, name)?;
    if table.n_rows() < min_rows {
        return Err(PrepError::Shape {
            table: name.to_string(),
            axis: Axis::Rows,
            min: min_rows,
            actual: table.n_rows(),
        });
    }
    if table.n_columns() < min_cols {
        return Err(PrepError::Shape {
            table: name.to_string(),
            axis: Axis::Columns,
            min: min_cols,
            actual: table.n_columns(),
        });
    }
    Ok(())
}

fn first_duplicate(ids: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().map(String::as_str).find(|id| !seen.insert(*id))
}
