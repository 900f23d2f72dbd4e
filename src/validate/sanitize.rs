//! Rewriting of field names the visualization grammar cannot represent.

use crate::data::Table;
use crate::error::Result;
use crate::validate::unique::ensure_unique;

/// Replace characters that break field access in the rendered charts.
///
/// `.` becomes `:`, `[` and `]` become `(` and `)`, and `'`, `"` and `\`
/// become `|`. Everything else is kept.
pub fn sanitize(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| match c {
            '.' => ':',
            ']' => ')',
            '[' => '(',
            '\'' | '"' | '\\' => '|',
            other => other,
        })
        .collect()
}

/// Sanitize every column ID of `table` in place, then re-check uniqueness,
/// since two distinct names can map to the same sanitized name.
pub fn sanitize_columns<T: Table + ?Sized>(table: &mut T, name: &str) -> Result<()> {
    let columns = table.column_ids().iter().map(|c| sanitize(c)).collect();
    table.set_column_ids(columns)?;
    ensure_unique(&*table, name)
}
