//! Table abstractions shared by every pipeline stage.

use crate::error::{Axis, PrepError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Nested `feature ID -> sample ID -> count` mapping.
pub type CountDict = BTreeMap<String, BTreeMap<String, f64>>;

/// A rectangular table keyed by row and column identifiers.
///
/// Identifiers are not required to be unique by construction; use
/// [`crate::validate::ensure_unique`] to enforce that.
pub trait Table {
    /// Row identifiers in order.
    fn row_ids(&self) -> &[String];

    /// Column identifiers in order.
    fn column_ids(&self) -> &[String];

    /// Replace the column identifiers, keeping the values in place.
    fn set_column_ids(&mut self, ids: Vec<String>) -> Result<()>;

    /// Number of rows.
    fn n_rows(&self) -> usize {
        self.row_ids().len()
    }

    /// Number of columns.
    fn n_columns(&self) -> usize {
        self.column_ids().len()
    }
}

/// A feature × sample table of non-negative counts.
///
/// Rows are features and columns are samples. Implementations differ only in
/// how the values are stored; every pipeline stage is written against this
/// trait.
pub trait CountTable: Table + Sized {
    /// Get the value at (row, col), returning 0 for entries not stored.
    fn get(&self, row: usize, col: usize) -> f64;

    /// All entries whose value is not exactly zero, as (row, col, value).
    fn nonzero_entries(&self) -> Vec<(usize, usize, f64)>;

    /// Build a table of the same representation holding only the given rows
    /// and columns (by index), in the given order.
    fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self>;

    /// Number of entries that are not exactly zero.
    fn nnz(&self) -> usize {
        self.nonzero_entries().len()
    }

    /// Feature identifiers (row names).
    fn feature_ids(&self) -> &[String] {
        self.row_ids()
    }

    /// Sample identifiers (column names).
    fn sample_ids(&self) -> &[String] {
        self.column_ids()
    }

    /// Dense `feature -> sample -> count` mapping, zeros included.
    fn to_count_dict(&self) -> CountDict {
        let mut dict = CountDict::new();
        for (row, feature_id) in self.feature_ids().iter().enumerate() {
            let samples = self
                .sample_ids()
                .iter()
                .enumerate()
                .map(|(col, sample_id)| (sample_id.clone(), self.get(row, col)))
                .collect();
            dict.insert(feature_id.clone(), samples);
        }
        dict
    }
}

/// Raw contents of a numeric TSV: row IDs, column IDs and the non-zero cells.
pub(crate) struct NumericTsv {
    pub row_ids: Vec<String>,
    pub column_ids: Vec<String>,
    pub entries: Vec<(usize, usize, f64)>,
}

/// Which kind of value a numeric TSV holds; decides the validation applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericKind {
    Count,
    Rank,
}

/// Open a tab-separated file for record-by-record reading.
pub(crate) fn tsv_reader<P: AsRef<Path>>(path: P) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(BufReader::new(file)))
}

/// Read a TSV whose first record is a header of column IDs (after an index
/// header cell) and whose remaining records are an ID followed by numbers.
///
/// Leading `# ...` comment lines, as written by `biom convert`, are skipped.
/// Every data row must hold exactly one value per header column. Row IDs are
/// trimmed of surrounding whitespace.
pub(crate) fn read_numeric_tsv<P: AsRef<Path>>(
    path: P,
    kind: NumericKind,
) -> Result<NumericTsv> {
    let mut reader = tsv_reader(path)?;
    let mut records = reader.records();

    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                let first = record.get(0).unwrap_or("");
                if first.starts_with("# ") || (first.is_empty() && record.len() <= 1) {
                    continue;
                }
                break record;
            }
            None => return Err(PrepError::EmptyData("Empty TSV file".to_string())),
        }
    };
    if header.len() < 2 {
        return Err(PrepError::EmptyData(
            "TSV must have at least one column after the ID column".to_string(),
        ));
    }
    let column_ids: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let n_columns = column_ids.len();

    let mut row_ids = Vec::new();
    let mut entries = Vec::new();
    for record in records {
        let record = record?;
        if record.is_empty() || (record.len() == 1 && record[0].trim().is_empty()) {
            continue;
        }
        let id = record[0].trim();
        if record.len() - 1 != n_columns {
            return Err(PrepError::RaggedRow {
                id: id.to_string(),
                expected: n_columns,
                actual: record.len() - 1,
            });
        }
        let row = row_ids.len();
        row_ids.push(id.to_string());

        for (col, raw) in record.iter().skip(1).enumerate() {
            let value = parse_value(raw, row, col, kind)?;
            if value != 0.0 {
                entries.push((row, col, value));
            }
        }
    }

    if row_ids.is_empty() {
        return Err(PrepError::EmptyData("No rows in TSV".to_string()));
    }

    Ok(NumericTsv {
        row_ids,
        column_ids,
        entries,
    })
}

fn parse_value(raw: &str, row: usize, col: usize, kind: NumericKind) -> Result<f64> {
    let parsed = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match (kind, parsed) {
        (NumericKind::Count, Some(v)) if v >= 0.0 => Ok(v),
        (NumericKind::Rank, Some(v)) => Ok(v),
        (NumericKind::Count, _) => Err(PrepError::InvalidCount {
            value: raw.to_string(),
            row,
            col,
        }),
        (NumericKind::Rank, None) => Err(PrepError::InvalidRank {
            value: raw.to_string(),
            row,
            col,
        }),
    }
}

/// Fail on the first index that is not below `len`.
pub(crate) fn check_indices(axis: Axis, indices: &[usize], len: usize) -> Result<()> {
    match indices.iter().find(|&&index| index >= len) {
        Some(&index) => Err(PrepError::IndexOutOfBounds { axis, index, len }),
        None => Ok(()),
    }
}

/// Check that an identifier list has the expected length.
pub(crate) fn check_len(expected: usize, ids: &[String]) -> Result<()> {
    if ids.len() != expected {
        return Err(PrepError::DimensionMismatch {
            expected,
            actual: ids.len(),
        });
    }
    Ok(())
}
