//! Sample and feature metadata tables.

use crate::data::ranks::FeatureRanks;
use crate::data::table::{check_len, tsv_reader, Table};
use crate::error::{Axis, PrepError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A metadata value that can be categorical or continuous.
///
/// Serializes untagged: strings as strings, numbers as numbers, and
/// [`Variable::Missing`] as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variable {
    /// Categorical variable with string levels.
    Categorical(String),
    /// Continuous numeric variable.
    Continuous(f64),
    /// Missing value.
    Missing,
}

impl Variable {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Variable::Missing)
    }

    /// Try to get as categorical string.
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            Variable::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as continuous f64.
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Variable::Continuous(v) => Some(*v),
            _ => None,
        }
    }

    /// Replace a non-finite continuous value with [`Variable::Missing`].
    pub fn normalized(self) -> Self {
        match self {
            Variable::Continuous(v) if !v.is_finite() => Variable::Missing,
            other => other,
        }
    }

    fn parse(raw: &str, kind: ColumnKind) -> Self {
        let raw = raw.trim();
        if is_missing_token(raw) {
            return Variable::Missing;
        }
        match kind {
            ColumnKind::Continuous => raw
                .parse::<f64>()
                .map(Variable::Continuous)
                .unwrap_or(Variable::Missing)
                .normalized(),
            ColumnKind::Categorical => Variable::Categorical(raw.to_string()),
        }
    }
}

fn is_missing_token(raw: &str) -> bool {
    raw.is_empty() || raw == "NA" || raw == "na" || raw.eq_ignore_ascii_case("nan")
}

/// How the cells of a loaded column are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Categorical,
    Continuous,
}

impl ColumnKind {
    /// Continuous if every non-missing cell parses as a number.
    fn infer<'a>(mut cells: impl Iterator<Item = &'a str>) -> Self {
        let all_numeric = cells.all(|cell| {
            let cell = cell.trim();
            is_missing_token(cell) || cell.parse::<f64>().is_ok()
        });
        if all_numeric {
            ColumnKind::Continuous
        } else {
            ColumnKind::Categorical
        }
    }
}

/// A metadata table: one row per sample (or feature), one column per field.
///
/// Row IDs are kept in order and may repeat until validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    row_ids: Vec<String>,
    column_names: Vec<String>,
    /// Row-major values, `values[row][col]`.
    values: Vec<Vec<Variable>>,
}

impl Metadata {
    /// Create metadata from row-major values.
    pub fn new(
        row_ids: Vec<String>,
        column_names: Vec<String>,
        values: Vec<Vec<Variable>>,
    ) -> Result<Self> {
        check_len(values.len(), &row_ids)?;
        for row in &values {
            check_len(row.len(), &column_names)?;
        }
        Ok(Self {
            row_ids,
            column_names,
            values,
        })
    }

    /// Load metadata from a TSV file.
    ///
    /// Expected format:
    /// - First row: header with column names (first column is the ID header)
    /// - Subsequent rows: ID followed by values
    ///
    /// Rows whose ID starts with `#q2:` (QIIME 2 type directives) are skipped
    /// and row IDs are trimmed of surrounding whitespace. Short rows are
    /// padded with missing values; a row with more cells than the header is
    /// an error. Columns are continuous if all values parse as numbers,
    /// otherwise categorical.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = tsv_reader(path)?;
        let mut records = reader.records();

        let header = records
            .next()
            .ok_or_else(|| PrepError::EmptyData("Empty metadata file".to_string()))??;
        if header.is_empty() {
            return Err(PrepError::EmptyData("Metadata has no ID column".to_string()));
        }
        let column_names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

        let mut raw_rows: Vec<(String, Vec<String>)> = Vec::new();
        for record in records {
            let record = record?;
            let id = record.get(0).unwrap_or("").trim();
            if id.is_empty() || id.starts_with("#q2:") {
                continue;
            }
            if record.len() - 1 > column_names.len() {
                return Err(PrepError::RaggedRow {
                    id: id.to_string(),
                    expected: column_names.len(),
                    actual: record.len() - 1,
                });
            }
            let cells: Vec<String> = (0..column_names.len())
                .map(|col| record.get(col + 1).unwrap_or("").to_string())
                .collect();
            raw_rows.push((id.to_string(), cells));
        }

        if raw_rows.is_empty() {
            return Err(PrepError::EmptyData("No rows in metadata".to_string()));
        }

        let kinds: Vec<ColumnKind> = (0..column_names.len())
            .map(|col| ColumnKind::infer(raw_rows.iter().map(|(_, cells)| cells[col].as_str())))
            .collect();

        let mut row_ids = Vec::with_capacity(raw_rows.len());
        let mut values = Vec::with_capacity(raw_rows.len());
        for (id, cells) in raw_rows {
            row_ids.push(id);
            values.push(
                cells
                    .iter()
                    .zip(&kinds)
                    .map(|(cell, &kind)| Variable::parse(cell, kind))
                    .collect(),
            );
        }

        Ok(Self {
            row_ids,
            column_names,
            values,
        })
    }

    /// Column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Get a value by row ID and column name.
    pub fn get(&self, row_id: &str, column: &str) -> Option<&Variable> {
        let row = self.row_ids.iter().position(|r| r == row_id)?;
        let col = self.column_names.iter().position(|c| c == column)?;
        Some(&self.values[row][col])
    }

    /// Get a value by position.
    pub fn value(&self, row: usize, col: usize) -> Option<&Variable> {
        self.values.get(row).and_then(|r| r.get(col))
    }

    /// Keep only the rows at the given indices, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let mut row_ids = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for &row in rows {
            let id = self.row_ids.get(row).ok_or(PrepError::IndexOutOfBounds {
                axis: Axis::Rows,
                index: row,
                len: self.row_ids.len(),
            })?;
            row_ids.push(id.clone());
            values.push(self.values[row].clone());
        }
        Ok(Self {
            row_ids,
            column_names: self.column_names.clone(),
            values,
        })
    }

    /// Reorder and subset rows to exactly the given IDs.
    ///
    /// Fails if any ID is not present.
    pub fn align_to(&self, row_ids: &[String]) -> Result<Self> {
        let index: HashMap<&str, usize> = self
            .row_ids
            .iter()
            .enumerate()
            .rev()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let rows = row_ids
            .iter()
            .map(|id| {
                index.get(id.as_str()).copied().ok_or_else(|| {
                    PrepError::SampleMismatch(format!("'{}' not found in metadata", id))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.select_rows(&rows)
    }
}

impl Table for Metadata {
    fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    fn column_ids(&self) -> &[String] {
        &self.column_names
    }

    fn set_column_ids(&mut self, ids: Vec<String>) -> Result<()> {
        check_len(self.column_names.len(), &ids)?;
        self.column_names = ids;
        Ok(())
    }
}

impl From<&FeatureRanks> for Metadata {
    /// View rankings as metadata with one continuous column per ranking.
    fn from(ranks: &FeatureRanks) -> Self {
        let n_rankings = ranks.ranking_names().len();
        let values = (0..ranks.feature_ids().len())
            .map(|row| {
                (0..n_rankings)
                    .map(|col| match ranks.get(row, col) {
                        Some(v) => Variable::Continuous(v).normalized(),
                        None => Variable::Missing,
                    })
                    .collect()
            })
            .collect();
        Self {
            row_ids: ranks.feature_ids().to_vec(),
            column_names: ranks.ranking_names().to_vec(),
            values,
        }
    }
}

/// Serializes as an ordered map of `row ID -> { column -> value }`.
impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Row<'a> {
            columns: &'a [String],
            values: &'a [Variable],
        }

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for (name, value) in self.columns.iter().zip(self.values) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.row_ids.len()))?;
        for (id, values) in self.row_ids.iter().zip(&self.values) {
            map.serialize_entry(
                id,
                &Row {
                    columns: &self.column_names,
                    values,
                },
            )?;
        }
        map.end()
    }
}
