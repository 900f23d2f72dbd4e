//! Count table with dense storage.

use crate::data::table::{
    check_indices, check_len, read_numeric_tsv, CountTable, NumericKind, Table,
};
use crate::error::{Axis, PrepError, Result};
use nalgebra::DMatrix;
use std::path::Path;

/// A dense count table (features × samples).
///
/// Suited to small tables or tables with few zeros; use
/// [`crate::data::SparseCountTable`] when most entries are zero.
#[derive(Debug, Clone)]
pub struct DenseCountTable {
    data: DMatrix<f64>,
    feature_ids: Vec<String>,
    sample_ids: Vec<String>,
}

impl DenseCountTable {
    /// Create a new table from a dense matrix and identifiers.
    pub fn new(
        data: DMatrix<f64>,
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        check_len(nrows, &feature_ids)?;
        check_len(ncols, &sample_ids)?;
        Ok(Self {
            data,
            feature_ids,
            sample_ids,
        })
    }

    /// Build a table from row-major rows of counts.
    pub fn from_rows(
        rows: &[Vec<f64>],
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        check_len(rows.len(), &feature_ids)?;
        let ncols = sample_ids.len();
        for row in rows {
            if row.len() != ncols {
                return Err(PrepError::DimensionMismatch {
                    expected: ncols,
                    actual: row.len(),
                });
            }
        }
        let data = DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]);
        Self::new(data, feature_ids, sample_ids)
    }

    /// Load a count table from a TSV file (same layout as
    /// [`crate::data::SparseCountTable::from_tsv`]).
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tsv = read_numeric_tsv(path, NumericKind::Count)?;
        let mut data = DMatrix::zeros(tsv.row_ids.len(), tsv.column_ids.len());
        for (row, col, val) in tsv.entries {
            data[(row, col)] = val;
        }
        Self::new(data, tsv.row_ids, tsv.column_ids)
    }

    /// Get the underlying dense matrix.
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }
}

impl Table for DenseCountTable {
    fn row_ids(&self) -> &[String] {
        &self.feature_ids
    }

    fn column_ids(&self) -> &[String] {
        &self.sample_ids
    }

    fn set_column_ids(&mut self, ids: Vec<String>) -> Result<()> {
        check_len(self.sample_ids.len(), &ids)?;
        self.sample_ids = ids;
        Ok(())
    }
}

impl CountTable for DenseCountTable {
    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data.get((row, col)).copied().unwrap_or(0.0)
    }

    fn nonzero_entries(&self) -> Vec<(usize, usize, f64)> {
        let mut entries = Vec::new();
        for row in 0..self.data.nrows() {
            for col in 0..self.data.ncols() {
                let val = self.data[(row, col)];
                if val != 0.0 {
                    entries.push((row, col, val));
                }
            }
        }
        entries
    }

    fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let (nrows, ncols) = self.data.shape();
        check_indices(Axis::Rows, rows, nrows)?;
        check_indices(Axis::Columns, cols, ncols)?;

        let data = DMatrix::from_fn(rows.len(), cols.len(), |r, c| self.data[(rows[r], cols[c])]);
        let feature_ids = rows.iter().map(|&r| self.feature_ids[r].clone()).collect();
        let sample_ids = cols.iter().map(|&c| self.sample_ids[c].clone()).collect();
        Self::new(data, feature_ids, sample_ids)
    }
}
