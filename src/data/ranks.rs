//! Feature rankings (feature ID × ranking name).

use crate::data::table::{check_indices, check_len, read_numeric_tsv, NumericKind, Table};
use crate::error::{Axis, PrepError, Result};
use nalgebra::DMatrix;
use std::path::Path;

/// Per-feature scores along one or more rankings (e.g. differentials or
/// ordination loadings).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRanks {
    values: DMatrix<f64>,
    feature_ids: Vec<String>,
    ranking_names: Vec<String>,
}

impl FeatureRanks {
    /// Create rankings from a feature × ranking matrix.
    pub fn new(
        values: DMatrix<f64>,
        feature_ids: Vec<String>,
        ranking_names: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = values.shape();
        check_len(nrows, &feature_ids)?;
        check_len(ncols, &ranking_names)?;
        Ok(Self {
            values,
            feature_ids,
            ranking_names,
        })
    }

    /// Build rankings from row-major rows of scores.
    pub fn from_rows(
        rows: &[Vec<f64>],
        feature_ids: Vec<String>,
        ranking_names: Vec<String>,
    ) -> Result<Self> {
        check_len(rows.len(), &feature_ids)?;
        let ncols = ranking_names.len();
        if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
            return Err(PrepError::DimensionMismatch {
                expected: ncols,
                actual: row.len(),
            });
        }
        let values = DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]);
        Self::new(values, feature_ids, ranking_names)
    }

    /// Load rankings from a TSV file: a header of ranking names after the
    /// feature ID header, then one feature per row.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tsv = read_numeric_tsv(path, NumericKind::Rank)?;
        let mut values = DMatrix::zeros(tsv.row_ids.len(), tsv.column_ids.len());
        for (row, col, val) in tsv.entries {
            values[(row, col)] = val;
        }
        Self::new(values, tsv.row_ids, tsv.column_ids)
    }

    /// Feature identifiers in order.
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Ranking names in order.
    pub fn ranking_names(&self) -> &[String] {
        &self.ranking_names
    }

    /// Score of a feature (by index) along a ranking (by index).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Keep only the rows at the given indices, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        check_indices(Axis::Rows, rows, self.feature_ids.len())?;
        let values = DMatrix::from_fn(rows.len(), self.ranking_names.len(), |r, c| {
            self.values[(rows[r], c)]
        });
        let feature_ids = rows.iter().map(|&r| self.feature_ids[r].clone()).collect();
        Self::new(values, feature_ids, self.ranking_names.clone())
    }
}

impl Table for FeatureRanks {
    fn row_ids(&self) -> &[String] {
        &self.feature_ids
    }

    fn column_ids(&self) -> &[String] {
        &self.ranking_names
    }

    fn set_column_ids(&mut self, ids: Vec<String>) -> Result<()> {
        check_len(self.ranking_names.len(), &ids)?;
        self.ranking_names = ids;
        Ok(())
    }
}
