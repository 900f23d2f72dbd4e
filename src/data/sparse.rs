//! Count table with sparse storage.

use crate::data::table::{
    check_indices, check_len, read_numeric_tsv, CountTable, NumericKind, Table,
};
use crate::error::{Axis, Result};
use sprs::{CsMat, TriMat};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A sparse count table storing feature abundances across samples.
///
/// Rows represent features, columns represent samples. Uses CSR (Compressed
/// Sparse Row) storage, so memory scales with the number of non-zero entries
/// rather than with features × samples.
#[derive(Debug, Clone)]
pub struct SparseCountTable {
    /// Sparse matrix in CSR format (features × samples)
    data: CsMat<f64>,
    /// Feature identifiers (row names)
    feature_ids: Vec<String>,
    /// Sample identifiers (column names)
    sample_ids: Vec<String>,
}

impl SparseCountTable {
    /// Create a new table from a sparse matrix and identifiers.
    pub fn new(
        data: CsMat<f64>,
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

    /// Build a table from (row, col, value) triplets.
    pub fn from_triplets(
        triplets: &[(usize, usize, f64)],
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let shape = (feature_ids.len(), sample_ids.len());
        let mut tri_mat = TriMat::new(shape);
        for &(row, col, val) in triplets {
            check_indices(Axis::Rows, &[row], shape.0)?;
            check_indices(Axis::Columns, &[col], shape.1)?;
            tri_mat.add_triplet(row, col, val);
        }
        Self::new(tri_mat.to_csr(), feature_ids, sample_ids)
    }

    /// Load a count table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header with sample IDs (first column is feature ID header)
    /// - Subsequent rows: feature ID followed by counts
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tsv = read_numeric_tsv(path, NumericKind::Count)?;
        Self::from_triplets(&tsv.entries, tsv.row_ids, tsv.column_ids)
    }

    /// Write the count table to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "feature_id")?;
        for sample_id in &self.sample_ids {
            write!(writer, "\t{}", sample_id)?;
        }
        writeln!(writer)?;

        for (row_idx, feature_id) in self.feature_ids.iter().enumerate() {
            write!(writer, "{}", feature_id)?;
            for col_idx in 0..self.sample_ids.len() {
                write!(writer, "\t{}", self.get(row_idx, col_idx))?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Get the underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<f64> {
        &self.data
    }
}

impl Table for SparseCountTable {
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

impl CountTable for SparseCountTable {
    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data.get(row, col).copied().unwrap_or(0.0)
    }

    fn nonzero_entries(&self) -> Vec<(usize, usize, f64)> {
        let mut entries = Vec::with_capacity(self.data.nnz());
        for (row, row_vec) in self.data.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                // Explicitly stored zeros are still zeros.
                if val != 0.0 {
                    entries.push((row, col, val));
                }
            }
        }
        entries
    }

    fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let col_map: HashMap<usize, usize> = cols
            .iter()
            .enumerate()
            .map(|(new_idx, &old_idx)| (old_idx, new_idx))
            .collect();

        check_indices(Axis::Rows, rows, self.feature_ids.len())?;
        check_indices(Axis::Columns, cols, self.sample_ids.len())?;
        let new_feature_ids = rows.iter().map(|&r| self.feature_ids[r].clone()).collect();
        let new_sample_ids = cols.iter().map(|&c| self.sample_ids[c].clone()).collect();

        let mut tri_mat = TriMat::new((rows.len(), cols.len()));
        for (new_row, &old_row) in rows.iter().enumerate() {
            if let Some(row_vec) = self.data.outer_view(old_row) {
                for (old_col, &val) in row_vec.iter() {
                    if let Some(&new_col) = col_map.get(&old_col) {
                        tri_mat.add_triplet(new_row, new_col, val);
                    }
                }
            }
        }

        Self::new(tri_mat.to_csr(), new_feature_ids, new_sample_ids)
    }

    fn nnz(&self) -> usize {
        self.data.data().iter().filter(|&&v| v != 0.0).count()
    }
}
