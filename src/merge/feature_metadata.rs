//! Left join of feature metadata onto the feature rankings.

use crate::data::{FeatureRanks, Metadata, Table, Variable};
use crate::error::{PrepError, Result};
use std::collections::{HashMap, HashSet};

/// Merge feature metadata into the feature rankings.
///
/// Returns the merged feature data and the feature metadata's column names
/// (empty when there is no feature metadata). Ranking columns come first,
/// followed by the metadata columns. Every ranked feature is kept; metadata
/// for unranked features is dropped, and ranked features without metadata
/// get [`Variable::Missing`]. Non-finite numbers are also turned into
/// [`Variable::Missing`], so the merged data never holds a NaN.
///
/// Fails with [`PrepError::DuplicateColumn`] if a metadata column has the
/// same name as a ranking column.
pub fn merge_feature_metadata(
    ranks: &FeatureRanks,
    feature_metadata: Option<&Metadata>,
) -> Result<(Metadata, Vec<String>)> {
    let ranked = Metadata::from(ranks);
    let Some(feature_metadata) = feature_metadata else {
        return Ok((ranked, Vec::new()));
    };

    let rank_columns: HashSet<&str> = ranks.ranking_names().iter().map(String::as_str).collect();
    if let Some(name) = feature_metadata
        .column_names()
        .iter()
        .find(|name| rank_columns.contains(name.as_str()))
    {
        return Err(PrepError::DuplicateColumn { name: name.clone() });
    }

    let metadata_rows: HashMap<&str, usize> = feature_metadata
        .row_ids()
        .iter()
        .enumerate()
        .rev()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let n_metadata_columns = feature_metadata.n_columns();

    let mut values = Vec::with_capacity(ranked.n_rows());
    for (row, feature_id) in ranked.row_ids().iter().enumerate() {
        let mut merged: Vec<Variable> = (0..ranked.n_columns())
            .map(|col| ranked.value(row, col).cloned().unwrap_or(Variable::Missing))
            .collect();
        match metadata_rows.get(feature_id.as_str()) {
            Some(&md_row) => merged.extend((0..n_metadata_columns).map(|col| {
                feature_metadata
                    .value(md_row, col)
                    .cloned()
                    .unwrap_or(Variable::Missing)
                    .normalized()
            })),
            None => merged.extend(std::iter::repeat(Variable::Missing).take(n_metadata_columns)),
        }
        values.push(merged);
    }

    let metadata_columns = feature_metadata.column_names().to_vec();
    let mut columns = ranks.ranking_names().to_vec();
    columns.extend(metadata_columns.iter().cloned());

    let merged = Metadata::new(ranked.row_ids().to_vec(), columns, values)?;
    Ok((merged, metadata_columns))
}
