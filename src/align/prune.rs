//! Removal of empty samples and features after matching.

use crate::data::{CountTable, FeatureRanks, Metadata, Table};
use crate::error::{PrepError, Result};
use crate::report::{DiagnosticSink, Item, Notice};
use std::collections::HashSet;

/// Remove all-zero features (rows) and samples (columns) from a matched
/// table, and drop the same samples from the sample metadata and the same
/// features from the rankings.
///
/// Both axes are judged against the input table at once: removing an empty
/// feature never causes a sample to be re-judged.
///
/// This should be called after [`crate::align::match_table_and_data`]; the
/// sample metadata rows and ranking rows that survive are those whose IDs
/// are still in the table, in their original order.
///
/// Fails with [`PrepError::EmptyTable`] if no feature or no sample has a
/// non-zero count.
pub fn remove_empty_samples_and_features<T: CountTable>(
    table: &T,
    sample_metadata: &Metadata,
    ranks: &FeatureRanks,
    sink: &mut dyn DiagnosticSink,
) -> Result<(T, Metadata, FeatureRanks)> {
    sink.emit(Notice::step("Attempting to remove empty samples and features."));

    let mut feature_has_count = vec![false; table.n_rows()];
    let mut sample_has_count = vec![false; table.n_columns()];
    for (row, col, _) in table.nonzero_entries() {
        feature_has_count[row] = true;
        sample_has_count[col] = true;
    }
    let keep_rows = indices_where(&feature_has_count);
    let keep_cols = indices_where(&sample_has_count);
    if keep_rows.is_empty() || keep_cols.is_empty() {
        return Err(PrepError::EmptyTable);
    }

    let filtered_table = table.select(&keep_rows, &keep_cols)?;
    let mut filtered_metadata = sample_metadata.clone();
    let mut filtered_ranks = ranks.clone();

    let sample_diff = table.n_columns() - filtered_table.n_columns();
    if sample_diff > 0 {
        let kept: HashSet<&str> = filtered_table.sample_ids().iter().map(String::as_str).collect();
        let rows = rows_in(sample_metadata.row_ids(), &kept);
        filtered_metadata = sample_metadata.select_rows(&rows)?;
        sink.emit(Notice::RemovedEmpty {
            count: sample_diff,
            item: Item::Sample,
        });
    } else {
        sink.emit(Notice::step("Couldn't find any empty samples."));
    }

    let feature_diff = table.n_rows() - filtered_table.n_rows();
    if feature_diff > 0 {
        let kept: HashSet<&str> = filtered_table.feature_ids().iter().map(String::as_str).collect();
        let rows = rows_in(ranks.feature_ids(), &kept);
        filtered_ranks = ranks.select_rows(&rows)?;
        sink.emit(Notice::RemovedEmpty {
            count: feature_diff,
            item: Item::Feature,
        });
    } else {
        sink.emit(Notice::step("Couldn't find any empty features."));
    }

    Ok((filtered_table, filtered_metadata, filtered_ranks))
}

fn indices_where(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag)
        .map(|(i, _)| i)
        .collect()
}

fn rows_in(ids: &[String], kept: &HashSet<&str>) -> Vec<usize> {
    ids.iter()
        .enumerate()
        .filter(|(_, id)| kept.contains(id.as_str()))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DenseCountTable, SparseCountTable, Variable};
    use crate::report::NullSink;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn sample_metadata(samples: &[&str]) -> Metadata {
        let values = samples.iter().map(|_| vec![Variable::Continuous(1.0)]).collect();
        Metadata::new(strings(samples), strings(&["x"]), values).unwrap()
    }

    fn ranks(features: &[&str]) -> FeatureRanks {
        let rows: Vec<Vec<f64>> = features.iter().map(|_| vec![1.0]).collect();
        FeatureRanks::from_rows(&rows, strings(features), strings(&["R"])).unwrap()
    }

    #[test]
    fn test_all_zero_table() {
        let table = DenseCountTable::from_rows(
            &[vec![0.0, 0.0], vec![0.0, 0.0]],
            strings(&["F1", "F2"]),
            strings(&["S1", "S2"]),
        )
        .unwrap();
        let err = remove_empty_samples_and_features(
            &table,
            &sample_metadata(&["S1", "S2"]),
            &ranks(&["F1", "F2"]),
            &mut NullSink,
        )
        .err()
        .unwrap();
        assert!(matches!(err, PrepError::EmptyTable));
    }

    #[test]
    fn test_removes_empty_rows_and_columns() {
        // F1 = [1, 0], F2 = [0, 0]
        let table = SparseCountTable::from_triplets(
            &[(0, 0, 1.0)],
            strings(&["F1", "F2"]),
            strings(&["S1", "S2"]),
        )
        .unwrap();
        let mut notices: Vec<Notice> = Vec::new();
        let (t, sm, r) = remove_empty_samples_and_features(
            &table,
            &sample_metadata(&["S1", "S2"]),
            &ranks(&["F1", "F2"]),
            &mut notices,
        )
        .unwrap();

        assert_eq!(t.feature_ids(), &["F1"]);
        assert_eq!(t.sample_ids(), &["S1"]);
        assert_eq!(t.get(0, 0), 1.0);
        assert_eq!(sm.row_ids(), &["S1"]);
        assert_eq!(r.feature_ids(), &["F1"]);

        let removed: Vec<&Notice> = notices
            .iter()
            .filter(|n| matches!(n, Notice::RemovedEmpty { .. }))
            .collect();
        assert_eq!(
            removed,
            vec![
                &Notice::RemovedEmpty { count: 1, item: Item::Sample },
                &Notice::RemovedEmpty { count: 1, item: Item::Feature },
            ]
        );
    }

    #[test]
    fn test_nothing_to_remove() {
        let table = DenseCountTable::from_rows(
            &[vec![1.0, 0.0], vec![0.0, 2.0]],
            strings(&["F1", "F2"]),
            strings(&["S1", "S2"]),
        )
        .unwrap();
        let sm = sample_metadata(&["S1", "S2"]);
        let r = ranks(&["F1", "F2"]);
        let mut notices: Vec<Notice> = Vec::new();
        let (t, out_sm, out_r) =
            remove_empty_samples_and_features(&table, &sm, &r, &mut notices).unwrap();

        assert_eq!(t.nonzero_entries(), table.nonzero_entries());
        assert_eq!(out_sm, sm);
        assert_eq!(out_r, r);
        assert!(notices.iter().all(|n| !matches!(n, Notice::RemovedEmpty { .. })));
    }

    #[test]
    fn test_explicit_zeros_count_as_empty() {
        let table = SparseCountTable::from_triplets(
            &[(0, 0, 3.0), (1, 1, 0.0)],
            strings(&["F1", "F2"]),
            strings(&["S1", "S2"]),
        )
        .unwrap();
        let (t, _, _) = remove_empty_samples_and_features(
            &table,
            &sample_metadata(&["S1", "S2"]),
            &ranks(&["F1", "F2"]),
            &mut NullSink,
        )
        .unwrap();
        assert_eq!(t.feature_ids(), &["F1"]);
        assert_eq!(t.sample_ids(), &["S1"]);
    }

    #[test]
    fn test_result_has_no_empty_axis() {
        let rows = vec![
            vec![0.0, 0.0, 4.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![2.0, 0.0, 0.0, 0.0],
        ];
        let table = DenseCountTable::from_rows(
            &rows,
            strings(&["F1", "F2", "F3"]),
            strings(&["S1", "S2", "S3", "S4"]),
        )
        .unwrap();
        let (t, sm, r) = remove_empty_samples_and_features(
            &table,
            &sample_metadata(&["S1", "S2", "S3", "S4"]),
            &ranks(&["F1", "F2", "F3"]),
            &mut NullSink,
        )
        .unwrap();

        assert_eq!(t.feature_ids(), &["F1", "F3"]);
        assert_eq!(t.sample_ids(), &["S1", "S3"]);
        assert_eq!(sm.row_ids(), &["S1", "S3"]);
        assert_eq!(r.feature_ids(), &["F1", "F3"]);
        for row in 0..t.n_rows() {
            assert!((0..t.n_columns()).any(|col| t.get(row, col) != 0.0));
        }
        for col in 0..t.n_columns() {
            assert!((0..t.n_rows()).any(|row| t.get(row, col) != 0.0));
        }
    }
}
