//! Sparse `feature -> sample -> count` mappings for serialization.

use crate::data::{CountDict, CountTable};
use std::collections::BTreeMap;

/// Drop every zero count from a dense count mapping.
///
/// Features whose counts are all zero are kept with an empty mapping; after
/// pruning there are none.
pub fn sparsify_count_dict(count_dict: &CountDict) -> CountDict {
    count_dict
        .iter()
        .map(|(feature_id, sample_counts)| {
            let nonzero: BTreeMap<String, f64> = sample_counts
                .iter()
                .filter(|(_, count)| **count != 0.0)
                .map(|(sample_id, &count)| (sample_id.clone(), count))
                .collect();
            (feature_id.clone(), nonzero)
        })
        .collect()
}

/// Build the sparse mapping straight from a count table, without
/// materializing the zeros.
pub fn sparsify<T: CountTable>(table: &T) -> CountDict {
    let mut dict: CountDict = table
        .feature_ids()
        .iter()
        .map(|id| (id.clone(), BTreeMap::new()))
        .collect();
    for (row, col, count) in table.nonzero_entries() {
        if let Some(samples) = dict.get_mut(&table.feature_ids()[row]) {
            samples.insert(table.sample_ids()[col].clone(), count);
        }
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SparseCountTable;

    fn samples(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn test_sparsify_count_dict() {
        let mut dense = CountDict::new();
        dense.insert("F1".into(), samples(&[("S1", 1.0), ("S2", 0.0)]));
        dense.insert("F2".into(), samples(&[("S1", 0.0), ("S2", 2.0)]));

        let sparse = sparsify_count_dict(&dense);

        let mut expected = CountDict::new();
        expected.insert("F1".into(), samples(&[("S1", 1.0)]));
        expected.insert("F2".into(), samples(&[("S2", 2.0)]));
        assert_eq!(sparse, expected);
    }

    #[test]
    fn test_sparsify_table_agrees_with_dict() {
        let table = SparseCountTable::from_triplets(
            &[(0, 0, 1.0), (1, 1, 2.0), (1, 2, 7.5)],
            vec!["F1".into(), "F2".into()],
            vec!["S1".into(), "S2".into(), "S3".into()],
        )
        .unwrap();

        let direct = sparsify(&table);
        assert_eq!(direct, sparsify_count_dict(&table.to_count_dict()));
        assert_eq!(
            serde_json::to_string(&direct).unwrap(),
            r#"{"F1":{"S1":1.0},"F2":{"S2":2.0,"S3":7.5}}"#
        );
    }
}
