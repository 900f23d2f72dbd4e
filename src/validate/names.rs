//! Field names reserved by the visualization.

use crate::data::{FeatureRanks, Metadata, Table};
use crate::error::{NameConflict, PrepError, Result};
use std::collections::BTreeSet;

/// Names that sample metadata fields can't use.
pub const RESERVED_SAMPLE_FIELDS: [&str; 2] = ["Sample ID", "qurro_balance"];

/// Names that feature ranking and feature metadata fields can't use.
pub const RESERVED_FEATURE_FIELDS: [&str; 3] = ["Feature ID", "qurro_classification", "qurro_x"];

/// Every reserved name.
pub const RESERVED_NAMES: [&str; 5] = [
    "Sample ID",
    "Feature ID",
    "qurro_balance",
    "qurro_classification",
    "qurro_x",
];

/// Check that no table uses a reserved field name, and that the feature
/// rankings and feature metadata share no field names.
pub fn check_reserved_names(
    sample_metadata: &Metadata,
    ranks: &FeatureRanks,
    feature_metadata: Option<&Metadata>,
) -> Result<()> {
    reject_reserved(sample_metadata.column_ids(), &RESERVED_SAMPLE_FIELDS, "sample metadata")?;
    reject_reserved(ranks.column_ids(), &RESERVED_FEATURE_FIELDS, "feature rankings")?;

    let Some(feature_metadata) = feature_metadata else {
        return Ok(());
    };
    reject_reserved(feature_metadata.column_ids(), &RESERVED_FEATURE_FIELDS, "feature metadata")?;

    let rank_fields: BTreeSet<&str> = ranks.column_ids().iter().map(String::as_str).collect();
    let shared: BTreeSet<&str> = feature_metadata
        .column_ids()
        .iter()
        .map(String::as_str)
        .filter(|name| rank_fields.contains(name))
        .collect();
    if !shared.is_empty() {
        return Err(PrepError::ReservedName(NameConflict::Shared {
            names: shared.into_iter().map(str::to_string).collect(),
        }));
    }
    Ok(())
}

fn reject_reserved(columns: &[String], reserved: &[&str], table: &str) -> Result<()> {
    for name in reserved {
        if columns.iter().any(|c| c == name) {
            return Err(PrepError::ReservedName(NameConflict::Reserved {
                name: name.to_string(),
                table: table.to_string(),
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Variable;

    fn metadata_with_columns(cols: &[&str]) -> Metadata {
        Metadata::new(
            vec!["X1".to_string()],
            cols.iter().map(|c| c.to_string()).collect(),
            vec![vec![Variable::Missing; cols.len()]],
        )
        .unwrap()
    }

    fn ranks_with_columns(cols: &[&str]) -> FeatureRanks {
        FeatureRanks::from_rows(
            &[vec![0.0; cols.len()]],
            vec!["F1".to_string()],
            cols.iter().map(|c| c.to_string()).collect(),
        )
        .unwrap()
    }

    fn reserved_in(err: PrepError) -> (String, String) {
        match err {
            PrepError::ReservedName(NameConflict::Reserved { name, table }) => (name, table),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_clean_names_pass() {
        let sm = metadata_with_columns(&["group", "age"]);
        let ranks = ranks_with_columns(&["Rank 0"]);
        let fm = metadata_with_columns(&["Taxon"]);
        assert!(check_reserved_names(&sm, &ranks, Some(&fm)).is_ok());
        assert!(check_reserved_names(&sm, &ranks, None).is_ok());
    }

    #[test]
    fn test_sample_id_in_sample_metadata() {
        let sm = metadata_with_columns(&["group", "Sample ID"]);
        let ranks = ranks_with_columns(&["Rank 0"]);
        let err = check_reserved_names(&sm, &ranks, None).err().unwrap();
        assert_eq!(
            reserved_in(err),
            ("Sample ID".to_string(), "sample metadata".to_string())
        );
    }

    #[test]
    fn test_balance_in_sample_metadata() {
        let sm = metadata_with_columns(&["qurro_balance"]);
        let ranks = ranks_with_columns(&["Rank 0"]);
        let err = check_reserved_names(&sm, &ranks, None).err().unwrap();
        assert!(err.to_string().contains("Try changing the name of this column."));
    }

    #[test]
    fn test_feature_fields() {
        let sm = metadata_with_columns(&["group"]);
        let ranks = ranks_with_columns(&["qurro_x"]);
        let err = check_reserved_names(&sm, &ranks, None).err().unwrap();
        assert_eq!(reserved_in(err).1, "feature rankings");

        let ranks = ranks_with_columns(&["Rank 0"]);
        let fm = metadata_with_columns(&["Feature ID"]);
        let err = check_reserved_names(&sm, &ranks, Some(&fm)).err().unwrap();
        assert_eq!(reserved_in(err).1, "feature metadata");

        let fm = metadata_with_columns(&["qurro_classification"]);
        let err = check_reserved_names(&sm, &ranks, Some(&fm)).err().unwrap();
        assert_eq!(reserved_in(err).0, "qurro_classification");
    }

    #[test]
    fn test_feature_id_allowed_in_sample_metadata() {
        let sm = metadata_with_columns(&["Feature ID"]);
        let ranks = ranks_with_columns(&["Rank 0"]);
        assert!(check_reserved_names(&sm, &ranks, None).is_ok());
    }

    #[test]
    fn test_shared_fields() {
        let sm = metadata_with_columns(&["group"]);
        let ranks = ranks_with_columns(&["Rank 1", "Rank 0", "Taxon"]);
        let fm = metadata_with_columns(&["Taxon", "Rank 0", "Confidence"]);
        let err = check_reserved_names(&sm, &ranks, Some(&fm)).err().unwrap();
        match err {
            PrepError::ReservedName(NameConflict::Shared { names }) => {
                assert_eq!(names, vec!["Rank 0", "Taxon"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
