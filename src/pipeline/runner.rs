//! Pipeline runner reconciling the input tables end to end.

use crate::align::{match_table_and_data, remove_empty_samples_and_features};
use crate::data::{CountDict, CountTable, FeatureRanks, Metadata, Table};
use crate::error::{PrepError, Result};
use crate::export::sparsify;
use crate::merge::merge_feature_metadata;
use crate::report::{
    DiagnosticSink, Notice, COUNT_TABLE, FEATURE_METADATA, FEATURE_RANKINGS, SAMPLE_METADATA,
};
use crate::validate::{check_reserved_names, sanitize_columns, validate_shape};
use serde::{Deserialize, Serialize};

/// Minimum number of rows and columns a table must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinShape {
    pub rows: usize,
    pub columns: usize,
}

impl MinShape {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

/// Reconciliation settings, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Minimum shape of the count table.
    pub table: MinShape,
    /// Minimum shape of the feature rankings.
    pub ranks: MinShape,
    /// Minimum shape of the sample metadata.
    pub sample_metadata: MinShape,
    /// Minimum shape of the feature metadata, when given.
    pub feature_metadata: MinShape,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            table: MinShape::new(2, 1),
            ranks: MinShape::new(1, 1),
            sample_metadata: MinShape::new(1, 0),
            feature_metadata: MinShape::new(1, 0),
        }
    }
}

impl ReconcileConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(PrepError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(PrepError::from)
    }
}

/// The reconciled tables, ready for rendering.
#[derive(Debug, Clone)]
pub struct Reconciled<T> {
    /// Matched and pruned count table.
    pub table: T,
    /// Non-zero counts of `table` as `feature -> sample -> count`.
    pub counts: CountDict,
    /// Feature rankings with any feature metadata merged in.
    pub feature_data: Metadata,
    /// Names of the feature metadata columns in `feature_data`.
    pub feature_metadata_columns: Vec<String>,
    /// Sample metadata for the samples in `table`.
    pub sample_metadata: Metadata,
}

#[derive(Serialize)]
struct RenderInputs<'a> {
    feature_data: &'a Metadata,
    feature_metadata_columns: &'a [String],
    sample_metadata: &'a Metadata,
    counts: &'a CountDict,
}

impl<T> Reconciled<T> {
    /// Serialize the rendering inputs as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let inputs = RenderInputs {
            feature_data: &self.feature_data,
            feature_metadata_columns: &self.feature_metadata_columns,
            sample_metadata: &self.sample_metadata,
            counts: &self.counts,
        };
        Ok(serde_json::to_string_pretty(&inputs)?)
    }
}

/// Builder for running the reconciliation pipeline.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    /// Create a reconciler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Current settings.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Set the minimum shape of the count table.
    pub fn min_table_shape(mut self, rows: usize, columns: usize) -> Self {
        self.config.table = MinShape::new(rows, columns);
        self
    }

    /// Set the minimum shape of the feature rankings.
    pub fn min_ranks_shape(mut self, rows: usize, columns: usize) -> Self {
        self.config.ranks = MinShape::new(rows, columns);
        self
    }

    /// Set the minimum shape of the sample metadata.
    pub fn min_sample_metadata_shape(mut self, rows: usize, columns: usize) -> Self {
        self.config.sample_metadata = MinShape::new(rows, columns);
        self
    }

    /// Set the minimum shape of the feature metadata.
    pub fn min_feature_metadata_shape(mut self, rows: usize, columns: usize) -> Self {
        self.config.feature_metadata = MinShape::new(rows, columns);
        self
    }

    /// Run the pipeline.
    ///
    /// Validates every input, rejects reserved field names, sanitizes field
    /// names, matches the table with the rankings and sample metadata,
    /// removes empty samples and features, merges the feature metadata into
    /// the rankings and sparsifies the counts. Any error aborts the run.
    pub fn run<T: CountTable>(
        &self,
        table: T,
        mut ranks: FeatureRanks,
        mut sample_metadata: Metadata,
        mut feature_metadata: Option<Metadata>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Reconciled<T>> {
        let cfg = &self.config;
        check_shape(&table, COUNT_TABLE, cfg.table, sink)?;
        check_shape(&ranks, FEATURE_RANKINGS, cfg.ranks, sink)?;
        check_shape(&sample_metadata, SAMPLE_METADATA, cfg.sample_metadata, sink)?;
        if let Some(fm) = &feature_metadata {
            check_shape(fm, FEATURE_METADATA, cfg.feature_metadata, sink)?;
        }

        check_reserved_names(&sample_metadata, &ranks, feature_metadata.as_ref())?;

        sanitize_columns(&mut sample_metadata, SAMPLE_METADATA)?;
        sanitize_columns(&mut ranks, FEATURE_RANKINGS)?;
        if let Some(fm) = feature_metadata.as_mut() {
            sanitize_columns(fm, FEATURE_METADATA)?;
        }
        sink.emit(Notice::step("Sanitized field names."));

        let (m_table, m_sample_metadata) =
            match_table_and_data(&table, &ranks, &sample_metadata, sink)?;
        let (table, sample_metadata, ranks) =
            remove_empty_samples_and_features(&m_table, &m_sample_metadata, &ranks, sink)?;

        let (feature_data, feature_metadata_columns) =
            merge_feature_metadata(&ranks, feature_metadata.as_ref())?;

        sink.emit(Notice::step("Sparsifying count data."));
        let counts = sparsify(&table);

        Ok(Reconciled {
            table,
            counts,
            feature_data,
            feature_metadata_columns,
            sample_metadata,
        })
    }
}

fn check_shape<T: Table>(
    table: &T,
    name: &str,
    min: MinShape,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    validate_shape(table, name, min.rows, min.columns)?;
    sink.emit(Notice::step(format!("Ensured uniqueness of the {}.", name)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SparseCountTable, Variable};
    use crate::report::NullSink;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = ReconcileConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ReconcileConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = ReconcileConfig::from_yaml("table:\n  rows: 5\n  columns: 3\n").unwrap();
        assert_eq!(config.table, MinShape::new(5, 3));
        assert_eq!(config.ranks, ReconcileConfig::default().ranks);
    }

    #[test]
    fn test_builder_sets_config() {
        let r = Reconciler::new().min_table_shape(3, 2).min_ranks_shape(2, 1);
        assert_eq!(r.config().table, MinShape::new(3, 2));
        assert_eq!(r.config().ranks, MinShape::new(2, 1));
        assert_eq!(r.config().sample_metadata, MinShape::new(1, 0));
    }

    #[test]
    fn test_run_small() {
        let table = SparseCountTable::from_triplets(
            &[(0, 0, 1.0), (1, 1, 4.0), (2, 2, 2.0)],
            strings(&["F1", "F2", "F3"]),
            strings(&["S1", "S2", "S3"]),
        )
        .unwrap();
        let ranks = FeatureRanks::from_rows(
            &[vec![0.5], vec![-0.5]],
            strings(&["F1", "F2"]),
            strings(&["log(a/b)"]),
        )
        .unwrap();
        let sm = Metadata::new(
            strings(&["S1", "S2", "S3"]),
            strings(&["site.name"]),
            vec![
                vec![Variable::Categorical("gut".into())],
                vec![Variable::Categorical("skin".into())],
                vec![Variable::Missing],
            ],
        )
        .unwrap();

        let out = Reconciler::new().run(table, ranks, sm, None, &mut NullSink).unwrap();

        assert_eq!(out.table.feature_ids(), &["F1", "F2"]);
        // S3 only had counts for the unranked F3
        assert_eq!(out.table.sample_ids(), &["S1", "S2"]);
        assert_eq!(out.sample_metadata.column_names(), &["site:name"]);
        assert_eq!(out.feature_data.column_names(), &["log(a/b)"]);
        assert!(out.feature_metadata_columns.is_empty());
        assert_eq!(out.counts["F2"]["S2"], 4.0);
        assert!(!out.counts["F1"].contains_key("S2"));
    }

    #[test]
    fn test_shape_checked_before_names() {
        let table =
            SparseCountTable::from_triplets(&[(0, 0, 1.0)], strings(&["F1"]), strings(&["S1"]))
                .unwrap();
        let ranks =
            FeatureRanks::from_rows(&[vec![1.0]], strings(&["F1"]), strings(&["qurro_x"])).unwrap();
        let sm = Metadata::new(strings(&["S1"]), vec![], vec![vec![]]).unwrap();
        let err = Reconciler::new().run(table, ranks, sm, None, &mut NullSink).err().unwrap();
        assert!(matches!(err, PrepError::Shape { .. }));
    }
}
