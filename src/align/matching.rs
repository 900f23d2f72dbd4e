//! Matching the count table against the feature rankings and sample metadata.

use crate::data::{CountTable, FeatureRanks, Metadata, Table};
use crate::error::{PrepError, Result};
use crate::report::{
    report_dropped, DiagnosticSink, Item, Notice, COUNT_TABLE, FEATURE_RANKINGS, SAMPLE_METADATA,
};
use std::collections::HashSet;

/// Match feature rankings and then sample metadata to a count table.
///
/// Features are matched strictly: every ranked feature must be present in
/// the table, otherwise this fails with [`PrepError::UnmatchedFeatures`].
/// Table features without a ranking are dropped.
///
/// Samples are matched leniently: samples missing from either side are
/// dropped, but at least one must be shared, otherwise this fails with
/// [`PrepError::NoSharedSamples`].
///
/// The matched table keeps the input table's row and column order, and the
/// matched sample metadata is aligned to the matched table's sample order.
/// Rankings are not modified, so they are not returned.
pub fn match_table_and_data<T: CountTable>(
    table: &T,
    ranks: &FeatureRanks,
    sample_metadata: &Metadata,
    sink: &mut dyn DiagnosticSink,
) -> Result<(T, Metadata)> {
    sink.emit(Notice::step("Starting matching table with feature rankings."));
    let ranked: HashSet<&str> = ranks.feature_ids().iter().map(String::as_str).collect();
    let feature_rows: Vec<usize> = table
        .feature_ids()
        .iter()
        .enumerate()
        .filter(|(_, id)| ranked.contains(id.as_str()))
        .map(|(row, _)| row)
        .collect();

    let table_features: HashSet<&str> = table.feature_ids().iter().map(String::as_str).collect();
    let missing = ranked.iter().filter(|id| !table_features.contains(*id)).count();
    if missing > 0 {
        return Err(PrepError::UnmatchedFeatures {
            ranked: ranks.feature_ids().len(),
            missing,
        });
    }
    report_dropped(
        sink,
        table.n_rows(),
        feature_rows.len(),
        Item::Feature,
        COUNT_TABLE,
        FEATURE_RANKINGS,
    );

    sink.emit(Notice::step("Starting matching table with sample metadata."));
    let described: HashSet<&str> = sample_metadata.row_ids().iter().map(String::as_str).collect();
    let sample_cols: Vec<usize> = table
        .sample_ids()
        .iter()
        .enumerate()
        .filter(|(_, id)| described.contains(id.as_str()))
        .map(|(col, _)| col)
        .collect();
    if sample_cols.is_empty() {
        return Err(PrepError::NoSharedSamples);
    }

    let m_table = table.select(&feature_rows, &sample_cols)?;
    let m_sample_metadata = sample_metadata.align_to(m_table.sample_ids())?;
    sink.emit(Notice::step("Matching table with sample metadata done."));

    report_dropped(
        sink,
        sample_metadata.n_rows(),
        m_sample_metadata.n_rows(),
        Item::Sample,
        SAMPLE_METADATA,
        COUNT_TABLE,
    );
    report_dropped(
        sink,
        table.n_columns(),
        m_table.n_columns(),
        Item::Sample,
        COUNT_TABLE,
        SAMPLE_METADATA,
    );

    Ok((m_table, m_sample_metadata))
}
