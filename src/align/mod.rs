//! Alignment of the count table with rankings and sample metadata.

mod matching;
mod prune;

pub use matching::match_table_and_data;
pub use prune::remove_empty_samples_and_features;
