//! Merging of feature metadata into the feature rankings.

mod feature_metadata;

pub use feature_metadata::merge_feature_metadata;
