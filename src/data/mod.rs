//! Table types for count, ranking and metadata data.

mod dense;
mod metadata;
mod ranks;
mod sparse;
mod table;

pub use dense::DenseCountTable;
pub use metadata::{Metadata, Variable};
pub use ranks::FeatureRanks;
pub use sparse::SparseCountTable;
pub use table::{CountDict, CountTable, Table};
