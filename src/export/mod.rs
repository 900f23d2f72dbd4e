//! Compact representations handed to the rendering layer.

mod sparsify;

pub use sparsify::{sparsify, sparsify_count_dict};
