//! Pipeline composition and execution for table reconciliation.

mod runner;

pub use runner::{MinShape, ReconcileConfig, Reconciled, Reconciler};
