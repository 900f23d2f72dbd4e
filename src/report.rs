//! Informational diagnostics emitted while reconciling tables.
//!
//! Stages never print. They hand [`Notice`]s to a [`DiagnosticSink`] supplied
//! by the caller, which decides whether to collect, print or discard them.

use serde::Serialize;
use std::fmt;

/// Display names of the tables, used in notices and errors.
pub const COUNT_TABLE: &str = "count table";
pub const FEATURE_RANKINGS: &str = "feature rankings";
pub const SAMPLE_METADATA: &str = "sample metadata";
pub const FEATURE_METADATA: &str = "feature metadata";

/// Importance of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Debug,
    Info,
}

/// The kind of entity a notice counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Sample,
    Feature,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Sample => write!(f, "sample"),
            Item::Feature => write!(f, "feature"),
        }
    }
}

/// A non-fatal event reported by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// `count` items in `table` were absent from `basis` and were dropped.
    Dropped {
        count: usize,
        item: Item,
        table: String,
        basis: String,
    },
    /// `count` all-zero items were removed from the count table.
    RemovedEmpty { count: usize, item: Item },
    /// Progress message.
    Step { message: String },
}

impl Notice {
    pub(crate) fn step(message: impl Into<String>) -> Self {
        Notice::Step {
            message: message.into(),
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Notice::Step { .. } => Level::Debug,
            Notice::Dropped { .. } | Notice::RemovedEmpty { .. } => Level::Info,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Dropped {
                count,
                item,
                table,
                basis,
            } => write!(
                f,
                "{} {}(s) in the {} were not present in the {}. \
                 These {}(s) have been removed from the visualization.",
                count, item, table, basis, item
            ),
            Notice::RemovedEmpty { count, item } => {
                write!(f, "Removed {} empty {}(s).", count, item)
            }
            Notice::Step { message } => write!(f, "{}", message),
        }
    }
}

/// Receiver of notices.
pub trait DiagnosticSink {
    fn emit(&mut self, notice: Notice);
}

impl DiagnosticSink for Vec<Notice> {
    fn emit(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _notice: Notice) {}
}

/// Writes notices to stderr; debug notices only when `verbose`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink {
    pub verbose: bool,
}

impl DiagnosticSink for StderrSink {
    fn emit(&mut self, notice: Notice) {
        if self.verbose || notice.level() >= Level::Info {
            eprintln!("{}", notice);
        }
    }
}

/// Emit a [`Notice::Dropped`] if `after` is smaller than `before`.
pub(crate) fn report_dropped(
    sink: &mut dyn DiagnosticSink,
    before: usize,
    after: usize,
    item: Item,
    table: &str,
    basis: &str,
) {
    let count = before.saturating_sub(after);
    if count > 0 {
        sink.emit(Notice::Dropped {
            count,
            item,
            table: table.to_string(),
            basis: basis.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_dropped_only_when_shrunk() {
        let mut notices: Vec<Notice> = Vec::new();
        report_dropped(&mut notices, 5, 5, Item::Sample, "count table", "sample metadata");
        assert!(notices.is_empty());

        report_dropped(&mut notices, 5, 3, Item::Sample, "count table", "sample metadata");
        assert_eq!(
            notices,
            vec![Notice::Dropped {
                count: 2,
                item: Item::Sample,
                table: "count table".to_string(),
                basis: "sample metadata".to_string(),
            }]
        );
        assert_eq!(
            notices[0].to_string(),
            "2 sample(s) in the count table were not present in the sample metadata. \
             These sample(s) have been removed from the visualization."
        );
    }

    #[test]
    fn test_levels_and_json() {
        let step = Notice::step("Ensured uniqueness of the count table.");
        assert_eq!(step.level(), Level::Debug);

        let removed = Notice::RemovedEmpty {
            count: 1,
            item: Item::Feature,
        };
        assert_eq!(removed.level(), Level::Info);
        assert_eq!(removed.to_string(), "Removed 1 empty feature(s).");
        assert_eq!(
            serde_json::to_string(&removed).unwrap(),
            r#"{"kind":"removed_empty","count":1,"item":"feature"}"#
        );
    }
}
