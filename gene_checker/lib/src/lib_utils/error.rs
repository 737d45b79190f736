// errors surfaced by the block filter

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::output::FilterSummary;

#[derive(Debug, Error)]
pub enum FilterError {
    /// fewer than 4 tab separated fields, or a size column that is not a number
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord {
        line: usize,
        reason: String,
        raw: String,
    },
    #[error("unable to read {path:?}: {source}")]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to write {path:?}: {source}")]
    UnwritableDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("worker stopped before delivering block #{0}")]
    WorkerLost(usize),
}

/// A run that stopped before every block was resolved.
/// `summary.completed` is always false; its counters cover the blocks
/// already written before the failure.
#[derive(Debug, Error)]
#[error("filtering aborted: {source}")]
pub struct AbortedRun {
    pub summary: FilterSummary,
    #[source]
    pub source: FilterError,
}
