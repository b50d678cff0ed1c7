//! Report artifacts: per-order CSV, queue-size CSV, aggregate summary,
//! and the capped console event trace.
//!
//! The engine itself never touches files; these writers consume the values
//! a run produced. Which artifacts are mandatory is the caller's policy:
//! the per-order records and the summary are required for a valid run,
//! while the trace and the sample series may be skipped with a warning.

mod csv;
mod summary;
mod trace;

pub use csv::{write_departures_csv, write_samples_csv};
pub use summary::write_summary;
pub use trace::TraceWriter;

use thiserror::Error;

/// Errors raised while producing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
