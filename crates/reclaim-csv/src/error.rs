// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ingestion and report-writing errors.

use std::path::PathBuf;

/// Errors raised while reading tables or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A file could not be opened or read.
    #[error("[INGEST_IO] {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A record did not match its table's columns or types.
    #[error("[INGEST_PARSE] {}:{line}: {source}", path.display())]
    Parse {
        /// File being read.
        path: PathBuf,
        /// 1-based line of the offending record (0 when unknown).
        line: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// Report rows could not be encoded.
    #[error("[REPORT_ENCODE] {0}")]
    Encode(#[from] serde_json::Error),
    /// Report output could not be written.
    #[error("[REPORT_IO] {0}")]
    Write(#[from] std::io::Error),
}
