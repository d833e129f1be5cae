// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted defaults for report runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config key under which [`RunPrefs`] are stored.
pub const RUN_PREFS_KEY: &str = "run_prefs";

/// Saved defaults for `reclaim report` and friends. Command-line flags
/// override every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPrefs {
    /// Directory holding the reference CSV tables.
    pub data_dir: PathBuf,
    /// Where the JSON report goes; stdout when unset.
    pub output: Option<PathBuf>,
    /// Allocate invoices in parallel.
    pub parallel: bool,
    /// Treat any rejected invoice as a failed run.
    pub strict: bool,
}

impl Default for RunPrefs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output: Some(PathBuf::from("output/recycling_reports.json")),
            parallel: false,
            strict: false,
        }
    }
}
