// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON report output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use reclaim_core::{ReportRow, ReportSink};

use crate::error::IngestError;

/// Writes report rows as one pretty-printed JSON array.
#[derive(Debug)]
pub struct JsonReportSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonReportSink<W> {
    /// Sink over `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonReportSink<BufWriter<File>> {
    /// Sink writing to `path`, creating parent directories as needed.
    /// An existing file is truncated.
    pub fn create(path: &Path) -> Result<Self, IngestError> {
        let io_err = |source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportSink for JsonReportSink<W> {
    type Error = IngestError;

    fn write_rows(&mut self, rows: &[ReportRow]) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut self.writer, rows)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
