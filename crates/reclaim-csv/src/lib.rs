// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flat-file adapters around the allocation engine.
//!
//! `reclaim-core` never touches the filesystem; this crate implements its
//! boundary ports over CSV input and JSON output:
//!
//! - [`CsvReferenceSource`] implements `ReferenceSource` over a directory of
//!   reference tables.
//! - [`CsvInvoiceSource`] implements `InvoiceSource` over one invoice file.
//! - [`JsonReportSink`] implements `ReportSink` for any `io::Write`.
//!
//! # Missing Tables
//!
//! A missing reference table loads as empty: the engine treats absent
//! reference rows as zero or skip, so an absent file is the same as an empty
//! one. Each missing table is logged at `warn`. A missing invoice file is an
//! error.
#![forbid(unsafe_code)]

mod error;
mod reference;
mod sink;
mod table;

pub use error::IngestError;
pub use reference::{tables, CsvInvoiceSource, CsvReferenceSource};
pub use sink::JsonReportSink;
pub use table::read_table;
