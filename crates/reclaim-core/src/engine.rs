// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Batch driver over the allocation pipeline.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::AllocationError;
use crate::index::ReferenceIndex;
use crate::model::{Invoice, ReportRow};
use crate::ports::{ReferenceData, ReferenceSource, ReportSink};
use crate::report::{InvoiceOutcome, ReportAssembler};

/// Counters for one run.
///
/// `skipped_invoices`, `dropped_branches` and `skipped_destinations` make the
/// silent-skip policies observable: each counts input that legitimately
/// produced no rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Invoices in the batch.
    pub invoices: usize,
    /// Invoices that were allocated (possibly to zero rows).
    pub processed_invoices: usize,
    /// Invoices with no transformation rule.
    pub skipped_invoices: usize,
    /// Invoices rejected with an [`AllocationError`].
    pub failed_invoices: usize,
    /// Report rows produced.
    pub rows: usize,
    /// Material-recycling branches dropped for lack of a distribution.
    pub dropped_branches: usize,
    /// Destinations dropped for lack of a downstream distance.
    pub skipped_destinations: usize,
}

/// Everything one run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    /// Rows of every processed invoice, in invoice order.
    pub rows: Vec<ReportRow>,
    /// Run counters.
    pub stats: RunStats,
    /// Rejected invoices, in invoice order.
    pub failures: Vec<AllocationError>,
}

impl RunReport {
    /// True when no invoice was rejected.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Hand the rows to `sink`.
    pub fn emit<S: ReportSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.write_rows(&self.rows)
    }

    fn record(&mut self, invoice: &Invoice, outcome: Result<InvoiceOutcome, AllocationError>) {
        match outcome {
            Ok(InvoiceOutcome::Reported(report)) => {
                self.stats.processed_invoices += 1;
                self.stats.dropped_branches += report.dropped_branches;
                self.stats.skipped_destinations += report.skipped_destinations;
                self.rows.extend(report.rows);
            }
            Ok(InvoiceOutcome::NoTransformation) => {
                debug!(
                    invoice = %invoice.invoice_id,
                    facility = %invoice.facility_id,
                    material = %invoice.material_code,
                    "no transformation configured; invoice skipped"
                );
                self.stats.skipped_invoices += 1;
            }
            Err(err) => {
                warn!(invoice = %invoice.invoice_id, error = %err, "invoice rejected");
                self.stats.failed_invoices += 1;
                self.failures.push(err);
            }
        }
    }

    fn finish(mut self, invoices: usize) -> Self {
        self.stats.invoices = invoices;
        self.stats.rows = self.rows.len();
        info!(
            invoices = self.stats.invoices,
            processed = self.stats.processed_invoices,
            skipped = self.stats.skipped_invoices,
            failed = self.stats.failed_invoices,
            rows = self.stats.rows,
            dropped_branches = self.stats.dropped_branches,
            skipped_destinations = self.stats.skipped_destinations,
            "allocation run complete"
        );
        self
    }
}

/// Emissions allocation engine: owns the reference index for one run.
///
/// The index is immutable once built; invoices share no state, so the
/// engine is `Sync` and invoices can be processed concurrently.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    index: ReferenceIndex,
}

impl Engine {
    /// Engine over already-loaded reference tables. Yield and share groups
    /// that do not sum to one are logged, not rejected.
    pub fn new(data: ReferenceData) -> Self {
        let index = ReferenceIndex::build(data);
        for diagnostic in index.diagnostics() {
            warn!(%diagnostic, "reference data inconsistency");
        }
        Self { index }
    }

    /// Engine over the tables produced by `source`.
    pub fn from_source<S: ReferenceSource>(source: &S) -> Result<Self, S::Error> {
        Ok(Self::new(source.load()?))
    }

    /// The reference index.
    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Rows for a single invoice. An invoice without transformation rules
    /// yields an empty vector.
    pub fn process_invoice(&self, invoice: &Invoice) -> Result<Vec<ReportRow>, AllocationError> {
        match ReportAssembler::new(&self.index).assemble(invoice)? {
            InvoiceOutcome::Reported(report) => Ok(report.rows),
            InvoiceOutcome::NoTransformation => Ok(Vec::new()),
        }
    }

    /// Allocate a batch, invoice by invoice.
    ///
    /// A rejected invoice contributes no rows and is listed in
    /// [`RunReport::failures`]; the rest of the batch still runs.
    #[instrument(skip_all, fields(invoices = invoices.len()))]
    pub fn run(&self, invoices: &[Invoice]) -> RunReport {
        let assembler = ReportAssembler::new(&self.index);
        let mut report = RunReport::default();
        for invoice in invoices {
            report.record(invoice, assembler.assemble(invoice));
        }
        report.finish(invoices.len())
    }

    /// Like [`Engine::run`], with invoices allocated on the rayon pool.
    ///
    /// Results are folded back in invoice order, so the report is identical
    /// to the sequential one.
    #[cfg(feature = "parallel")]
    #[instrument(skip_all, fields(invoices = invoices.len()))]
    pub fn run_parallel(&self, invoices: &[Invoice]) -> RunReport {
        use rayon::prelude::*;

        let assembler = ReportAssembler::new(&self.index);
        let outcomes: Vec<_> = invoices
            .par_iter()
            .map(|invoice| assembler.assemble(invoice))
            .collect();

        let mut report = RunReport::default();
        for (invoice, outcome) in invoices.iter().zip(outcomes) {
            report.record(invoice, outcome);
        }
        report.finish(invoices.len())
    }
}
