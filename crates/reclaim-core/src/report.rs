// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Report assembly: one invoice in, ordered report rows out.

use tracing::warn;

use crate::allocate::{validate_invoice, Allocator, Branch};
use crate::error::AllocationError;
use crate::geo::GeoFanOut;
use crate::index::ReferenceIndex;
use crate::model::{Invoice, ReportRow, TransformationRule, NO_DESTINATION};
use crate::resolver::TransformationResolver;

/// Rows produced for one invoice plus what was left out of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceReport {
    /// Rows in rule order, then distribution order.
    pub rows: Vec<ReportRow>,
    /// Material-recycling branches with no configured distribution.
    pub dropped_branches: usize,
    /// Destinations dropped for lack of a downstream distance.
    pub skipped_destinations: usize,
}

/// What happened to one invoice.
#[derive(Clone, Debug, PartialEq)]
pub enum InvoiceOutcome {
    /// No transformation rule for the invoice's facility and material.
    NoTransformation,
    /// The invoice was allocated.
    Reported(InvoiceReport),
}

/// Drives resolver, allocator and fan-out for single invoices.
#[derive(Clone, Copy, Debug)]
pub struct ReportAssembler<'a> {
    resolver: TransformationResolver<'a>,
    allocator: Allocator<'a>,
    geo: GeoFanOut<'a>,
}

impl<'a> ReportAssembler<'a> {
    /// Assembler over `index`.
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self {
            resolver: TransformationResolver::new(index),
            allocator: Allocator::new(index),
            geo: GeoFanOut::new(index),
        }
    }

    /// Produce the rows of `invoice`.
    ///
    /// All-or-nothing: a contract violation anywhere in the invoice discards
    /// the rows built so far. The volume is checked even when no rule applies.
    pub fn assemble(&self, invoice: &Invoice) -> Result<InvoiceOutcome, AllocationError> {
        validate_invoice(invoice)?;
        let rules = self.resolver.resolve(&invoice.facility_id, &invoice.material_code);
        if rules.is_empty() {
            return Ok(InvoiceOutcome::NoTransformation);
        }
        let allocation = self.allocator.allocate(invoice, rules)?;

        let mut report = InvoiceReport::default();
        for rule in rules {
            let Some(branch) = allocation.branch(&rule.output_material_code) else {
                continue;
            };
            let row = BranchRow { invoice, rule, branch };

            if !rule.category.is_distributed() {
                report
                    .rows
                    .push(row.emit(NO_DESTINATION, branch.output_volume, 0.0, 0.0));
                continue;
            }

            let distribution =
                self.geo
                    .distribute(invoice, &rule.output_material_code, branch.output_volume)?;
            if !distribution.configured {
                warn!(
                    invoice = %invoice.invoice_id,
                    output = %rule.output_material_code,
                    volume = branch.output_volume,
                    "material-recycling output has no geographic distribution; branch dropped"
                );
                report.dropped_branches += 1;
                continue;
            }
            report.skipped_destinations += distribution.skipped;
            report.rows.extend(distribution.destinations.iter().map(|d| {
                row.emit(&d.country, d.volume, d.outbound, d.benchmark)
            }));
        }
        Ok(InvoiceOutcome::Reported(report))
    }
}

struct BranchRow<'r> {
    invoice: &'r Invoice,
    rule: &'r TransformationRule,
    branch: &'r Branch,
}

impl BranchRow<'_> {
    fn emit(
        &self,
        destination: &str,
        destination_volume: f64,
        outbound: f64,
        benchmark: f64,
    ) -> ReportRow {
        ReportRow {
            invoice_id: self.invoice.invoice_id.clone(),
            customer_id: self.invoice.customer_id.clone(),
            delivery_date: self.invoice.delivery_date.clone(),
            facility_id: self.invoice.facility_id.clone(),
            input_material_code: self.invoice.material_code.clone(),
            output_material_code: self.rule.output_material_code.clone(),
            category: self.rule.category,
            volume_delivered: self.invoice.volume,
            output_volume: self.branch.output_volume,
            processing_emissions: self.branch.processing,
            inbound_transport_emissions: self.branch.inbound,
            outbound_transport_emissions: outbound,
            total_transport_emissions: self.branch.inbound + outbound,
            benchmark_emissions: benchmark,
            destination_country: destination.to_owned(),
            destination_volume,
        }
    }
}
