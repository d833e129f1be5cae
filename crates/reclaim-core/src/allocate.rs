// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Output-volume fan-out and proportional emissions allocation.
//!
//! Processing and inbound transport emissions depend only on what was
//! delivered, not on what it became. Both are computed once per invoice and
//! split across output branches in proportion to each branch's share of the
//! total output volume.

use crate::error::{is_fraction, AllocationError};
use crate::index::ReferenceIndex;
use crate::model::{Invoice, TransformationRule};

/// Volume and allocated emissions of one output material.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Branch {
    /// Output volume in tonnes.
    pub output_volume: f64,
    /// Share of the invoice's processing emissions (kg CO2e).
    pub processing: f64,
    /// Share of the invoice's inbound transport emissions (kg CO2e).
    pub inbound: f64,
}

/// Per-invoice allocation state, keyed by output material code.
///
/// When several rules of one group name the same output material, the later
/// rule's volume replaces the earlier one and the material keeps the position
/// of its first appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllocationResult {
    branches: Vec<(String, Branch)>,
    /// Invoice volume times the facility/material processing factor.
    pub total_processing: f64,
    /// Invoice volume times upstream distance times transport factor.
    pub total_inbound: f64,
    /// Sum of all branch output volumes.
    pub total_output_volume: f64,
}

impl AllocationResult {
    /// Branch for `output_material_code`, if any rule produced it.
    pub fn branch(&self, output_material_code: &str) -> Option<&Branch> {
        self.branches
            .iter()
            .find(|(code, _)| code == output_material_code)
            .map(|(_, b)| b)
    }

    /// Branches in first-appearance order.
    pub fn branches(&self) -> impl Iterator<Item = (&str, &Branch)> {
        self.branches.iter().map(|(code, b)| (code.as_str(), b))
    }

    /// Number of distinct output materials.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// True when no rule produced any output.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    fn upsert_volume(&mut self, code: &str, output_volume: f64) {
        if let Some((_, branch)) = self.branches.iter_mut().find(|(c, _)| c == code) {
            branch.output_volume = output_volume;
        } else {
            self.branches.push((
                code.to_owned(),
                Branch {
                    output_volume,
                    ..Branch::default()
                },
            ));
        }
    }
}

/// Rejects invoices whose volume is not a finite positive number.
pub(crate) fn validate_invoice(invoice: &Invoice) -> Result<(), AllocationError> {
    if invoice.volume.is_finite() && invoice.volume > 0.0 {
        Ok(())
    } else {
        Err(AllocationError::InvalidVolume {
            invoice_id: invoice.invoice_id.clone(),
            volume: invoice.volume,
        })
    }
}

/// Computes output volumes and allocated emissions for one invoice.
#[derive(Clone, Copy, Debug)]
pub struct Allocator<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> Allocator<'a> {
    /// Allocator over `index`.
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    /// Processing emissions of the whole delivery (kg CO2e).
    pub fn total_processing(&self, invoice: &Invoice) -> f64 {
        invoice.volume * self.index.processing_factor(&invoice.facility_id, &invoice.material_code)
    }

    /// Inbound transport emissions of the whole delivery (kg CO2e); 0 without an
    /// upstream distance.
    pub fn total_inbound(&self, invoice: &Invoice) -> f64 {
        self.index
            .upstream_distance(&invoice.customer_id, &invoice.facility_id)
            .map_or(0.0, |ud| {
                invoice.volume * ud.distance_km * self.index.transport_factor(&ud.mode_of_transport)
            })
    }

    /// Fan `invoice` out over `rules` and split its emission totals by volume share.
    ///
    /// Fails without partial output if the invoice volume or any yield fraction
    /// violates its contract.
    pub fn allocate(
        &self,
        invoice: &Invoice,
        rules: &[TransformationRule],
    ) -> Result<AllocationResult, AllocationError> {
        validate_invoice(invoice)?;

        let mut result = AllocationResult::default();
        for rule in rules {
            if !is_fraction(rule.yield_fraction) {
                return Err(AllocationError::InvalidYield {
                    invoice_id: invoice.invoice_id.clone(),
                    input_material_code: rule.input_material_code.clone(),
                    output_material_code: rule.output_material_code.clone(),
                    yield_fraction: rule.yield_fraction,
                });
            }
            result.upsert_volume(&rule.output_material_code, invoice.volume * rule.yield_fraction);
        }

        result.total_output_volume = result.branches.iter().map(|(_, b)| b.output_volume).sum();
        result.total_processing = self.total_processing(invoice);
        result.total_inbound = self.total_inbound(invoice);

        let total = result.total_output_volume;
        let (processing, inbound) = (result.total_processing, result.total_inbound);
        for (_, branch) in &mut result.branches {
            let share = if total > 0.0 { branch.output_volume / total } else { 0.0 };
            branch.processing = share * processing;
            branch.inbound = share * inbound;
        }
        Ok(result)
    }
}
