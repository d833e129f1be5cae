// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Allocation errors.

/// Contract violations detected while processing one invoice.
///
/// Every variant names the affected invoice. Missing reference data is never
/// reported here; see the crate-level absence semantics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    /// Invoice volume was zero, negative, or not finite.
    #[error("[INVALID_VOLUME] invoice {invoice_id}: volume {volume} must be finite and positive")]
    InvalidVolume {
        /// Affected invoice.
        invoice_id: String,
        /// Offending volume.
        volume: f64,
    },
    /// A transformation rule carried a yield fraction outside `[0, 1]`.
    #[error(
        "[INVALID_YIELD] invoice {invoice_id}: yield {yield_fraction} for \
         {input_material_code} -> {output_material_code} is outside [0, 1]"
    )]
    InvalidYield {
        /// Affected invoice.
        invoice_id: String,
        /// Input material of the rule.
        input_material_code: String,
        /// Output material of the rule.
        output_material_code: String,
        /// Offending yield fraction.
        yield_fraction: f64,
    },
    /// A geographic distribution entry carried a share outside `[0, 1]`.
    #[error(
        "[INVALID_SHARE] invoice {invoice_id}: share {share} for \
         {output_material_code} -> {destination_country} is outside [0, 1]"
    )]
    InvalidShare {
        /// Affected invoice.
        invoice_id: String,
        /// Output material of the distribution entry.
        output_material_code: String,
        /// Destination of the distribution entry.
        destination_country: String,
        /// Offending share.
        share: f64,
    },
}

impl AllocationError {
    /// Identifier of the invoice that failed.
    pub fn invoice_id(&self) -> &str {
        match self {
            Self::InvalidVolume { invoice_id, .. }
            | Self::InvalidYield { invoice_id, .. }
            | Self::InvalidShare { invoice_id, .. } => invoice_id,
        }
    }
}

/// Returns true when `value` is a finite fraction in `[0, 1]`.
pub(crate) fn is_fraction(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
