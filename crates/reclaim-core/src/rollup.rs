// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Regional rollup of report rows.
//!
//! Report rows repeat branch-level figures (processing and inbound transport)
//! on every destination row of that branch. Summing them naively would count a
//! branch once per destination, so the rollup attributes branch-level figures
//! to each destination in proportion to `destination_volume / output_volume`.
//! Destination-level figures (outbound transport, benchmark) are summed as-is.
//!
//! Rules of one group that name the same output share a single branch and emit
//! identical rows; only the first row per (invoice, output, destination) is
//! folded in.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::index::ReferenceIndex;
use crate::model::{Category, ReportRow, NO_DESTINATION};

/// Region label for countries missing from the region table.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Totals for one (region, category) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionSummary {
    /// Region, [`NO_DESTINATION`] for undistributed branches, or [`UNKNOWN_REGION`].
    pub region: String,
    /// Output category.
    pub category: Category,
    /// Tonnes shipped to (or accounted under) the region.
    pub volume: f64,
    /// Processing emissions attributed to that volume (kg CO2e).
    pub processing_emissions: f64,
    /// Inbound plus outbound transport emissions (kg CO2e).
    pub transport_emissions: f64,
    /// Virgin-production benchmark emissions (kg CO2e).
    pub benchmark_emissions: f64,
    /// Report rows folded into this summary.
    pub rows: usize,
}

impl RegionSummary {
    fn empty(region: String, category: Category) -> Self {
        Self {
            region,
            category,
            volume: 0.0,
            processing_emissions: 0.0,
            transport_emissions: 0.0,
            benchmark_emissions: 0.0,
            rows: 0,
        }
    }

    /// Benchmark minus generated (processing + transport) emissions; positive
    /// when recycling beat virgin production.
    pub fn net_avoided(&self) -> f64 {
        self.benchmark_emissions - self.processing_emissions - self.transport_emissions
    }
}

fn region_for<'a>(row: &ReportRow, index: &'a ReferenceIndex) -> &'a str {
    if row.destination_country == NO_DESTINATION {
        return NO_DESTINATION;
    }
    index
        .region_of(&row.destination_country)
        .unwrap_or(UNKNOWN_REGION)
}

/// Fold `rows` into per-(region, category) totals, sorted by region then category.
pub fn summarize(rows: &[ReportRow], index: &ReferenceIndex) -> Vec<RegionSummary> {
    let mut totals: BTreeMap<(String, Category), RegionSummary> = BTreeMap::new();
    let mut seen = FxHashSet::default();
    for row in rows {
        let key = (
            row.invoice_id.as_str(),
            row.output_material_code.as_str(),
            row.destination_country.as_str(),
        );
        if !seen.insert(key) {
            continue;
        }
        let region = region_for(row, index).to_owned();
        let weight = if row.output_volume > 0.0 {
            row.destination_volume / row.output_volume
        } else {
            0.0
        };
        let entry = totals
            .entry((region.clone(), row.category))
            .or_insert_with(|| RegionSummary::empty(region, row.category));
        entry.volume += row.destination_volume;
        entry.processing_emissions += weight * row.processing_emissions;
        entry.transport_emissions +=
            weight * row.inbound_transport_emissions + row.outbound_transport_emissions;
        entry.benchmark_emissions += row.benchmark_emissions;
        entry.rows += 1;
    }
    totals.into_values().collect()
}
