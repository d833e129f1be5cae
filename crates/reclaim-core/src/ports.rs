// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Boundary ports: where reference data and invoices come from, and where
//! report rows go. The engine never performs I/O itself.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::model::{
    DownstreamDistance, Facility, GeographicRegion, Invoice, Material, OutputGeoDistribution,
    ProcessingEmissionFactor, ReportRow, TransformationRule, TransportEmissionFactor,
    UpstreamDistance, VirginBenchmark,
};

/// Every reference table for one run, in provider order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Material catalog.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Facility catalog.
    #[serde(default)]
    pub facilities: Vec<Facility>,
    /// Transformation rules; order determines report row order.
    #[serde(default)]
    pub transformations: Vec<TransformationRule>,
    /// Processing emission factors.
    #[serde(default)]
    pub processing_factors: Vec<ProcessingEmissionFactor>,
    /// Geographic output distributions; order determines destination row order.
    #[serde(default)]
    pub geo_distributions: Vec<OutputGeoDistribution>,
    /// Transport emission factors.
    #[serde(default)]
    pub transport_factors: Vec<TransportEmissionFactor>,
    /// Facility to destination distances.
    #[serde(default)]
    pub downstream_distances: Vec<DownstreamDistance>,
    /// Customer to facility distances.
    #[serde(default)]
    pub upstream_distances: Vec<UpstreamDistance>,
    /// Virgin-production benchmarks.
    #[serde(default)]
    pub virgin_benchmarks: Vec<VirginBenchmark>,
    /// Country to region lookup.
    #[serde(default)]
    pub regions: Vec<GeographicRegion>,
}

/// Supplies the reference tables for one run.
pub trait ReferenceSource {
    /// Error raised while producing the tables.
    type Error;

    /// Load every reference table. Called once per run.
    fn load(&self) -> Result<ReferenceData, Self::Error>;
}

impl ReferenceSource for ReferenceData {
    type Error = Infallible;

    fn load(&self) -> Result<ReferenceData, Self::Error> {
        Ok(self.clone())
    }
}

/// Supplies the invoices for one run, in report order.
pub trait InvoiceSource {
    /// Error raised while producing invoices.
    type Error;

    /// Load all invoices.
    fn invoices(&self) -> Result<Vec<Invoice>, Self::Error>;
}

impl InvoiceSource for Vec<Invoice> {
    type Error = Infallible;

    fn invoices(&self) -> Result<Vec<Invoice>, Self::Error> {
        Ok(self.clone())
    }
}

/// Accepts the ordered rows produced by one run.
pub trait ReportSink {
    /// Error raised while writing.
    type Error;

    /// Write the rows. Row order is report order.
    fn write_rows(&mut self, rows: &[ReportRow]) -> Result<(), Self::Error>;
}

impl ReportSink for Vec<ReportRow> {
    type Error = Infallible;

    fn write_rows(&mut self, rows: &[ReportRow]) -> Result<(), Self::Error> {
        self.extend_from_slice(rows);
        Ok(())
    }
}
