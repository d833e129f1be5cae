// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Emissions allocation engine for recycling-facility invoices.
//!
//! Each invoice flows through a fixed pipeline:
//!
//! 1. [`TransformationResolver`] finds the transformation rules for the
//!    invoice's facility and input material.
//! 2. [`Allocator`] fans the input volume out into output volumes and splits
//!    the facility-level processing and inbound transport totals across those
//!    outputs by volume share.
//! 3. [`GeoFanOut`] splits material-recycling outputs across destination
//!    countries and computes outbound transport and benchmark emissions.
//! 4. [`ReportAssembler`] flattens the result into [`ReportRow`]s.
//!
//! [`Engine`] drives the pipeline over a batch and keeps [`RunStats`].
//!
//! # Absence Semantics
//!
//! Missing optional reference data is never an error. Absent processing
//! factors, transport factors and benchmarks count as zero, an absent
//! upstream distance zeroes inbound emissions, an absent downstream distance
//! skips that destination, and an invoice without transformation rules
//! produces no rows. Errors ([`AllocationError`]) are reserved for contract
//! violations in the input: non-positive volumes, and yield fractions or
//! distribution shares outside `[0, 1]`.
//!
//! # Ordering
//!
//! Output order is fully determined by input order: invoices in batch order,
//! rules in reference order, destinations in distribution order. No public
//! API exposes hash-map iteration order.
#![forbid(unsafe_code)]

mod allocate;
mod engine;
mod error;
mod geo;
mod index;
mod model;
mod ports;
mod report;
mod resolver;
pub mod rollup;

pub use allocate::{AllocationResult, Allocator, Branch};
pub use engine::{Engine, RunReport, RunStats};
pub use error::AllocationError;
pub use geo::{Destination, Distribution, GeoFanOut};
pub use index::{Diagnostic, ReferenceIndex, SUM_TOLERANCE};
pub use model::{
    Category, DownstreamDistance, Facility, GeographicRegion, Invoice, Material,
    OutputGeoDistribution, ProcessingEmissionFactor, ReportRow, TransformationRule,
    TransportEmissionFactor, UpstreamDistance, VirginBenchmark, NO_DESTINATION,
};
pub use ports::{InvoiceSource, ReferenceData, ReferenceSource, ReportSink};
pub use report::{InvoiceOutcome, InvoiceReport, ReportAssembler};
pub use resolver::TransformationResolver;
