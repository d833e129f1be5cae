// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Directory-of-CSV reference source and invoice file source.

use std::path::{Path, PathBuf};

use reclaim_core::{Invoice, InvoiceSource, ReferenceData, ReferenceSource};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::IngestError;
use crate::table::read_table;

/// File names of the reference tables inside a data directory.
pub mod tables {
    /// Material catalog.
    pub const MATERIALS: &str = "Material.csv";
    /// Facility catalog.
    pub const FACILITIES: &str = "Facility.csv";
    /// Transformation rules.
    pub const TRANSFORMATIONS: &str = "MaterialTransformation.csv";
    /// Processing emission factors.
    pub const PROCESSING_FACTORS: &str = "EmissionFactorProcessing.csv";
    /// Geographic output distributions.
    pub const GEO_DISTRIBUTIONS: &str = "EstimatedOutputDistributionGeo.csv";
    /// Transport emission factors.
    pub const TRANSPORT_FACTORS: &str = "TransportEmissionFactor.csv";
    /// Facility to destination distances.
    pub const DOWNSTREAM_DISTANCES: &str = "AverageDownstreamDistances.csv";
    /// Customer to facility distances.
    pub const UPSTREAM_DISTANCES: &str = "AverageUpstreamDistances.csv";
    /// Virgin-production benchmarks.
    pub const VIRGIN_BENCHMARKS: &str = "VirginMaterialProductionBenchmark.csv";
    /// Country to region lookup.
    pub const REGIONS: &str = "GeographicRegion.csv";

    /// Every table, in load order.
    pub const ALL: [&str; 10] = [
        MATERIALS,
        FACILITIES,
        TRANSFORMATIONS,
        PROCESSING_FACTORS,
        GEO_DISTRIBUTIONS,
        TRANSPORT_FACTORS,
        DOWNSTREAM_DISTANCES,
        UPSTREAM_DISTANCES,
        VIRGIN_BENCHMARKS,
        REGIONS,
    ];
}

/// Reads every reference table from one directory.
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    dir: PathBuf,
}

impl CsvReferenceSource {
    /// Source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the tables are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Table names with no file in the directory.
    pub fn missing_tables(&self) -> Vec<&'static str> {
        tables::ALL
            .into_iter()
            .filter(|name| !self.dir.join(name).is_file())
            .collect()
    }

    fn table<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, IngestError> {
        let path = self.dir.join(name);
        match read_table(&path)? {
            Some(rows) => {
                debug!(table = name, rows = rows.len(), "loaded reference table");
                Ok(rows)
            }
            None => {
                warn!(
                    table = name,
                    dir = %self.dir.display(),
                    "reference table missing; using empty table"
                );
                Ok(Vec::new())
            }
        }
    }
}

impl ReferenceSource for CsvReferenceSource {
    type Error = IngestError;

    fn load(&self) -> Result<ReferenceData, Self::Error> {
        let data = ReferenceData {
            materials: self.table(tables::MATERIALS)?,
            facilities: self.table(tables::FACILITIES)?,
            transformations: self.table(tables::TRANSFORMATIONS)?,
            processing_factors: self.table(tables::PROCESSING_FACTORS)?,
            geo_distributions: self.table(tables::GEO_DISTRIBUTIONS)?,
            transport_factors: self.table(tables::TRANSPORT_FACTORS)?,
            downstream_distances: self.table(tables::DOWNSTREAM_DISTANCES)?,
            upstream_distances: self.table(tables::UPSTREAM_DISTANCES)?,
            virgin_benchmarks: self.table(tables::VIRGIN_BENCHMARKS)?,
            regions: self.table(tables::REGIONS)?,
        };
        info!(
            dir = %self.dir.display(),
            transformations = data.transformations.len(),
            geo_distributions = data.geo_distributions.len(),
            "reference data loaded"
        );
        Ok(data)
    }
}

/// Reads invoices from a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvInvoiceSource {
    path: PathBuf,
}

impl CsvInvoiceSource {
    /// Source over the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the invoices are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InvoiceSource for CsvInvoiceSource {
    type Error = IngestError;

    fn invoices(&self) -> Result<Vec<Invoice>, Self::Error> {
        let invoices = read_table(&self.path)?.ok_or_else(|| IngestError::Io {
            path: self.path.clone(),
            source: std::io::ErrorKind::NotFound.into(),
        })?;
        info!(path = %self.path.display(), invoices = invoices.len(), "invoices loaded");
        Ok(invoices)
    }
}
