// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference records, invoices and report rows.
//!
//! Field aliases accept the legacy column names used by the flat-file
//! reference tables (`percentage`, `emission_factor`, `average_distance`, ...)
//! so the same types deserialize from either spelling.

use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// Destination label for branches that are not distributed geographically.
pub const NO_DESTINATION: &str = "N/A";

/// Reference-table numbers; rejects `NaN` and infinities.
fn finite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(D::Error::custom(format_args!("expected a finite number, found {value}")))
    }
}

/// Classification of an output branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Sellable recycled material; fanned out across destination countries.
    #[serde(rename = "Material Recycling", alias = "MaterialRecycling")]
    MaterialRecycling,
    /// Energy recovery; no destination fan-out.
    #[serde(rename = "Energy Recycling", alias = "EnergyRecycling")]
    EnergyRecycling,
    /// Unrecovered mass; no destination fan-out.
    Losses,
}

impl Category {
    /// Whether branches of this category are split across destination countries.
    pub fn is_distributed(self) -> bool {
        matches!(self, Self::MaterialRecycling)
    }

    /// Human-readable label (matches the serialized form).
    pub fn label(self) -> &'static str {
        match self {
            Self::MaterialRecycling => "Material Recycling",
            Self::EnergyRecycling => "Energy Recycling",
            Self::Losses => "Losses",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Material catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material code referenced by every other table.
    pub code: String,
    /// Free-text description.
    pub description: String,
}

/// Facility catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Facility identifier.
    #[serde(alias = "facility_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Location, typically "City, Country".
    pub location: String,
}

/// One output of processing an input material at a facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformationRule {
    /// Facility performing the transformation.
    pub facility_id: String,
    /// Material received.
    pub input_material_code: String,
    /// Material produced.
    pub output_material_code: String,
    /// Fraction of the input volume that becomes this output, in `[0, 1]`.
    #[serde(alias = "percentage", alias = "yield_percentage", deserialize_with = "finite")]
    pub yield_fraction: f64,
    /// Category of the output.
    pub category: Category,
}

/// Processing emission factor for a (facility, input material) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingEmissionFactor {
    /// Facility identifier.
    pub facility_id: String,
    /// Input material code.
    pub material_code: String,
    /// kg CO2e per tonne processed.
    #[serde(alias = "emission_factor", deserialize_with = "finite")]
    pub factor: f64,
}

/// Share of an output material sold to one destination country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputGeoDistribution {
    /// Output material code.
    pub output_material_code: String,
    /// Destination country.
    pub destination_country: String,
    /// Fraction of the output volume shipped there, in `[0, 1]`.
    #[serde(alias = "percentage", deserialize_with = "finite")]
    pub share: f64,
}

/// Emission factor for a mode of transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransportEmissionFactor {
    /// Mode of transport (e.g. "Truck", "Rail", "Ship").
    pub mode_of_transport: String,
    /// kg CO2e per tonne-km.
    #[serde(alias = "emission_factor", deserialize_with = "finite")]
    pub factor: f64,
}

/// Average outbound distance from a facility to a destination country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DownstreamDistance {
    /// Origin facility.
    pub facility_id: String,
    /// Destination country.
    pub destination_country: String,
    /// Distance in km.
    #[serde(alias = "average_distance", deserialize_with = "finite")]
    pub distance_km: f64,
    /// Mode of transport used on this leg.
    pub mode_of_transport: String,
}

/// Average inbound distance from a customer to a facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpstreamDistance {
    /// Delivering customer.
    pub customer_id: String,
    /// Receiving facility.
    pub facility_id: String,
    /// Distance in km.
    #[serde(alias = "inbound_average_distance", deserialize_with = "finite")]
    pub distance_km: f64,
    /// Mode of transport used on this leg.
    #[serde(alias = "inbound_mode_of_transport")]
    pub mode_of_transport: String,
}

/// Emissions of producing a material from virgin raw material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirginBenchmark {
    /// Material code.
    pub material_code: String,
    /// kg CO2e per tonne produced.
    #[serde(alias = "emissions", deserialize_with = "finite")]
    pub emissions_per_tonne: f64,
}

/// Country to region lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicRegion {
    /// Country name.
    pub country: String,
    /// Region the country rolls up to.
    pub region: String,
}

/// A delivery of input material to a facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice identifier.
    pub invoice_id: String,
    /// Delivering customer.
    pub customer_id: String,
    /// Delivery date, carried through verbatim.
    pub delivery_date: String,
    /// Receiving facility.
    pub facility_id: String,
    /// Delivered material.
    pub material_code: String,
    /// Delivered volume in tonnes; must be finite and positive.
    pub volume: f64,
}

/// One line of the emissions report: an (invoice, output material, destination) triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Source invoice.
    pub invoice_id: String,
    /// Delivering customer.
    pub customer_id: String,
    /// Delivery date of the invoice.
    pub delivery_date: String,
    /// Processing facility.
    pub facility_id: String,
    /// Material received.
    pub input_material_code: String,
    /// Material produced.
    pub output_material_code: String,
    /// Category of the produced material.
    pub category: Category,
    /// Invoice volume in tonnes.
    pub volume_delivered: f64,
    /// Volume of this output material in tonnes.
    pub output_volume: f64,
    /// Processing emissions allocated to this output (kg CO2e).
    pub processing_emissions: f64,
    /// Inbound transport emissions allocated to this output (kg CO2e).
    pub inbound_transport_emissions: f64,
    /// Outbound transport emissions to this destination (kg CO2e).
    pub outbound_transport_emissions: f64,
    /// Inbound plus outbound transport emissions (kg CO2e).
    pub total_transport_emissions: f64,
    /// Virgin-production benchmark for the destination volume (kg CO2e).
    #[serde(alias = "production_benchmark_emissions")]
    pub benchmark_emissions: f64,
    /// Destination country, or [`NO_DESTINATION`].
    pub destination_country: String,
    /// Volume shipped to this destination in tonnes.
    pub destination_volume: f64,
}
