// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Geographic fan-out of material-recycling outputs.

use crate::error::{is_fraction, AllocationError};
use crate::index::ReferenceIndex;
use crate::model::Invoice;

/// One destination of an output branch.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    /// Destination country.
    pub country: String,
    /// Output volume shipped there (t).
    pub volume: f64,
    /// Outbound transport emissions for that volume (kg CO2e).
    pub outbound: f64,
    /// Virgin-production benchmark for that volume (kg CO2e).
    pub benchmark: f64,
}

/// Result of distributing one output branch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distribution {
    /// Destinations with a configured downstream distance, in distribution order.
    pub destinations: Vec<Destination>,
    /// Distribution entries dropped for lack of a downstream distance.
    pub skipped: usize,
    /// False when the output material has no distribution at all. The branch
    /// then yields no rows and its volume leaves the report.
    pub configured: bool,
}

/// Splits output volumes across destination countries.
#[derive(Clone, Copy, Debug)]
pub struct GeoFanOut<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> GeoFanOut<'a> {
    /// Fan-out over `index`.
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    /// Distribute `output_volume` of `output_material_code` produced for `invoice`.
    ///
    /// Outbound emissions use the facility-to-country distance and the factor of
    /// that leg's transport mode; there is no zero fallback for a missing
    /// distance, the destination is skipped instead.
    pub fn distribute(
        &self,
        invoice: &Invoice,
        output_material_code: &str,
        output_volume: f64,
    ) -> Result<Distribution, AllocationError> {
        let entries = self.index.geo_distribution(output_material_code);
        let mut out = Distribution {
            configured: !entries.is_empty(),
            ..Distribution::default()
        };
        let benchmark = self.index.virgin_benchmark(output_material_code);

        for entry in entries {
            if !is_fraction(entry.share) {
                return Err(AllocationError::InvalidShare {
                    invoice_id: invoice.invoice_id.clone(),
                    output_material_code: output_material_code.to_owned(),
                    destination_country: entry.destination_country.clone(),
                    share: entry.share,
                });
            }
            let Some(leg) = self
                .index
                .downstream_distance(&invoice.facility_id, &entry.destination_country)
            else {
                out.skipped += 1;
                continue;
            };
            let volume = output_volume * entry.share;
            let factor = self.index.transport_factor(&leg.mode_of_transport);
            out.destinations.push(Destination {
                country: entry.destination_country.clone(),
                volume,
                outbound: volume * leg.distance_km * factor,
                benchmark: benchmark * volume,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        DownstreamDistance, OutputGeoDistribution, TransportEmissionFactor, VirginBenchmark,
    };
    use crate::ports::ReferenceData;

    fn invoice() -> Invoice {
        Invoice {
            invoice_id: "INV002".into(),
            customer_id: "Supplier002".into(),
            delivery_date: "2023-10-02".into(),
            facility_id: "F001".into(),
            material_code: "M001".into(),
            volume: 4000.0,
        }
    }

    fn leg(country: &str, km: f64, mode: &str) -> DownstreamDistance {
        DownstreamDistance {
            facility_id: "F001".into(),
            destination_country: country.into(),
            distance_km: km,
            mode_of_transport: mode.into(),
        }
    }

    fn share(country: &str, share: f64) -> OutputGeoDistribution {
        OutputGeoDistribution {
            output_material_code: "M002".into(),
            destination_country: country.into(),
            share,
        }
    }

    fn index(distribution: Vec<OutputGeoDistribution>) -> ReferenceIndex {
        ReferenceIndex::build(ReferenceData {
            geo_distributions: distribution,
            downstream_distances: vec![
                leg("Norway", 500.0, "Truck"),
                leg("Germany", 1500.0, "Rail"),
                leg("China", 20000.0, "Ship"),
            ],
            transport_factors: vec![
                TransportEmissionFactor {
                    mode_of_transport: "Truck".into(),
                    factor: 0.05,
                },
                TransportEmissionFactor {
                    mode_of_transport: "Rail".into(),
                    factor: 0.02,
                },
            ],
            virgin_benchmarks: vec![VirginBenchmark {
                material_code: "M002".into(),
                emissions_per_tonne: 3056.0,
            }],
            ..ReferenceData::default()
        })
    }

    #[test]
    fn computes_outbound_and_benchmark_per_destination() {
        let index = index(vec![share("Norway", 0.5), share("Germany", 0.5)]);
        let d = GeoFanOut::new(&index).distribute(&invoice(), "M002", 1000.0).unwrap();
        assert!(d.configured);
        assert_eq!(d.skipped, 0);
        assert_eq!(d.destinations.len(), 2);

        let norway = &d.destinations[0];
        assert_eq!(norway.country, "Norway");
        assert!((norway.volume - 500.0).abs() < 1e-9);
        assert!((norway.outbound - 12_500.0).abs() < 1e-6);
        assert!((norway.benchmark - 1_528_000.0).abs() < 1e-6);

        let germany = &d.destinations[1];
        assert!((germany.outbound - 15_000.0).abs() < 1e-6);
    }

    #[test]
    fn missing_mode_factor_counts_as_zero() {
        // China is shipped by "Ship", which has no factor configured.
        let index = index(vec![share("China", 1.0)]);
        let d = GeoFanOut::new(&index).distribute(&invoice(), "M002", 10.0).unwrap();
        assert_eq!(d.destinations.len(), 1);
        assert!(d.destinations[0].outbound.abs() < f64::EPSILON);
    }

    #[test]
    fn destinations_without_distance_are_skipped() {
        let index = index(vec![share("Norway", 0.5), share("Sweden", 0.5)]);
        let d = GeoFanOut::new(&index).distribute(&invoice(), "M002", 100.0).unwrap();
        assert_eq!(d.destinations.len(), 1);
        assert_eq!(d.skipped, 1);
    }

    #[test]
    fn unconfigured_material_yields_nothing() {
        let index = index(vec![]);
        let d = GeoFanOut::new(&index).distribute(&invoice(), "M002", 100.0).unwrap();
        assert!(!d.configured);
        assert!(d.destinations.is_empty());
    }

    #[test]
    fn rejects_share_outside_unit_interval() {
        let index = index(vec![share("Norway", 1.2)]);
        let err = GeoFanOut::new(&index).distribute(&invoice(), "M002", 100.0).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::InvalidShare { ref destination_country, .. }
                if destination_country == "Norway"
        ));
        assert_eq!(err.invoice_id(), "INV002");
    }
}
