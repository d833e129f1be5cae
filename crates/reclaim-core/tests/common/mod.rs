// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use reclaim_core::{
    Category, DownstreamDistance, GeographicRegion, Invoice, OutputGeoDistribution,
    ProcessingEmissionFactor, ReferenceData, TransformationRule, TransportEmissionFactor,
    UpstreamDistance, VirginBenchmark,
};

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

pub fn invoice(id: &str, customer: &str, facility: &str, material: &str, volume: f64) -> Invoice {
    Invoice {
        invoice_id: id.into(),
        customer_id: customer.into(),
        delivery_date: "2023-10-01".into(),
        facility_id: facility.into(),
        material_code: material.into(),
        volume,
    }
}

pub fn rule(
    facility: &str,
    input: &str,
    output: &str,
    y: f64,
    category: Category,
) -> TransformationRule {
    TransformationRule {
        facility_id: facility.into(),
        input_material_code: input.into(),
        output_material_code: output.into(),
        yield_fraction: y,
        category,
    }
}

pub fn share(output: &str, country: &str, share: f64) -> OutputGeoDistribution {
    OutputGeoDistribution {
        output_material_code: output.into(),
        destination_country: country.into(),
        share,
    }
}

pub fn leg(facility: &str, country: &str, km: f64, mode: &str) -> DownstreamDistance {
    DownstreamDistance {
        facility_id: facility.into(),
        destination_country: country.into(),
        distance_km: km,
        mode_of_transport: mode.into(),
    }
}

pub fn mode(name: &str, factor: f64) -> TransportEmissionFactor {
    TransportEmissionFactor {
        mode_of_transport: name.into(),
        factor,
    }
}

/// Single-rule, single-destination reference set: F001 turns M001 into M002
/// at 95 % and ships all of it to Norway.
pub fn single_destination() -> ReferenceData {
    ReferenceData {
        transformations: vec![rule("F001", "M001", "M002", 0.95, Category::MaterialRecycling)],
        processing_factors: vec![ProcessingEmissionFactor {
            facility_id: "F001".into(),
            material_code: "M001".into(),
            factor: 19.5,
        }],
        upstream_distances: vec![UpstreamDistance {
            customer_id: "Supplier001".into(),
            facility_id: "F001".into(),
            distance_km: 500.0,
            mode_of_transport: "Truck".into(),
        }],
        transport_factors: vec![mode("Truck", 0.05)],
        geo_distributions: vec![share("M002", "Norway", 1.0)],
        downstream_distances: vec![leg("F001", "Norway", 500.0, "Truck")],
        virgin_benchmarks: vec![VirginBenchmark {
            material_code: "M002".into(),
            emissions_per_tonne: 3056.0,
        }],
        ..ReferenceData::default()
    }
}

/// Nordic plant with three outputs and a five-country distribution.
pub fn nordic_plant() -> ReferenceData {
    let mut data = single_destination();
    data.transformations = vec![
        rule("F001", "M001", "M002", 0.87, Category::MaterialRecycling),
        rule("F001", "M001", "M010", 0.08, Category::EnergyRecycling),
        rule("F001", "M001", "M099", 0.05, Category::Losses),
    ];
    data.transport_factors = vec![mode("Truck", 0.05), mode("Rail", 0.02), mode("Ship", 0.01)];
    data.geo_distributions = vec![
        share("M002", "Norway", 0.5),
        share("M002", "Sweden", 0.2),
        share("M002", "Denmark", 0.083),
        share("M002", "Germany", 0.144),
        share("M002", "China", 0.073),
    ];
    data.downstream_distances = vec![
        leg("F001", "Norway", 500.0, "Truck"),
        leg("F001", "Sweden", 800.0, "Truck"),
        leg("F001", "Denmark", 1000.0, "Truck"),
        leg("F001", "Germany", 1500.0, "Rail"),
        leg("F001", "China", 20000.0, "Ship"),
    ];
    data.regions = [
        ("Norway", "Nordics"),
        ("Sweden", "Nordics"),
        ("Denmark", "Nordics"),
        ("Germany", "EU"),
        ("China", "Asia"),
    ]
    .iter()
    .map(|(country, region)| GeographicRegion {
        country: (*country).into(),
        region: (*region).into(),
    })
    .collect();
    data
}
