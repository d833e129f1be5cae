// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference index: O(1) lookups over the reference tables.
//!
//! Composite keys are stored as two-level maps (`outer -> inner -> value`) so
//! lookups borrow `&str` on both levels without allocating a key tuple.
//! Grouped tables (transformation rules, geographic distributions) keep their
//! provider order inside each group. For single-valued tables a later record
//! with the same key replaces an earlier one.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::model::{
    DownstreamDistance, Facility, Material, OutputGeoDistribution, TransformationRule,
    UpstreamDistance,
};
use crate::ports::ReferenceData;

/// Tolerance used when checking that yields or shares sum to 1.0.
pub const SUM_TOLERANCE: f64 = 1e-6;

type Keyed<V> = FxHashMap<String, V>;
type Keyed2<V> = Keyed<Keyed<V>>;

fn get2<'a, V>(map: &'a Keyed2<V>, outer: &str, inner: &str) -> Option<&'a V> {
    map.get(outer).and_then(|m| m.get(inner))
}

fn insert2<V>(map: &mut Keyed2<V>, outer: String, inner: String, value: V) {
    map.entry(outer).or_default().insert(inner, value);
}

/// A reference-table inconsistency that does not stop allocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// Yield fractions of a transformation group do not sum to 1.0.
    YieldSum {
        /// Facility of the group.
        facility_id: String,
        /// Input material of the group.
        input_material_code: String,
        /// Actual sum of yield fractions.
        total: f64,
    },
    /// Shares of a geographic distribution group do not sum to 1.0.
    ShareSum {
        /// Output material of the group.
        output_material_code: String,
        /// Actual sum of shares.
        total: f64,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YieldSum {
                facility_id,
                input_material_code,
                total,
            } => write!(
                f,
                "yields for {input_material_code} at {facility_id} sum to {total}, expected 1"
            ),
            Self::ShareSum {
                output_material_code,
                total,
            } => write!(
                f,
                "distribution shares for {output_material_code} sum to {total}, expected 1"
            ),
        }
    }
}

/// Read-only lookup structures built once per run from [`ReferenceData`].
#[derive(Clone, Debug, Default)]
pub struct ReferenceIndex {
    materials: Keyed<Material>,
    facilities: Keyed<Facility>,
    // facility -> input material -> rules
    transformations: Keyed2<Vec<TransformationRule>>,
    // facility -> material -> kg CO2e / t
    processing: Keyed2<f64>,
    // mode -> kg CO2e / t-km
    transport: Keyed<f64>,
    // customer -> facility
    upstream: Keyed2<UpstreamDistance>,
    // facility -> country
    downstream: Keyed2<DownstreamDistance>,
    geo: Keyed<Vec<OutputGeoDistribution>>,
    benchmarks: Keyed<f64>,
    regions: Keyed<String>,
}

impl ReferenceIndex {
    /// Index every table of `data`.
    pub fn build(data: ReferenceData) -> Self {
        let mut index = Self::default();

        for material in data.materials {
            index.materials.insert(material.code.clone(), material);
        }
        for facility in data.facilities {
            index.facilities.insert(facility.id.clone(), facility);
        }
        for rule in data.transformations {
            index
                .transformations
                .entry(rule.facility_id.clone())
                .or_default()
                .entry(rule.input_material_code.clone())
                .or_default()
                .push(rule);
        }
        for ef in data.processing_factors {
            insert2(&mut index.processing, ef.facility_id, ef.material_code, ef.factor);
        }
        for tef in data.transport_factors {
            index.transport.insert(tef.mode_of_transport, tef.factor);
        }
        for ud in data.upstream_distances {
            insert2(
                &mut index.upstream,
                ud.customer_id.clone(),
                ud.facility_id.clone(),
                ud,
            );
        }
        for dd in data.downstream_distances {
            insert2(
                &mut index.downstream,
                dd.facility_id.clone(),
                dd.destination_country.clone(),
                dd,
            );
        }
        for od in data.geo_distributions {
            index
                .geo
                .entry(od.output_material_code.clone())
                .or_default()
                .push(od);
        }
        for vb in data.virgin_benchmarks {
            index.benchmarks.insert(vb.material_code, vb.emissions_per_tonne);
        }
        for gr in data.regions {
            index.regions.insert(gr.country, gr.region);
        }

        debug!(
            facilities = index.facilities.len(),
            materials = index.materials.len(),
            transformation_groups = index
                .transformations
                .values()
                .map(FxHashMap::len)
                .sum::<usize>(),
            distribution_groups = index.geo.len(),
            "reference index built"
        );
        index
    }

    /// Transformation rules for `(facility_id, material_code)` in provider order.
    /// Empty when none are configured.
    pub fn transformations(&self, facility_id: &str, material_code: &str) -> &[TransformationRule] {
        get2(&self.transformations, facility_id, material_code)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Processing factor (kg CO2e / t) for `(facility_id, material_code)`; 0 when absent.
    pub fn processing_factor(&self, facility_id: &str, material_code: &str) -> f64 {
        get2(&self.processing, facility_id, material_code).copied().unwrap_or(0.0)
    }

    /// Transport factor (kg CO2e / t-km) for `mode`; 0 when absent.
    pub fn transport_factor(&self, mode: &str) -> f64 {
        self.transport.get(mode).copied().unwrap_or(0.0)
    }

    /// Inbound distance from `customer_id` to `facility_id`.
    pub fn upstream_distance(
        &self,
        customer_id: &str,
        facility_id: &str,
    ) -> Option<&UpstreamDistance> {
        get2(&self.upstream, customer_id, facility_id)
    }

    /// Outbound distance from `facility_id` to `country`.
    pub fn downstream_distance(
        &self,
        facility_id: &str,
        country: &str,
    ) -> Option<&DownstreamDistance> {
        get2(&self.downstream, facility_id, country)
    }

    /// Destination distribution of `output_material_code` in provider order.
    /// Empty when none is configured.
    pub fn geo_distribution(&self, output_material_code: &str) -> &[OutputGeoDistribution] {
        self.geo.get(output_material_code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Virgin-production benchmark (kg CO2e / t) for `material_code`; 0 when absent.
    pub fn virgin_benchmark(&self, material_code: &str) -> f64 {
        self.benchmarks.get(material_code).copied().unwrap_or(0.0)
    }

    /// Catalog entry for `code`.
    pub fn material(&self, code: &str) -> Option<&Material> {
        self.materials.get(code)
    }

    /// Catalog entry for `id`.
    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.get(id)
    }

    /// Region `country` rolls up to.
    pub fn region_of(&self, country: &str) -> Option<&str> {
        self.regions.get(country).map(String::as_str)
    }

    /// Groups whose yields or shares do not sum to 1.0 within [`SUM_TOLERANCE`].
    ///
    /// Sorted by key so repeated calls report in the same order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut yields = BTreeMap::new();
        for (facility_id, by_input) in &self.transformations {
            for (input, rules) in by_input {
                let total: f64 = rules.iter().map(|r| r.yield_fraction).sum();
                yields.insert((facility_id.as_str(), input.as_str()), total);
            }
        }
        let shares: BTreeMap<&str, f64> = self
            .geo
            .iter()
            .map(|(code, entries)| (code.as_str(), entries.iter().map(|e| e.share).sum()))
            .collect();

        let off = |total: f64| (total - 1.0).abs() > SUM_TOLERANCE;
        let mut out: Vec<Diagnostic> = yields
            .into_iter()
            .filter(|(_, total)| off(*total))
            .map(|((facility_id, input), total)| Diagnostic::YieldSum {
                facility_id: facility_id.to_owned(),
                input_material_code: input.to_owned(),
                total,
            })
            .collect();
        out.extend(
            shares
                .into_iter()
                .filter(|(_, total)| off(*total))
                .map(|(code, total)| Diagnostic::ShareSum {
                    output_material_code: code.to_owned(),
                    total,
                }),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Category, GeographicRegion, ProcessingEmissionFactor, TransportEmissionFactor,
        VirginBenchmark,
    };

    fn rule(facility: &str, input: &str, output: &str, y: f64) -> TransformationRule {
        TransformationRule {
            facility_id: facility.into(),
            input_material_code: input.into(),
            output_material_code: output.into(),
            yield_fraction: y,
            category: Category::MaterialRecycling,
        }
    }

    fn dist(code: &str, country: &str, share: f64) -> OutputGeoDistribution {
        OutputGeoDistribution {
            output_material_code: code.into(),
            destination_country: country.into(),
            share,
        }
    }

    #[test]
    fn missing_keys_default_to_zero_or_empty() {
        let index = ReferenceIndex::build(ReferenceData::default());
        assert!(index.transformations("F001", "M001").is_empty());
        assert!(index.geo_distribution("M002").is_empty());
        assert!(index.upstream_distance("C1", "F001").is_none());
        assert!(index.downstream_distance("F001", "Norway").is_none());
        assert!(index.processing_factor("F001", "M001").abs() < f64::EPSILON);
        assert!(index.transport_factor("Truck").abs() < f64::EPSILON);
        assert!(index.virgin_benchmark("M002").abs() < f64::EPSILON);
        assert!(index.region_of("Norway").is_none());
    }

    #[test]
    fn grouped_tables_keep_provider_order() {
        let data = ReferenceData {
            transformations: vec![
                rule("F001", "M001", "M003", 0.2),
                rule("F002", "M001", "M009", 1.0),
                rule("F001", "M001", "M002", 0.8),
            ],
            geo_distributions: vec![
                dist("M002", "Sweden", 0.4),
                dist("M003", "China", 1.0),
                dist("M002", "Norway", 0.6),
            ],
            ..ReferenceData::default()
        };
        let index = ReferenceIndex::build(data);

        let outputs: Vec<&str> = index
            .transformations("F001", "M001")
            .iter()
            .map(|r| r.output_material_code.as_str())
            .collect();
        assert_eq!(outputs, ["M003", "M002"]);

        let countries: Vec<&str> = index
            .geo_distribution("M002")
            .iter()
            .map(|d| d.destination_country.as_str())
            .collect();
        assert_eq!(countries, ["Sweden", "Norway"]);
    }

    #[test]
    fn later_single_valued_records_win() {
        let data = ReferenceData {
            processing_factors: vec![
                ProcessingEmissionFactor {
                    facility_id: "F001".into(),
                    material_code: "M001".into(),
                    factor: 10.0,
                },
                ProcessingEmissionFactor {
                    facility_id: "F001".into(),
                    material_code: "M001".into(),
                    factor: 19.5,
                },
            ],
            transport_factors: vec![TransportEmissionFactor {
                mode_of_transport: "Truck".into(),
                factor: 0.05,
            }],
            virgin_benchmarks: vec![VirginBenchmark {
                material_code: "M002".into(),
                emissions_per_tonne: 3056.0,
            }],
            regions: vec![GeographicRegion {
                country: "Norway".into(),
                region: "Nordics".into(),
            }],
            ..ReferenceData::default()
        };
        let index = ReferenceIndex::build(data);
        assert!((index.processing_factor("F001", "M001") - 19.5).abs() < 1e-12);
        assert!((index.transport_factor("Truck") - 0.05).abs() < 1e-12);
        assert!((index.virgin_benchmark("M002") - 3056.0).abs() < 1e-12);
        assert_eq!(index.region_of("Norway"), Some("Nordics"));
        // Composite keys do not leak across facilities.
        assert!(index.processing_factor("F002", "M001").abs() < f64::EPSILON);
    }

    #[test]
    fn diagnostics_flag_groups_that_do_not_sum_to_one() {
        let data = ReferenceData {
            transformations: vec![
                rule("F001", "M001", "M002", 0.95),
                rule("F001", "M005", "M002", 0.5),
                rule("F001", "M005", "M006", 0.5),
            ],
            geo_distributions: vec![dist("M002", "Norway", 0.5), dist("M006", "China", 1.0)],
            ..ReferenceData::default()
        };
        let diags = ReferenceIndex::build(data).diagnostics();
        assert_eq!(diags.len(), 2);
        assert!(matches!(
            &diags[0],
            Diagnostic::YieldSum { input_material_code, .. } if input_material_code == "M001"
        ));
        assert!(matches!(
            &diags[1],
            Diagnostic::ShareSum { output_material_code, .. } if output_material_code == "M002"
        ));
    }
}
