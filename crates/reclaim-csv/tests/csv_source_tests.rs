// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::path::Path;

use reclaim_core::{Category, Engine, InvoiceSource, ReferenceSource, ReportRow};
use reclaim_csv::{tables, CsvInvoiceSource, CsvReferenceSource, IngestError, JsonReportSink};

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write fixture");
}

/// The single-destination scenario in the legacy column layout.
fn seed_legacy_tables(dir: &Path) {
    write(dir, tables::MATERIALS, "code,description\nM001,Aluminium scrap\nM002,Recycled aluminium\n");
    write(dir, tables::FACILITIES, "facility_id,name,location\nF001,Oslo Plant,Norway\n");
    write(
        dir,
        tables::TRANSFORMATIONS,
        "facility_id,input_material_code,output_material_code,percentage,category\n\
         F001,M001,M002,0.95,Material Recycling\n",
    );
    write(
        dir,
        tables::PROCESSING_FACTORS,
        "facility_id,material_code,emission_factor\nF001,M001,19.5\n",
    );
    write(
        dir,
        tables::GEO_DISTRIBUTIONS,
        "output_material_code,destination_country,percentage\nM002,Norway,1.0\n",
    );
    write(dir, tables::TRANSPORT_FACTORS, "mode_of_transport,emission_factor\nTruck,0.05\n");
    write(
        dir,
        tables::DOWNSTREAM_DISTANCES,
        "facility_id,destination_country,average_distance,mode_of_transport\nF001,Norway,500,Truck\n",
    );
    write(
        dir,
        tables::UPSTREAM_DISTANCES,
        "customer_id,facility_id,inbound_average_distance,inbound_mode_of_transport\n\
         Supplier001,F001,500,Truck\n",
    );
    write(dir, tables::VIRGIN_BENCHMARKS, "material_code,emissions\nM002,3056\n");
    write(dir, tables::REGIONS, "country,region\nNorway,Nordics\n");
}

#[test]
fn legacy_layout_reproduces_reference_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_legacy_tables(dir.path());
    let invoices = dir.path().join("invoices.csv");
    fs::write(
        &invoices,
        "invoice_id,customer_id,delivery_date,facility_id,material_code,volume\n\
         INV001,Supplier001,2023-10-01,F001,M001,6000\n",
    )
    .unwrap();

    let engine = Engine::from_source(&CsvReferenceSource::new(dir.path())).unwrap();
    let report = engine.run(&CsvInvoiceSource::new(&invoices).invoices().unwrap());

    assert!(report.is_clean());
    let [row] = report.rows.as_slice() else {
        panic!("expected one row, got {}", report.rows.len());
    };
    assert_eq!(row.category, Category::MaterialRecycling);
    assert_eq!(row.destination_country, "Norway");
    assert!((row.output_volume - 5700.0).abs() < 1e-9);
    assert!((row.processing_emissions - 117_000.0).abs() < 1e-6);
    assert!((row.inbound_transport_emissions - 150_000.0).abs() < 1e-6);
    assert!((row.outbound_transport_emissions - 142_500.0).abs() < 1e-6);
    assert!((row.total_transport_emissions - 292_500.0).abs() < 1e-6);
    assert!((row.benchmark_emissions - 17_419_200.0).abs() < 1e-3);
}

#[test]
fn missing_tables_load_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), tables::REGIONS, "country,region\nNorway,Nordics\n");

    let source = CsvReferenceSource::new(dir.path());
    assert_eq!(source.missing_tables().len(), tables::ALL.len() - 1);

    let data = source.load().unwrap();
    assert!(data.transformations.is_empty());
    assert_eq!(data.regions.len(), 1);
}

#[test]
fn missing_invoice_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = CsvInvoiceSource::new(dir.path().join("absent.csv")).invoices().unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }), "{err}");
    assert!(err.to_string().starts_with("[INGEST_IO]"));
}

#[test]
fn malformed_reference_table_names_file_and_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_legacy_tables(dir.path());
    write(
        dir.path(),
        tables::TRANSPORT_FACTORS,
        "mode_of_transport,emission_factor\nTruck,0.05\nRail,\n",
    );

    let err = CsvReferenceSource::new(dir.path()).load().unwrap_err();
    match &err {
        IngestError::Parse { path, line, .. } => {
            assert!(path.ends_with(tables::TRANSPORT_FACTORS));
            assert_eq!(*line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_finite_reference_numbers_are_rejected() {
    let cases = [
        (tables::PROCESSING_FACTORS, "facility_id,material_code,emission_factor\nF001,M001,NaN\n"),
        (tables::TRANSPORT_FACTORS, "mode_of_transport,emission_factor\nTruck,0.05\nShip,inf\n"),
        (
            tables::DOWNSTREAM_DISTANCES,
            "facility_id,destination_country,average_distance,mode_of_transport\nF001,Norway,-inf,Truck\n",
        ),
        (tables::VIRGIN_BENCHMARKS, "material_code,emissions\nM002,NaN\n"),
    ];
    for (table, body) in cases {
        let dir = tempfile::tempdir().expect("tempdir");
        seed_legacy_tables(dir.path());
        write(dir.path(), table, body);

        let err = CsvReferenceSource::new(dir.path()).load().unwrap_err();
        match &err {
            IngestError::Parse { path, line, .. } => {
                assert!(path.ends_with(table), "{err}");
                assert_eq!(*line, u64::try_from(body.lines().count()).unwrap(), "{err}");
            }
            other => panic!("unexpected error for {table}: {other}"),
        }
        assert!(err.to_string().contains("finite"), "{err}");
    }
}

#[test]
fn report_file_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_legacy_tables(dir.path());
    let engine = Engine::from_source(&CsvReferenceSource::new(dir.path())).unwrap();
    let invoices = vec![reclaim_core::Invoice {
        invoice_id: "INV001".into(),
        customer_id: "Supplier001".into(),
        delivery_date: "2023-10-01".into(),
        facility_id: "F001".into(),
        material_code: "M001".into(),
        volume: 6000.0,
    }];
    let report = engine.run(&invoices);

    let out = dir.path().join("output").join("recycling_reports.json");
    let mut sink = JsonReportSink::create(&out).unwrap();
    report.emit(&mut sink).unwrap();
    drop(sink);

    let parsed: Vec<ReportRow> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed, report.rows);
}
