//! CSV ingest, simulation, and export on the bundled sample day.

mod common;

use common::{ScratchFile, assert_close};
use solar_sim::config::ScenarioConfig;
use solar_sim::io::export::export_csv;
use solar_sim::io::ingest::{IngestError, read_input_from_path, read_records, read_records_from_path};
use solar_sim::sim::report::SimReport;
use solar_sim::sim::run_checked;

#[test]
fn sample_day_loads_with_logger_column_names() {
    let records = read_records_from_path(&common::fixture_path("data/sample_day.csv")).expect("sample loads");
    assert_eq!(records.len(), 96);

    let noon = &records[48];
    assert_eq!(noon.timestamp.format("%H:%M").to_string(), "12:00");
    assert_close(noon.irradiance, 850.0, 1e-9);
    assert_eq!(records[70].price_per_kwh, 1444.7);
}

#[test]
fn cadence_is_inferred_from_timestamps() {
    let records = read_records_from_path(&common::fixture_path("data/sample_day.csv")).expect("sample loads");
    let scenario = ScenarioConfig::baseline();
    assert_close(scenario.interval_hours(&records), 0.25, 1e-12);

    let mut fixed = ScenarioConfig::baseline();
    fixed.simulation.interval_minutes = Some(60.0);
    assert_close(fixed.interval_hours(&records), 1.0, 1e-12);
}

#[test]
fn ingest_run_export_pipeline() {
    let input = read_input_from_path(&common::fixture_path("data/sample_day.csv")).expect("sample loads");
    let records = &input.records;
    let scenario = ScenarioConfig::baseline();
    let interval_hours = scenario.interval_hours(records);
    let results = run_checked(
        records,
        scenario.sim_config(interval_hours),
        scenario.simulation.data_policy,
    )
    .expect("sample is clean");

    let report = SimReport::from_results(&results, interval_hours);
    assert_eq!(report.intervals, 96);
    assert_close(report.days, 1.0, 1e-9);
    assert!(report.solar_kwh > 0.0);

    let out = ScratchFile::new("pipeline.csv");
    export_csv(records, &results, Some(&input.source), out.path()).expect("export succeeds");
    let written = out.read();

    let mut lines = written.lines();
    let header = lines.next().expect("header row");
    assert_eq!(
        header,
        "timestamp,irradiance,suhu,beban_rumah_kw,harga_listrik,\
         solar_output_kw,battery_level_kwh,battery_percentage,\
         grid_import_kwh,cost,curtailed_kwh,flag"
    );
    assert_eq!(lines.count(), 96);

    // Exported input columns read back as the same records.
    let reread = read_records(written.as_bytes()).expect("export re-ingests");
    assert_eq!(&reread, records);

    // Result columns read back exactly, so totals match the report.
    let mut rdr = csv::Reader::from_reader(written.as_bytes());
    let mut import_total = 0.0;
    let mut cost_total = 0.0;
    for (row, r) in rdr.records().zip(&results) {
        let row = row.expect("valid row");
        let import: f64 = row[8].parse().expect("numeric import");
        let cost: f64 = row[9].parse().expect("numeric cost");
        assert_eq!(import, r.grid_import_kwh);
        assert_eq!(cost, r.cost);
        import_total += import;
        cost_total += cost;
    }
    assert_eq!(import_total, report.grid_import_kwh);
    assert_eq!(cost_total, report.cost);
}

#[test]
fn missing_file_reports_path() {
    let missing = ScratchFile::new("does-not-exist.csv");
    let err = read_records_from_path(missing.path()).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
    assert!(err.to_string().contains("does-not-exist.csv"));
}
