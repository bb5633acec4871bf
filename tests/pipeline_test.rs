// End-to-end: CSV fixtures on disk -> cache load -> KPIs -> written reports.
use fuel_report::cache::DatasetCache;
use fuel_report::config::Config;
use fuel_report::pipeline::{self, SUMMARY_FILE};
use fuel_report::types::TankStatus;
use fuel_report::FuelError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DIPPING_CSV: &str = "\
Date,Morning Dip Time,Morning Dip Reading (Liters),Fuel Attendant Name,Security Personnel Name,Evening Dip Time,Evening Dip Reading (Liters),Diesel Issued/Used (Liters),Balance (Liters)
2025-07-16,06:00,\"11,500\",Ama Owusu,Kofi Mensah,18:00,\"10,000\",\"1,500\",\"10,000\"
2025-07-17,06:00,\"10,000\",Esi Boateng,Kofi Mensah,18:00,\"8,000\",\"2,000\",\"8,000\"
2025-07-18,06:00,\"8,000\",Ama Owusu,Yaw Asante,18:00,\"6,000\",\"2,000\",\"6,000\"
";

const EQUIPMENT_CSV: &str = "\
Date,Equipment Name,Registration No.,Fleet No,Fuel Issued  (LTS),Driver/Operator Name,Comment/ Remarks
2025-07-16,Excavator,GR-101,EX-001,\"1,200\",John,Excavation
2025-07-16,Dump Truck,GR-102,DT-002,300,Mike,Haulage
2025-07-17,Excavator,GR-101,EX-001,800,John,Excavation
2025-07-18,Mixer,GR-104,MX-004,,Sarah,Mixing
";

fn fixture(dir: &Path) -> Config {
    let dipping_path = dir.join("dipping_dataset.csv");
    let equipment_path = dir.join("equipment_dataset.csv");
    fs::write(&dipping_path, DIPPING_CSV).unwrap();
    fs::write(&equipment_path, EQUIPMENT_CSV).unwrap();
    let output_dir = dir.join("out");
    fs::create_dir_all(&output_dir).unwrap();
    Config {
        dipping_path,
        equipment_path,
        output_dir,
        ..Config::default()
    }
}

#[test]
fn full_pipeline_writes_reports() {
    let dir = TempDir::new().unwrap();
    let config = fixture(dir.path());
    let mut cache = DatasetCache::new(false);

    let data = pipeline::load(&mut cache, &config).unwrap();
    let reports = pipeline::build_reports(&data, &config).unwrap();

    let kpis = &reports.summary.kpis;
    assert_eq!(kpis.available_balance, Some(6_000.0));
    assert_eq!(kpis.latest_daily_usage, 2_000.0);
    assert!((kpis.average_daily_usage.unwrap() - 1833.33).abs() < 0.01);
    assert_eq!(kpis.peak_daily_usage, Some(2_000.0));
    assert_eq!(kpis.forecast_days_remaining, Some(0.5));
    assert_eq!(kpis.tank_fill_percentage, Some(10.0));
    assert_eq!(kpis.tank_status, TankStatus::Critical);

    assert_eq!(reports.consumers[0].fleet, "EX-001");
    assert_eq!(reports.consumers[0].litres, "2,000");
    assert_eq!(reports.activity[0].activity, "Excavation");
    assert_eq!(reports.recent[0].date, "18-Jul-2025");
    assert_eq!(reports.summary.total_fuel_issued, 2_300.0);
    assert!(reports.summary.unresolved_columns.is_empty());

    let written = pipeline::write_reports(&reports, &config).unwrap();
    assert_eq!(written.len(), 7);
    assert!(written.iter().all(|p| p.exists()));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(config.output_dir.join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["kpis"]["available_balance"], 6000.0);
    assert_eq!(summary["kpis"]["tank_status"], "Critical");
    assert_eq!(summary["dipping_records"], 3);
}

#[test]
fn missing_equipment_file_halts_the_load() {
    let dir = TempDir::new().unwrap();
    let mut config = fixture(dir.path());
    config.equipment_path = dir.path().join("nope.csv");
    let mut cache = DatasetCache::new(false);
    let err = pipeline::load(&mut cache, &config).unwrap_err();
    assert!(matches!(err, FuelError::MissingInputFile { .. }));
}

#[test]
fn empty_dipping_log_is_reported_as_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let config = fixture(dir.path());
    fs::write(&config.dipping_path, "Date,Diesel Issued/Used (Liters),Balance (Liters)\n").unwrap();
    let mut cache = DatasetCache::new(false);
    let data = pipeline::load(&mut cache, &config).unwrap();
    let err = pipeline::build_reports(&data, &config).unwrap_err();
    assert!(matches!(err, FuelError::EmptyDataset { .. }));
}

#[test]
fn missing_usage_column_surfaces_in_summary() {
    let dir = TempDir::new().unwrap();
    let config = fixture(dir.path());
    fs::write(&config.dipping_path, "Date,Balance (Liters)\n2025-07-16,\"30,000\"\n").unwrap();
    let mut cache = DatasetCache::new(false);
    let data = pipeline::load(&mut cache, &config).unwrap();
    let reports = pipeline::build_reports(&data, &config).unwrap();
    let kpis = &reports.summary.kpis;
    assert_eq!(kpis.forecast_days_remaining, None);
    assert_eq!(kpis.average_daily_usage, None);
    assert_eq!(kpis.tank_status, TankStatus::Warning);
    assert!(reports
        .summary
        .unresolved_columns
        .iter()
        .any(|c| c == "dipping: diesel issued/used"));

    let strict = Config {
        strict_columns: true,
        ..config.clone()
    };
    let mut strict_cache = DatasetCache::new(strict.strict_columns);
    let err = pipeline::load(&mut strict_cache, &strict).unwrap_err();
    assert!(matches!(err, FuelError::UnresolvedColumn { .. }));
}
