// Load -> KPI -> report tables -> files, as one call each for the CLI.
use crate::cache::DatasetCache;
use crate::config::Config;
use crate::errors::Result;
use crate::kpi::compute_kpis;
use crate::loader::{DippingDataset, EquipmentDataset};
use crate::output::{write_csv, write_json};
use crate::reports;
use crate::types::{
    ActivityUsageRow, ConsumerRow, DailyLogRow, FuelSummary, PersonnelRow, RecentRecordRow,
    WeeklyUsageRow,
};
use std::path::PathBuf;
use std::sync::Arc;

pub const WEEKLY_FILE: &str = "fuel_weekly_usage.csv";
pub const CONSUMERS_FILE: &str = "fuel_top_consumers.csv";
pub const ACTIVITY_FILE: &str = "fuel_activity_usage.csv";
pub const PERSONNEL_FILE: &str = "fuel_personnel.csv";
pub const RECENT_FILE: &str = "fuel_recent_records.csv";
pub const DAILY_LOG_FILE: &str = "fuel_daily_log.csv";
pub const SUMMARY_FILE: &str = "fuel_summary.json";

#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dipping: Arc<DippingDataset>,
    pub equipment: Arc<EquipmentDataset>,
}

/// Both datasets through the cache. Either file missing fails the whole load.
pub fn load(cache: &mut DatasetCache, config: &Config) -> Result<LoadedData> {
    let dipping = cache.dipping(&config.dipping_path)?;
    let equipment = cache.equipment(&config.equipment_path)?;
    Ok(LoadedData { dipping, equipment })
}

#[derive(Debug)]
pub struct FuelReports {
    pub summary: FuelSummary,
    pub weekly: Vec<WeeklyUsageRow>,
    pub consumers: Vec<ConsumerRow>,
    pub activity: Vec<ActivityUsageRow>,
    pub personnel: Vec<PersonnelRow>,
    pub recent: Vec<RecentRecordRow>,
    pub daily_log: Vec<DailyLogRow>,
}

pub fn build_reports(data: &LoadedData, config: &Config) -> Result<FuelReports> {
    let dipping = &data.dipping.records;
    let equipment = &data.equipment.records;
    let kpis = compute_kpis(dipping, &config.tank())?;
    Ok(FuelReports {
        summary: reports::generate_summary(&data.dipping, &data.equipment, &kpis, config),
        weekly: reports::weekly_usage_report(dipping),
        consumers: reports::top_consumers(equipment, config.top_n),
        activity: reports::activity_usage(equipment),
        personnel: reports::personnel_report(dipping),
        recent: reports::recent_records(dipping, config.recent_records),
        daily_log: reports::daily_log_report(dipping),
    })
}

/// Write every table plus the JSON summary; returns the paths written.
pub fn write_reports(reports: &FuelReports, config: &Config) -> Result<Vec<PathBuf>> {
    let path = |name: &str| config.output_dir.join(name);
    let written = vec![
        path(WEEKLY_FILE),
        path(CONSUMERS_FILE),
        path(ACTIVITY_FILE),
        path(PERSONNEL_FILE),
        path(RECENT_FILE),
        path(DAILY_LOG_FILE),
        path(SUMMARY_FILE),
    ];
    write_csv(&written[0], &reports.weekly)?;
    write_csv(&written[1], &reports.consumers)?;
    write_csv(&written[2], &reports.activity)?;
    write_csv(&written[3], &reports.personnel)?;
    write_csv(&written[4], &reports.recent)?;
    write_csv(&written[5], &reports.daily_log)?;
    write_json(&written[6], &reports.summary)?;
    log::info!(
        "Wrote {} report files to {}",
        written.len(),
        config.output_dir.display()
    );
    Ok(written)
}
