use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// One day of the dipping log.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelLogRecord {
    pub date: NaiveDate,
    pub morning_dip: Option<f64>,
    pub evening_dip: Option<f64>,
    pub diesel_used: Option<f64>,
    pub balance: Option<f64>,
    pub attendant: String,
    pub security: String,
}

/// One fuel issuance from the equipment log.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentLogRecord {
    pub date: NaiveDate,
    pub equipment: String,
    pub fleet: String,
    pub fuel_issued: Option<f64>,
    pub activity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TankStatus {
    Good,
    Warning,
    Critical,
    Unknown,
}

impl TankStatus {
    /// Gauge bands: below 35% critical, below 60% warning.
    pub fn from_fill_pct(pct: Option<f64>) -> Self {
        match pct {
            None => TankStatus::Unknown,
            Some(p) if p < 35.0 => TankStatus::Critical,
            Some(p) if p < 60.0 => TankStatus::Warning,
            Some(_) => TankStatus::Good,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TankStatus::Good => "Good Level",
            TankStatus::Warning => "Low Level",
            TankStatus::Critical => "Critical Level",
            TankStatus::Unknown => "Level Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub as_of: NaiveDate,
    pub available_balance: Option<f64>,
    pub latest_daily_usage: f64,
    pub average_daily_usage: Option<f64>,
    pub peak_daily_usage: Option<f64>,
    pub forecast_days_remaining: Option<f64>,
    pub tank_fill_percentage: Option<f64>,
    pub tank_status: TankStatus,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct WeeklyUsageRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Week")]
    #[tabled(rename = "Week")]
    pub week: String,
    #[serde(rename = "Days")]
    #[tabled(rename = "Days")]
    pub days: usize,
    #[serde(rename = "Litres")]
    #[tabled(rename = "Litres")]
    pub litres: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailyUsageRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Litres")]
    #[tabled(rename = "Litres")]
    pub litres: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailyLogRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "WeekOfMonth")]
    #[tabled(rename = "WeekOfMonth")]
    pub week_of_month: u32,
    #[serde(rename = "MorningDip")]
    #[tabled(rename = "MorningDip")]
    pub morning_dip: String,
    #[serde(rename = "EveningDip")]
    #[tabled(rename = "EveningDip")]
    pub evening_dip: String,
    #[serde(rename = "DieselIssuedUsed")]
    #[tabled(rename = "DieselIssuedUsed")]
    pub diesel_used: String,
    #[serde(rename = "Balance")]
    #[tabled(rename = "Balance")]
    pub balance: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ConsumerRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "FleetNo")]
    #[tabled(rename = "FleetNo")]
    pub fleet: String,
    #[serde(rename = "Issues")]
    #[tabled(rename = "Issues")]
    pub issues: usize,
    #[serde(rename = "Litres")]
    #[tabled(rename = "Litres")]
    pub litres: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ActivityUsageRow {
    #[serde(rename = "Activity")]
    #[tabled(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Litres")]
    #[tabled(rename = "Litres")]
    pub litres: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PersonnelRow {
    #[serde(rename = "Role")]
    #[tabled(rename = "Role")]
    pub role: String,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Shifts")]
    #[tabled(rename = "Shifts")]
    pub shifts: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RecentRecordRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "FuelAttendant")]
    #[tabled(rename = "FuelAttendant")]
    pub attendant: String,
    #[serde(rename = "Security")]
    #[tabled(rename = "Security")]
    pub security: String,
    #[serde(rename = "DieselIssuedUsed")]
    #[tabled(rename = "DieselIssuedUsed")]
    pub diesel_used: String,
    #[serde(rename = "Balance")]
    #[tabled(rename = "Balance")]
    pub balance: String,
}

#[derive(Debug, Serialize)]
pub struct FuelSummary {
    pub dipping_records: usize,
    pub equipment_records: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub tank_capacity_l: f64,
    pub low_balance_threshold_l: f64,
    pub kpis: KpiSnapshot,
    pub total_fuel_issued: f64,
    pub unresolved_columns: Vec<String>,
}
