// KPI snapshot for the dipping log.
//
// Pure function of the records and the tank constants: no state is read or
// kept between calls.
use crate::config::TankSettings;
use crate::errors::{FuelError, Result};
use crate::loader::DIPPING;
use crate::types::{FuelLogRecord, KpiSnapshot, TankStatus};
use crate::util::{max_present, mean_present};

/// The chronologically last record; on equal dates the later row in file
/// order wins.
fn latest(records: &[FuelLogRecord]) -> Option<&FuelLogRecord> {
    records
        .iter()
        .enumerate()
        .max_by_key(|(i, r)| (r.date, *i))
        .map(|(_, r)| r)
}

/// Days until `balance` falls to `threshold` at `daily_usage` per day.
/// `None` when usage is not positive or the balance is unknown.
pub fn forecast_days(balance: Option<f64>, daily_usage: f64, threshold: f64) -> Option<f64> {
    if daily_usage.is_nan() || daily_usage <= 0.0 {
        return None;
    }
    let balance = balance?;
    Some(((balance - threshold) / daily_usage).max(0.0))
}

pub fn fill_percentage(balance: Option<f64>, capacity: f64) -> Option<f64> {
    if capacity == 0.0 {
        return None;
    }
    balance.map(|b| b / capacity * 100.0)
}

pub fn compute_kpis(records: &[FuelLogRecord], tank: &TankSettings) -> Result<KpiSnapshot> {
    let last = latest(records).ok_or_else(|| FuelError::EmptyDataset {
        dataset: DIPPING.to_string(),
    })?;

    let available_balance = last.balance;
    let latest_daily_usage = last.diesel_used.unwrap_or(0.0);
    let average_daily_usage = mean_present(records.iter().map(|r| r.diesel_used));
    let peak_daily_usage = max_present(records.iter().map(|r| r.diesel_used));
    let forecast_days_remaining = forecast_days(
        available_balance,
        latest_daily_usage,
        tank.low_balance_threshold_l,
    );
    let tank_fill_percentage = fill_percentage(available_balance, tank.capacity_l);

    Ok(KpiSnapshot {
        as_of: last.date,
        available_balance,
        latest_daily_usage,
        average_daily_usage,
        peak_daily_usage,
        forecast_days_remaining,
        tank_fill_percentage,
        tank_status: TankStatus::from_fill_pct(tank_fill_percentage),
    })
}
