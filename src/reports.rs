use crate::config::Config;
use crate::loader::{DippingDataset, EquipmentDataset};
use crate::periods::{bucket, daily_usage, period_key, weekly_usage, MonthBucket};
use crate::types::{
    ActivityUsageRow, ConsumerRow, DailyLogRow, DailyUsageRow, EquipmentLogRecord, FuelLogRecord,
    FuelSummary, KpiSnapshot, PersonnelRow, RecentRecordRow, WeeklyUsageRow,
};
use crate::util::{format_number, format_optional, sum_present};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const OTHER_WORKS: &str = "Other Works";
pub const ACTIVITY_TOP: usize = 5;

/// Litres per key, largest first; ties fall back to the key so the order is
/// stable between runs.
pub fn group_sum<F>(records: &[EquipmentLogRecord], key: F) -> Vec<(String, usize, f64)>
where
    F: Fn(&EquipmentLogRecord) -> &str,
{
    #[derive(Default)]
    struct Acc {
        issues: usize,
        litres: Vec<Option<f64>>,
    }
    let mut map: HashMap<&str, Acc> = HashMap::new();
    for r in records {
        let e = map.entry(key(r)).or_default();
        e.issues += 1;
        e.litres.push(r.fuel_issued);
    }
    let mut out: Vec<(String, usize, f64)> = map
        .into_iter()
        .map(|(k, acc)| (k.to_string(), acc.issues, sum_present(acc.litres)))
        .collect();
    out.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    out
}

pub fn top_consumers(records: &[EquipmentLogRecord], n: usize) -> Vec<ConsumerRow> {
    group_sum(records, |r| r.fleet.as_str())
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (fleet, issues, litres))| ConsumerRow {
            rank: idx + 1,
            fleet,
            issues,
            litres: format_number(litres, 0),
        })
        .collect()
}

/// Top activities by litres with the remainder folded into "Other Works".
pub fn activity_usage(records: &[EquipmentLogRecord]) -> Vec<ActivityUsageRow> {
    let grouped = group_sum(records, |r| r.activity.as_str());
    let total: f64 = grouped.iter().map(|g| g.2).sum();
    let others: f64 = grouped.iter().skip(ACTIVITY_TOP).map(|g| g.2).sum();

    let mut rows: Vec<(String, f64)> = grouped
        .into_iter()
        .take(ACTIVITY_TOP)
        .map(|(activity, _, litres)| (activity, litres))
        .collect();
    if others > 0.0 {
        rows.push((OTHER_WORKS.to_string(), others));
    }
    rows.into_iter()
        .map(|(activity, litres)| {
            let share = if total > 0.0 {
                litres / total * 100.0
            } else {
                0.0
            };
            ActivityUsageRow {
                activity,
                litres: format_number(litres, 0),
                share_pct: format_number(share, 2),
            }
        })
        .collect()
}

pub fn weekly_usage_report(records: &[FuelLogRecord]) -> Vec<WeeklyUsageRow> {
    bucket(records)
        .iter()
        .flat_map(|month| {
            month
                .weeks
                .iter()
                .zip(weekly_usage(records, month))
                .map(|(w, (_, days, litres))| WeeklyUsageRow {
                    month: format!("{} {}", month.name, month.year),
                    week: w.label(),
                    days,
                    litres: format_number(litres, 0),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Day-by-day usage for one week of one month; empty if the week has no rows.
pub fn daily_usage_report(
    records: &[FuelLogRecord],
    month: &MonthBucket,
    week: u32,
) -> Vec<DailyUsageRow> {
    let Some(selected) = month.week(week) else {
        return Vec::new();
    };
    daily_usage(records, selected)
        .iter()
        .map(|r| DailyUsageRow {
            date: r.date.format("%a %d-%b").to_string(),
            litres: format_optional(r.diesel_used, 0),
        })
        .collect()
}

/// Balance, dip readings and usage for every day, oldest first.
pub fn daily_log_report(records: &[FuelLogRecord]) -> Vec<DailyLogRow> {
    records
        .iter()
        .map(|r| {
            let key = period_key(r.date);
            DailyLogRow {
                date: r.date.format("%d-%b-%Y").to_string(),
                month: key.month,
                week_of_month: key.week_of_month,
                morning_dip: format_optional(r.morning_dip, 0),
                evening_dip: format_optional(r.evening_dip, 0),
                diesel_used: format_optional(r.diesel_used, 0),
                balance: format_optional(r.balance, 0),
            }
        })
        .collect()
}

fn value_counts<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.filter(|n| !n.is_empty()) {
        *counts.entry(name).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Shift counts per fuel attendant and per security officer.
pub fn personnel_report(records: &[FuelLogRecord]) -> Vec<PersonnelRow> {
    let attendants = value_counts(records.iter().map(|r| r.attendant.as_str()));
    let security = value_counts(records.iter().map(|r| r.security.as_str()));
    attendants
        .into_iter()
        .map(|(name, shifts)| ("Fuel Attendant", name, shifts))
        .chain(
            security
                .into_iter()
                .map(|(name, shifts)| ("Security", name, shifts)),
        )
        .map(|(role, name, shifts)| PersonnelRow {
            role: role.to_string(),
            name,
            shifts,
        })
        .collect()
}

/// The latest `n` dipping records, newest first.
pub fn recent_records(records: &[FuelLogRecord], n: usize) -> Vec<RecentRecordRow> {
    records
        .iter()
        .rev()
        .take(n)
        .map(|r| RecentRecordRow {
            date: r.date.format("%d-%b-%Y").to_string(),
            attendant: r.attendant.clone(),
            security: r.security.clone(),
            diesel_used: format_optional(r.diesel_used, 0),
            balance: format_optional(r.balance, 0),
        })
        .collect()
}

pub fn generate_summary(
    dipping: &DippingDataset,
    equipment: &EquipmentDataset,
    kpis: &KpiSnapshot,
    config: &Config,
) -> FuelSummary {
    let first_date = dipping.records.first().map(|r| r.date).unwrap_or(kpis.as_of);
    let unresolved_columns = dipping
        .report
        .unresolved
        .iter()
        .map(|f| format!("dipping: {}", f))
        .chain(
            equipment
                .report
                .unresolved
                .iter()
                .map(|f| format!("equipment: {}", f)),
        )
        .collect();
    FuelSummary {
        dipping_records: dipping.records.len(),
        equipment_records: equipment.records.len(),
        first_date,
        last_date: kpis.as_of,
        tank_capacity_l: config.tank_capacity_l,
        low_balance_threshold_l: config.low_balance_threshold_l,
        kpis: kpis.clone(),
        total_fuel_issued: sum_present(equipment.records.iter().map(|r| r.fuel_issued)),
        unresolved_columns,
    }
}
