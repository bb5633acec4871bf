// Month / week-of-month slicing of the dipping log.
//
// Months are keyed by (year, month) so two Julys from different years never
// merge; the month name is only the display label. Input must already be
// sorted by date, which makes every bucket a contiguous index range.
use crate::types::FuelLogRecord;
use crate::util::{month_key, month_name, sum_present, week_of_month};
use chrono::{Datelike, NaiveDate};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodKey {
    pub month: String,
    pub week_of_month: u32,
}

pub fn period_key(date: NaiveDate) -> PeriodKey {
    PeriodKey {
        month: month_name(date),
        week_of_month: week_of_month(date.day()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub week: u32,
    pub rows: Range<usize>,
}

impl WeekBucket {
    pub fn label(&self) -> String {
        format!("Week {}", self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub name: String,
    pub rows: Range<usize>,
    pub weeks: Vec<WeekBucket>,
}

impl MonthBucket {
    pub fn week(&self, week: u32) -> Option<&WeekBucket> {
        self.weeks.iter().find(|w| w.week == week)
    }
}

/// Split consecutive runs of equal keys into index ranges.
fn runs<K: PartialEq>(range: Range<usize>, key: impl Fn(usize) -> K) -> Vec<(K, Range<usize>)> {
    let mut out: Vec<(K, Range<usize>)> = Vec::new();
    for i in range {
        let k = key(i);
        if let Some((last, r)) = out.last_mut() {
            if *last == k {
                r.end = i + 1;
                continue;
            }
        }
        out.push((k, i..i + 1));
    }
    out
}

/// Partition date-ordered records into months, then weeks of the month.
pub fn bucket(records: &[FuelLogRecord]) -> Vec<MonthBucket> {
    runs(0..records.len(), |i| month_key(records[i].date))
        .into_iter()
        .map(|((year, month), rows)| {
            let weeks = runs(rows.clone(), |i| week_of_month(records[i].date.day()))
                .into_iter()
                .map(|(week, rows)| WeekBucket { week, rows })
                .collect();
            MonthBucket {
                year,
                month,
                name: month_name(records[rows.start].date),
                rows,
                weeks,
            }
        })
        .collect()
}

/// Diesel used per week of one month; missing readings count as nothing.
pub fn weekly_usage(records: &[FuelLogRecord], month: &MonthBucket) -> Vec<(u32, usize, f64)> {
    month
        .weeks
        .iter()
        .map(|w| {
            let total = sum_present(records[w.rows.clone()].iter().map(|r| r.diesel_used));
            (w.week, w.rows.len(), total)
        })
        .collect()
}

/// The individual days of one week, in date order.
pub fn daily_usage<'a>(records: &'a [FuelLogRecord], week: &WeekBucket) -> &'a [FuelLogRecord] {
    &records[week.rows.clone()]
}
