use crate::columns::{ColumnRule, Field, ResolvedColumnMap, DIPPING_RULES, EQUIPMENT_RULES};
use crate::errors::{FuelError, Result};
use crate::types::{EquipmentLogRecord, FuelLogRecord};
use crate::util::{normalize_number, parse_date_safe};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

pub const DIPPING: &str = "dipping";
pub const EQUIPMENT: &str = "equipment";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows dropped because the date cell was missing or unreadable.
    pub skipped_rows: usize,
    /// Non-empty numeric cells that did not parse and were kept as missing.
    pub unparsable_cells: usize,
    pub unresolved: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Dataset<T> {
    pub records: Vec<T>,
    pub columns: ResolvedColumnMap,
    pub report: LoadReport,
}

impl<T> Dataset<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub type DippingDataset = Dataset<FuelLogRecord>;
pub type EquipmentDataset = Dataset<EquipmentLogRecord>;

pub trait HasDate {
    fn date(&self) -> NaiveDate;
}

impl HasDate for FuelLogRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl HasDate for EquipmentLogRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Headers and raw rows of one CSV file.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

fn read_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(FuelError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }
    let csv_err = |source: csv::Error| FuelError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result.map_err(csv_err)?);
    }
    Ok(RawTable { headers, rows })
}

/// Per-row cell access through the resolved column map.
struct RowReader<'a> {
    row: &'a StringRecord,
    columns: &'a ResolvedColumnMap,
}

impl<'a> RowReader<'a> {
    fn text(&self, field: Field) -> Option<&'a str> {
        self.columns
            .index(field)
            .and_then(|i| self.row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn number(&self, field: Field, unparsable: &mut usize) -> Option<f64> {
        let raw = self.text(field)?;
        let value = normalize_number(Some(raw));
        if value.is_none() {
            *unparsable += 1;
            log::debug!("Unparsable {} value '{}', treating as missing", field, raw);
        }
        value
    }
}

fn resolve_columns(
    dataset: &str,
    headers: &[String],
    rules: &[ColumnRule],
    required: Field,
    strict: bool,
) -> Result<ResolvedColumnMap> {
    let columns = ResolvedColumnMap::build(headers, rules);
    if !columns.is_resolved(Field::Date) {
        return Err(FuelError::MissingDateColumn {
            dataset: dataset.to_string(),
        });
    }
    for field in columns.unresolved() {
        log::warn!("No column found for '{}' in the {} dataset", field, dataset);
    }
    if strict && !columns.is_resolved(required) {
        return Err(FuelError::UnresolvedColumn {
            dataset: dataset.to_string(),
            field: required.label().to_string(),
        });
    }
    Ok(columns)
}

/// Shared load loop: resolve columns, build records, sort by date.
fn load_dataset<T, F>(
    path: &Path,
    dataset: &str,
    rules: &[ColumnRule],
    required: Field,
    strict: bool,
    build: F,
) -> Result<Dataset<T>>
where
    F: Fn(&RowReader<'_>, NaiveDate, &mut usize) -> T,
    T: HasDate,
{
    let table = read_table(path)?;
    let columns = resolve_columns(dataset, &table.headers, rules, required, strict)?;

    let mut report = LoadReport {
        total_rows: table.rows.len(),
        unresolved: columns.unresolved().to_vec(),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());
    for (line, row) in table.rows.iter().enumerate() {
        let reader = RowReader {
            row,
            columns: &columns,
        };
        let Some(date) = parse_date_safe(reader.text(Field::Date)) else {
            log::warn!("Skipping {} row {}: missing or invalid date", dataset, line + 2);
            report.skipped_rows += 1;
            continue;
        };
        records.push(build(&reader, date, &mut report.unparsable_cells));
    }
    // stable: same-day rows keep file order
    records.sort_by_key(|r| r.date());
    report.loaded_rows = records.len();

    log::info!(
        "Loaded {} of {} {} rows from {} ({} skipped, {} unparsable cells)",
        report.loaded_rows,
        report.total_rows,
        dataset,
        path.display(),
        report.skipped_rows,
        report.unparsable_cells
    );
    Ok(Dataset {
        records,
        columns,
        report,
    })
}

pub fn load_dipping(path: &Path, strict: bool) -> Result<DippingDataset> {
    load_dataset(
        path,
        DIPPING,
        DIPPING_RULES,
        Field::DieselUsed,
        strict,
        |row, date, bad| FuelLogRecord {
            date,
            morning_dip: row.number(Field::MorningDip, bad),
            evening_dip: row.number(Field::EveningDip, bad),
            diesel_used: row.number(Field::DieselUsed, bad),
            balance: row.number(Field::Balance, bad),
            attendant: row.text(Field::Attendant).unwrap_or_default().to_string(),
            security: row.text(Field::Security).unwrap_or_default().to_string(),
        },
    )
}

pub fn load_equipment(path: &Path, strict: bool) -> Result<EquipmentDataset> {
    load_dataset(
        path,
        EQUIPMENT,
        EQUIPMENT_RULES,
        Field::FuelIssued,
        strict,
        |row, date, bad| {
            let equipment = row.text(Field::Equipment).unwrap_or(UNKNOWN).to_string();
            // no fleet column: identify by equipment name instead
            let fleet = if row.columns.is_resolved(Field::Fleet) {
                row.text(Field::Fleet).unwrap_or(UNKNOWN).to_string()
            } else {
                equipment.clone()
            };
            EquipmentLogRecord {
                date,
                equipment,
                fleet,
                fuel_issued: row.number(Field::FuelIssued, bad),
                activity: row.text(Field::Activity).unwrap_or(UNKNOWN).to_string(),
            }
        },
    )
}
