use crate::errors::{FuelError, Result};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let csv_err = |source: csv::Error| FuelError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| FuelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| FuelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConsumerRow;

    fn rows() -> Vec<ConsumerRow> {
        vec![ConsumerRow {
            rank: 1,
            fleet: "EX-001".to_string(),
            issues: 3,
            litres: "1,200".to_string(),
        }]
    }

    #[test]
    fn csv_uses_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consumers.csv");
        write_csv(&path, &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Rank,FleetNo,Issues,Litres\n"));
        assert!(text.contains("1,EX-001,3,\"1,200\""));
    }

    #[test]
    fn markdown_preview_has_header_and_placeholder() {
        let rendered = render_table(&rows(), 2);
        assert!(rendered.contains("FleetNo"));
        assert!(rendered.contains("EX-001"));
        assert_eq!(render_table::<ConsumerRow>(&[], 2), "(no rows)");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let err = write_json(Path::new("/no/such/dir/summary.json"), &1).unwrap_err();
        assert!(matches!(err, FuelError::Io { .. }));
    }
}
