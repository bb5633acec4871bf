// Entry point and console menu.
//
// - Option [1] loads both CSV logs (cached per file identity) and prints
//   load diagnostics.
// - Option [2] computes the KPIs, writes the report tables and the JSON
//   summary, and previews each table.
// - Option [3] drills into one month and one week of diesel usage.
use fuel_report::cache::DatasetCache;
use fuel_report::config::{self, Config};
use fuel_report::columns::Field;
use fuel_report::loader::{Dataset, DIPPING, EQUIPMENT};
use fuel_report::output;
use fuel_report::periods;
use fuel_report::pipeline::{self, LoadedData};
use fuel_report::reports;
use fuel_report::types::KpiSnapshot;
use fuel_report::util::{format_int, format_number, format_optional};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

// Loaded datasets live here between menu actions so the CSVs are parsed once.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    config: Config,
    cache: DatasetCache,
    data: Option<LoadedData>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Returns `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_load_report<T>(name: &str, dataset: &Dataset<T>, usage: Field) {
    let report = &dataset.report;
    println!(
        "{} dataset: {} rows loaded ({} skipped for missing dates, {} unreadable numbers kept as blanks)",
        name,
        format_int(report.loaded_rows),
        format_int(report.skipped_rows),
        format_int(report.unparsable_cells)
    );
    if let Some(column) = dataset.columns.get(usage) {
        println!("Using '{}' for {}.", column.header, usage);
    }
    if !report.unresolved.is_empty() {
        let fields: Vec<&str> = report.unresolved.iter().map(|f| f.label()).collect();
        println!("Warning: no column found for {}.", fields.join(", "));
    }
}

fn handle_load() {
    let mut guard = state();
    let app = &mut *guard;
    match pipeline::load(&mut app.cache, &app.config) {
        Ok(data) => {
            println!("Processing datasets...");
            print_load_report(DIPPING, &data.dipping, Field::DieselUsed);
            print_load_report(EQUIPMENT, &data.equipment, Field::FuelIssued);
            println!();
            app.data = Some(data);
        }
        Err(e) => {
            log::error!("Load failed: {}", e);
            eprintln!("Failed to load files: {}\n", e);
        }
    }
}

fn print_kpis(kpis: &KpiSnapshot, config: &Config) {
    let forecast = match kpis.forecast_days_remaining {
        Some(days) => format!(
            "{} Days Until {}L",
            format_number(days, 0),
            format_number(config.low_balance_threshold_l, 0)
        ),
        None => "Forecast unavailable".to_string(),
    };
    println!("Fuel KPIs as of {}", kpis.as_of.format("%d-%b-%Y"));
    println!("  Available Diesel:  {} L", format_optional(kpis.available_balance, 0));
    println!("  Daily Consumption: {} L", format_number(kpis.latest_daily_usage, 0));
    println!("  Avg Daily Use:     {} L", format_optional(kpis.average_daily_usage, 0));
    println!("  Max Consumption:   {} L", format_optional(kpis.peak_daily_usage, 0));
    println!(
        "  Tank Level:        {}% ({})",
        format_optional(kpis.tank_fill_percentage, 1),
        kpis.tank_status.label()
    );
    println!("  {}\n", forecast);
}

fn handle_generate_reports() {
    let (data, config) = {
        let app = state();
        (app.data.clone(), app.config.clone())
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV files first (option 1).\n");
        return;
    };

    let built = match pipeline::build_reports(&data, &config) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Report generation failed: {}", e);
            eprintln!("Cannot generate reports: {}\n", e);
            return;
        }
    };
    print_kpis(&built.summary.kpis, &config);

    match pipeline::write_reports(&built, &config) {
        Ok(paths) => println!("Outputs saved to {} files.\n", paths.len()),
        Err(e) => eprintln!("Write error: {}", e),
    }

    println!("Weekly Diesel Consumption");
    output::preview_table_rows(&built.weekly, 5);
    println!("Top {} Fuel Consumers (by Fleet No)", config.top_n);
    output::preview_table_rows(&built.consumers, config.top_n);
    println!("Fuel Usage by Activity (Top 5 + Other)");
    output::preview_table_rows(&built.activity, 6);
    println!("Recent Fuel Records");
    output::preview_table_rows(&built.recent, config.recent_records);
    println!("Personnel Shifts");
    output::preview_table_rows(&built.personnel, 10);
}

fn handle_drill_down() {
    let data = state().data.clone();
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV files first (option 1).\n");
        return;
    };
    if data.dipping.is_empty() {
        println!("No dated dipping records to slice.\n");
        return;
    }
    let records = &data.dipping.records;
    let months = periods::bucket(records);
    for (idx, m) in months.iter().enumerate() {
        println!("[{}] {} {}", idx + 1, m.name, m.year);
    }
    let Some(month) = prompt("Select month: ")
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| months.get(i))
    else {
        println!("Invalid month.\n");
        return;
    };
    let weeks: Vec<String> = month.weeks.iter().map(|w| w.week.to_string()).collect();
    let week = prompt(&format!("Select week of month ({}): ", weeks.join("/")))
        .parse::<u32>()
        .unwrap_or(0);
    let rows = reports::daily_usage_report(records, month, week);
    println!("\nDaily Fuel Consumption, {} Week {}", month.name, week);
    output::preview_table_rows(&rows, 7);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::load_or_default() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    {
        let mut app = state();
        app.cache = DatasetCache::new(config.strict_columns);
        app.config = config;
    }

    loop {
        println!("Fuel Farm Reports:");
        println!("[1] Load the files");
        println!("[2] Generate Reports");
        println!("[3] Monthly / Weekly Drill-down\n");
        match read_choice().as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_drill_down(),
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}
