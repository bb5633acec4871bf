// Run configuration: input paths, output directory and tank constants.
//
// Everything has a default so the binary works with no config file at all;
// a JSON file only needs the keys it wants to override.
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "fuel_report.json";
pub const CONFIG_ENV_VAR: &str = "FUEL_REPORT_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dipping_path: PathBuf,
    pub equipment_path: PathBuf,
    pub output_dir: PathBuf,
    pub tank_capacity_l: f64,
    pub low_balance_threshold_l: f64,
    pub top_n: usize,
    pub recent_records: usize,
    /// Fail the load instead of warning when the usage/issued column is missing.
    pub strict_columns: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dipping_path: PathBuf::from("dipping_dataset.csv"),
            equipment_path: PathBuf::from("equipment_dataset.csv"),
            output_dir: PathBuf::from("."),
            tank_capacity_l: 60_000.0,
            low_balance_threshold_l: 5_000.0,
            top_n: 5,
            recent_records: 5,
            strict_columns: false,
        }
    }
}

/// Tank constants the KPI aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankSettings {
    pub capacity_l: f64,
    pub low_balance_threshold_l: f64,
}

impl Default for TankSettings {
    fn default() -> Self {
        Config::default().tank()
    }
}

impl Config {
    pub fn tank(&self) -> TankSettings {
        TankSettings {
            capacity_l: self.tank_capacity_l,
            low_balance_threshold_l: self.low_balance_threshold_l,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.tank_capacity_l.is_finite() || self.tank_capacity_l < 0.0 {
            return Err(ConfigError::Invalid {
                field: "tank_capacity_l".to_string(),
                message: format!("must be a non-negative number, got {}", self.tank_capacity_l),
            });
        }
        if !self.low_balance_threshold_l.is_finite() || self.low_balance_threshold_l < 0.0 {
            return Err(ConfigError::Invalid {
                field: "low_balance_threshold_l".to_string(),
                message: format!(
                    "must be a non-negative number, got {}",
                    self.low_balance_threshold_l
                ),
            });
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "top_n".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: Config =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ConfigError::JsonParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.validate()?;
    Ok(config)
}

/// Resolve the config file location (env var, then the default file name)
/// and load it. A missing file yields the defaults; a broken one is an error.
pub fn load_or_default() -> Result<Config, ConfigError> {
    let path = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match load_config(&path) {
        Ok(config) => {
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Err(ConfigError::NotFound { .. }) => {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_tank() {
        let tank = TankSettings::default();
        assert_eq!(tank.capacity_l, 60_000.0);
        assert_eq!(tank.low_balance_threshold_l, 5_000.0);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tank_capacity_l": 45000, "top_n": 3}}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tank_capacity_l, 45_000.0);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.low_balance_threshold_l, 5_000.0);
        assert_eq!(config.dipping_path, PathBuf::from("dipping_dataset.csv"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "No fuel report settings file at /definitely/not/here.json"
        );
    }

    #[test]
    fn rejects_zero_top_n() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n": 0}}"#).unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "top_n"));
        assert!(err.to_string().starts_with("Setting 'top_n' rejected"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::JsonParseError { .. }));
    }
}
