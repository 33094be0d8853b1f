//! Configuration for the dashboard.
//!
//! Stored as TOML in `~/.enersim/config/enersim.toml` (or under
//! `$ENERSIM_HOME/config/` when that variable is set). A missing default file
//! means "use defaults"; a missing file passed with `--config` is an error.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use enersim_core::DEFAULT_PERCENTAGE;
use enersim_io::LoadOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnersimConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the source report lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Worksheet to read; first sheet when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            sheet: None,
        }
    }
}

impl DataConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
            ..LoadOptions::default()
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("arquivo_csv/relatorio_consumo_energia.xlsx")
}

/// Solar what-if settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Price of one kWh. Deployments have used 0.35 and 0.22.
    #[serde(default = "default_unit_price")]
    pub unit_price_per_kwh: f64,
    /// Currency symbol printed before money values
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Initial slider position, in percent
    #[serde(default = "default_percentage")]
    pub default_percentage: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            unit_price_per_kwh: default_unit_price(),
            currency: default_currency(),
            default_percentage: default_percentage(),
        }
    }
}

fn default_unit_price() -> f64 {
    0.35
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_percentage() -> f64 {
    DEFAULT_PERCENTAGE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Get the enersim home directory (`$ENERSIM_HOME`, else ~/.enersim)
pub fn enersim_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("ENERSIM_HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Cannot determine home directory"))
        .map(|h| h.join(".enersim"))
}

/// Location: ~/.enersim/config/enersim.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(enersim_home()?.join("config").join("enersim.toml"))
}

/// Load from an explicit path, or from the default location if present.
pub fn load_config(explicit: Option<&Path>) -> Result<EnersimConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                Ok(EnersimConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<EnersimConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn save_config(config: &EnersimConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Write the default config if nothing is there yet. Returns true if written.
pub fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&EnersimConfig::default(), path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: EnersimConfig = toml::from_str(
            r#"
[simulation]
unit_price_per_kwh = 0.22
"#,
        )
        .unwrap();
        assert_eq!(config.simulation.unit_price_per_kwh, 0.22);
        assert_eq!(config.simulation.currency, "R$");
        assert_eq!(config.simulation.default_percentage, 30.0);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.data.dataset_path,
            PathBuf::from("arquivo_csv/relatorio_consumo_energia.xlsx")
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("enersim.toml");
        assert!(ensure_config(&path).unwrap());
        assert!(!ensure_config(&path).unwrap());
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, EnersimConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_config_path_ends_with_file_name() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().ends_with("enersim.toml"));
    }
}
