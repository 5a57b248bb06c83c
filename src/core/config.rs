//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::multing::StockRules;
use crate::core::stub::{StubResolver, DEFAULT_STUB_MARKERS};

/// Local config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".stk.yaml";

/// Types that are summarized but not itemized
pub const DEFAULT_DNL_TYPES: &[&str] = &["Bucket", "Cxn", "Plate"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Pricing factors used by the pricing report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub misc_factor: f64,
    pub struct_price_factor: f64,
    pub decking_price_factor: f64,
    pub safety_line_price_factor: f64,
    pub mf_hours_per_point: f64,
    pub mf_labor_rate: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            misc_factor: 0.15,
            struct_price_factor: 3.2,
            decking_price_factor: 12.0,
            safety_line_price_factor: 20.0,
            mf_hours_per_point: 4.0,
            mf_labor_rate: 85.0,
        }
    }
}

/// STK configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Saw kerf charged per additional piece in a stock bar (ft)
    pub kerf: Option<f64>,

    /// Longest stock bar that can be bought (ft)
    pub max_stock: Option<f64>,

    /// Stock bars are bought in multiples of this length (ft)
    pub stock_increment: Option<f64>,

    /// Stub markers, in resolution order
    pub stub_markers: Option<Vec<String>>,

    /// Types that are do-not-list
    pub dnl_types: Option<Vec<String>>,

    /// Pricing factors for the report
    pub pricing: Option<Pricing>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors)

        // 2. Global user config (~/.config/stk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Ok(global) = Self::from_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.stk.yaml)
        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(local) = Self::from_file(&cwd.join(LOCAL_CONFIG_FILE)) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        config.apply_env();

        config
    }

    /// Load the layered configuration plus an explicit file, which must exist
    /// and parse
    pub fn load_with(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load();
        if let Some(path) = explicit {
            config.merge(Self::from_file(path)?);
            config.apply_env();
        }
        Ok(config)
    }

    /// Parse a single YAML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, String> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn apply_env(&mut self) {
        if let Some(kerf) = env_f64("STK_KERF") {
            self.kerf = Some(kerf);
        }
        if let Some(max_stock) = env_f64("STK_MAX_STOCK") {
            self.max_stock = Some(max_stock);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.kerf.is_some() {
            self.kerf = other.kerf;
        }
        if other.max_stock.is_some() {
            self.max_stock = other.max_stock;
        }
        if other.stock_increment.is_some() {
            self.stock_increment = other.stock_increment;
        }
        if other.stub_markers.is_some() {
            self.stub_markers = other.stub_markers;
        }
        if other.dnl_types.is_some() {
            self.dnl_types = other.dnl_types;
        }
        if other.pricing.is_some() {
            self.pricing = other.pricing;
        }
    }

    /// Multing parameters
    pub fn stock_rules(&self) -> StockRules {
        let defaults = StockRules::default();
        StockRules {
            max_stock: self.max_stock.unwrap_or(defaults.max_stock),
            kerf: self.kerf.unwrap_or(defaults.kerf),
            stock_increment: self.stock_increment.unwrap_or(defaults.stock_increment),
        }
    }

    pub fn stub_resolver(&self) -> StubResolver {
        match &self.stub_markers {
            Some(markers) => StubResolver::new(markers.clone()),
            None => StubResolver::new(DEFAULT_STUB_MARKERS.iter().map(|m| m.to_string()).collect()),
        }
    }

    pub fn dnl_types(&self) -> Vec<String> {
        self.dnl_types
            .clone()
            .unwrap_or_else(|| DEFAULT_DNL_TYPES.iter().map(|t| t.to_string()).collect())
    }

    pub fn is_dnl_type(&self, type_name: &str) -> bool {
        match &self.dnl_types {
            Some(types) => types.iter().any(|t| t == type_name),
            None => DEFAULT_DNL_TYPES.contains(&type_name),
        }
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing.unwrap_or_default()
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.stock_rules(), StockRules::default());
        assert!(config.is_dnl_type("Bucket"));
        assert!(config.is_dnl_type("Plate"));
        assert!(!config.is_dnl_type("Beam"));
        assert_eq!(config.stub_resolver().markers()[0], "Stub");
        assert_eq!(config.pricing().struct_price_factor, 3.2);
    }

    #[test]
    fn test_yaml_overrides() {
        let config = Config::from_yaml(
            "kerf: 0.125\nstub_markers: [KP, Stub]\npricing:\n  struct_price_factor: 2.7\n",
        )
        .unwrap();
        let rules = config.stock_rules();
        assert_eq!(rules.kerf, 0.125);
        assert_eq!(rules.max_stock, 65.0);
        assert_eq!(config.stub_resolver().de_stub("W 12x50 KP"), "W 12x50");
        let pricing = config.pricing();
        assert_eq!(pricing.struct_price_factor, 2.7);
        assert_eq!(pricing.misc_factor, 0.15);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut config = Config::from_yaml("kerf: 0.5\nmax_stock: 60\n").unwrap();
        config.merge(Config::from_yaml("max_stock: 40\n").unwrap());
        let rules = config.stock_rules();
        assert_eq!(rules.kerf, 0.5);
        assert_eq!(rules.max_stock, 40.0);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("  \n").unwrap();
        assert!(config.kerf.is_none());
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "kerf: [not, a, number]\n").unwrap();
        match Config::from_file(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = Config::from_file(&tmp.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
