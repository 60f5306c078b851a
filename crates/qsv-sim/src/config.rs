//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QSV_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest register `validate` accepts: 2^30 amplitudes is 16 GiB.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Spread shots across worker threads.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Worker count. `None` uses the rayon pool size.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Below this many shots per worker, fewer workers are used.
    #[serde(default = "default_min_shots_per_worker")]
    pub min_shots_per_worker: u32,

    /// Run-level timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Widest circuit accepted.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_min_shots_per_worker() -> u32 {
    256
}

fn default_max_qubits() -> u32 {
    20
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: None,
            parallel: default_true(),
            workers: None,
            min_shots_per_worker: default_min_shots_per_worker(),
            timeout_ms: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed master seed.
    pub fn seeded(seed: u64) -> Self {
        SimConfig {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: SimConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            SimConfig::default()
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `QSV_*` environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Only keys that are present override;
    /// a present but unparsable value is an error.
    fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QSV_SEED") {
            self.seed = Some(parse_var("QSV_SEED", &v)?);
        }
        if let Some(v) = lookup("QSV_PARALLEL") {
            self.parallel = match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "QSV_PARALLEL: expected a boolean, got '{v}'"
                    )));
                }
            };
        }
        if let Some(v) = lookup("QSV_WORKERS") {
            self.workers = Some(parse_var("QSV_WORKERS", &v)?);
        }
        if let Some(v) = lookup("QSV_TIMEOUT_MS") {
            self.timeout_ms = Some(parse_var("QSV_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = lookup("QSV_MAX_QUBITS") {
            self.max_qubits = parse_var("QSV_MAX_QUBITS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::ValidationError(
                "workers must be greater than 0".to_string(),
            ));
        }

        if self.min_shots_per_worker == 0 {
            return Err(ConfigError::ValidationError(
                "min_shots_per_worker must be greater than 0".to_string(),
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than 0; omit it to disable the timeout"
                    .to_string(),
            ));
        }

        if !(1..=MAX_SUPPORTED_QUBITS).contains(&self.max_qubits) {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be between 1 and {MAX_SUPPORTED_QUBITS}, got {}",
                self.max_qubits
            )));
        }

        Ok(())
    }

    /// The run-level timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::ParseError(format!("{key}: {e}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.seed, None);
        assert!(config.parallel);
        assert_eq!(config.min_shots_per_worker, 256);
        assert_eq!(config.max_qubits, 20);
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = SimConfig {
            workers: Some(0),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_qubits_range() {
        let mut config = SimConfig::default();
        config.max_qubits = 0;
        assert!(config.validate().is_err());
        config.max_qubits = MAX_SUPPORTED_QUBITS + 1;
        assert!(config.validate().is_err());
        config.max_qubits = MAX_SUPPORTED_QUBITS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: 42\nworkers: 3\ntimeout_ms: 250").unwrap();

        let config = SimConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert!(config.parallel);
        assert_eq!(config.max_qubits, 20);
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            SimConfig::from_file("/nonexistent/qsv.yaml"),
            Err(ConfigError::IoError(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: [not, a, number]").unwrap();
        assert!(matches!(
            SimConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_qubits: 64").unwrap();
        assert!(matches!(
            SimConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let file_config = SimConfig {
            seed: Some(1),
            workers: Some(2),
            ..SimConfig::default()
        };
        let merged = file_config
            .merge_vars(vars(&[
                ("QSV_SEED", "99"),
                ("QSV_PARALLEL", "off"),
                ("QSV_TIMEOUT_MS", "1500"),
            ]))
            .unwrap();
        assert_eq!(merged.seed, Some(99));
        assert_eq!(merged.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(merged.workers, Some(2));
        assert!(!merged.parallel);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let result = SimConfig::default().merge_vars(vars(&[("QSV_WORKERS", "many")]));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let result = SimConfig::default().merge_vars(vars(&[("QSV_PARALLEL", "maybe")]));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
