//! Configuration loading
//!
//! ## Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. The override in the data dir (`~/.local/share/pennywise/config.toml`)
//! 3. Embedded defaults (compiled into the binary)
//!
//! After the file, `PENNYWISE_BACKEND_URL` overrides the backend URL.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fields::ReportingPeriod;
use crate::metrics::{MetricsConfig, DEFAULT_SEMESTER_DIVISOR};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pennywise.toml");

/// Environment variable overriding the backend URL
pub const BACKEND_URL_ENV: &str = "PENNYWISE_BACKEND_URL";

/// Which backend client to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Http,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown backend kind: {}", s)),
        }
    }
}

/// Analytics backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Http,
            url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: BackendConfig,
    pub metrics: MetricsConfig,
    pub source: ConfigSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            metrics: MetricsConfig::default(),
            source: ConfigSource::Embedded,
        }
    }
}

impl Config {
    /// Load configuration following the resolution order, then apply the
    /// environment override
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => parse_config(DEFAULT_CONFIG)?,
            },
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.set_backend_url(&url);
            }
        }

        debug!(source = %config.source, url = %config.backend.url, "Loaded configuration");
        Ok(config)
    }

    /// Load from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut config = parse_config(&content)?;
        config.source = ConfigSource::File(path.to_path_buf());
        Ok(config)
    }

    pub fn set_backend_url(&mut self, url: &str) {
        self.backend.url = url.trim().trim_end_matches('/').to_string();
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pennywise").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    backend: Option<RawBackend>,
    metrics: Option<RawMetrics>,
}

#[derive(Debug, Deserialize)]
struct RawBackend {
    kind: Option<String>,
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawMetrics {
    semester_divisor: Option<f64>,
    technology_period: Option<String>,
}

/// Parse config from TOML content over the defaults
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(backend) = raw.backend {
        if let Some(kind) = backend.kind {
            config.backend.kind = kind.parse().map_err(Error::Config)?;
        }
        if let Some(url) = backend.url {
            config.set_backend_url(&url);
        }
        if let Some(timeout) = backend.timeout_secs {
            if timeout == 0 {
                return Err(Error::Config("backend.timeout_secs must be positive".into()));
            }
            config.backend.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(metrics) = raw.metrics {
        let divisor = metrics.semester_divisor.unwrap_or(DEFAULT_SEMESTER_DIVISOR);
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(Error::Config(format!(
                "metrics.semester_divisor must be a positive number, got {}",
                divisor
            )));
        }
        config.metrics.semester_divisor = divisor;

        if let Some(period) = metrics.technology_period {
            let period: ReportingPeriod = period.parse().map_err(Error::Config)?;
            if period == ReportingPeriod::Semester {
                return Err(Error::Config(
                    "metrics.technology_period must be monthly or annual".into(),
                ));
            }
            config.metrics.technology_period = period;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Http);
        assert_eq!(config.backend.url, "http://localhost:8000");
        assert_eq!(config.backend.timeout, Duration::from_secs(10));
        assert_eq!(config.metrics, MetricsConfig::default());
        assert_eq!(config.source, ConfigSource::Embedded);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[metrics]\ntechnology_period = \"annual\"\n").unwrap();
        assert_eq!(config.metrics.technology_period, ReportingPeriod::Annual);
        assert_eq!(config.metrics.semester_divisor, 4.0);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_backend_section() {
        let config = parse_config(
            "[backend]\nkind = \"mock\"\nurl = \"http://analytics.local:9000/\"\ntimeout_secs = 3\n",
        )
        .unwrap();
        assert_eq!(config.backend.kind, BackendKind::Mock);
        assert_eq!(config.backend.url, "http://analytics.local:9000");
        assert_eq!(config.backend.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        for content in [
            "[metrics]\nsemester_divisor = 0.0\n",
            "[metrics]\nsemester_divisor = -4.0\n",
            "[metrics]\ntechnology_period = \"semester\"\n",
            "[metrics]\ntechnology_period = \"weekly\"\n",
            "[backend]\nkind = \"grpc\"\n",
            "[backend]\ntimeout_secs = 0\n",
            "not toml at all [",
        ] {
            assert!(
                matches!(parse_config(content), Err(Error::Config(_))),
                "accepted: {}",
                content
            );
        }
    }

    #[test]
    fn test_from_file_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[metrics]\nsemester_divisor = 4.5").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.metrics.semester_divisor, 4.5);
        assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_set_backend_url_trims() {
        let mut config = Config::default();
        config.set_backend_url(" http://10.0.0.5:8000// ");
        assert_eq!(config.backend.url, "http://10.0.0.5:8000");
    }
}
