//! Forecast configuration
//!
//! Config is loaded with a three-layer resolution:
//! 1. Explicit path, else the override in the config dir
//!    (~/.config/tally/forecast.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//! 3. Environment variables on top (`TALLY_*`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::MAX_MONTHS_AHEAD;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

/// Synthetic projection used when no trend can be fitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackProjection {
    pub base_income: f64,
    pub base_expense: f64,
    /// Month `i` is scaled by `1 + growth_step * i`
    pub growth_step: f64,
}

impl Default for FallbackProjection {
    fn default() -> Self {
        Self {
            base_income: 500_000.0,
            base_expense: 350_000.0,
            growth_step: 0.05,
        }
    }
}

/// Finance backend connection
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL; transactions live at `<url>/transactions`
    pub url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000/api/finance".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            allowed_origins: vec![],
        }
    }
}

/// Effective configuration for the forecast service
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Forecast horizon in months (always positive)
    pub months_ahead: u32,
    /// Trailing buckets included as history in reports
    pub history_months: usize,
    pub fallback: FallbackProjection,
    pub backend: BackendConfig,
    pub server: ServerSettings,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            months_ahead: 3,
            history_months: 6,
            fallback: FallbackProjection::default(),
            backend: BackendConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

impl ForecastConfig {
    /// Load config from file (override first, then embedded default), then
    /// apply environment overrides.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(override_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from file only, ignoring the environment
    pub fn load_file(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?,
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse config from TOML content, filling unset keys with defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(forecast) = raw.forecast {
            if let Some(months) = forecast.months_ahead {
                config.months_ahead = months;
            }
            if let Some(history) = forecast.history_months {
                config.history_months = history;
            }
        }

        if let Some(fallback) = raw.fallback {
            if let Some(income) = fallback.base_income {
                config.fallback.base_income = income;
            }
            if let Some(expense) = fallback.base_expense {
                config.fallback.base_expense = expense;
            }
            if let Some(step) = fallback.growth_step {
                config.fallback.growth_step = step;
            }
        }

        if let Some(backend) = raw.backend {
            if let Some(url) = backend.url {
                config.backend.url = url;
            }
            if let Some(secs) = backend.timeout_secs {
                config.backend.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                config.server.allowed_origins = origins;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply `TALLY_*` overrides from a key lookup (the process environment
    /// in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("TALLY_BACKEND_URL") {
            self.backend.url = url.trim().to_string();
        }
        if let Some(secs) = get("TALLY_BACKEND_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("TALLY_BACKEND_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            self.backend.timeout = Duration::from_secs(secs);
        }
        if let Some(months) = get("TALLY_MONTHS_AHEAD") {
            self.months_ahead = months.trim().parse::<u32>().map_err(|_| {
                Error::Config(format!("TALLY_MONTHS_AHEAD is not a number: {}", months))
            })?;
        }
        if let Some(origins) = get("TALLY_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.months_ahead == 0 {
            return Err(Error::Config("months_ahead must be at least 1".into()));
        }
        if self.months_ahead > MAX_MONTHS_AHEAD {
            return Err(Error::Config(format!(
                "months_ahead must be at most {}",
                MAX_MONTHS_AHEAD
            )));
        }
        let fb = &self.fallback;
        if !(fb.base_income.is_finite() && fb.base_income >= 0.0)
            || !(fb.base_expense.is_finite() && fb.base_expense >= 0.0)
        {
            return Err(Error::Config(
                "fallback base amounts must be finite and non-negative".into(),
            ));
        }
        if !(fb.growth_step.is_finite() && fb.growth_step >= 0.0) {
            return Err(Error::Config(
                "fallback growth_step must be finite and non-negative".into(),
            ));
        }
        let peak = 1.0 + fb.growth_step * f64::from(MAX_MONTHS_AHEAD);
        if !(fb.base_income.max(fb.base_expense) * peak * 100.0).is_finite() {
            return Err(Error::Config("fallback amounts are too large".into()));
        }
        if self.backend.url.trim().is_empty() {
            return Err(Error::Config("backend url must not be empty".into()));
        }
        if self.backend.timeout.is_zero() {
            return Err(Error::Config("backend timeout must be positive".into()));
        }
        Ok(())
    }

    /// Render the effective config as TOML
    pub fn to_toml(&self) -> Result<String> {
        let raw = RawConfig {
            forecast: Some(RawForecast {
                months_ahead: Some(self.months_ahead),
                history_months: Some(self.history_months),
            }),
            fallback: Some(RawFallback {
                base_income: Some(self.fallback.base_income),
                base_expense: Some(self.fallback.base_expense),
                growth_step: Some(self.fallback.growth_step),
            }),
            backend: Some(RawBackend {
                url: Some(self.backend.url.clone()),
                timeout_secs: Some(self.backend.timeout.as_secs()),
            }),
            server: Some(RawServer {
                host: Some(self.server.host.clone()),
                port: Some(self.server.port),
                allowed_origins: Some(self.server.allowed_origins.clone()),
            }),
        };
        toml::to_string_pretty(&raw)
            .map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("forecast.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<RawForecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<RawFallback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<RawBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<RawServer>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawForecast {
    months_ahead: Option<u32>,
    history_months: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawFallback {
    base_income: Option<f64>,
    base_expense: Option<f64>,
    growth_step: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawBackend {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = ForecastConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ForecastConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ForecastConfig::parse(
            r#"
            [forecast]
            months_ahead = 6

            [backend]
            url = "http://finance.internal/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.months_ahead, 6);
        assert_eq!(config.history_months, 6);
        assert_eq!(config.backend.url, "http://finance.internal/api");
        assert_eq!(config.backend.timeout, Duration::from_secs(10));
        assert_eq!(config.fallback, FallbackProjection::default());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = ForecastConfig::parse("[forecast\nmonths_ahead = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = ForecastConfig::parse("[forecast]\nmonths_ahead = 0").unwrap_err();
        assert!(err.to_string().contains("months_ahead"));
    }

    #[test]
    fn test_horizon_above_limit_rejected() {
        assert!(ForecastConfig::parse("[forecast]\nmonths_ahead = 120").is_ok());
        let err = ForecastConfig::parse("[forecast]\nmonths_ahead = 121").unwrap_err();
        assert!(err.to_string().contains("at most 120"));
    }

    #[test]
    fn test_negative_fallback_rejected() {
        assert!(ForecastConfig::parse("[fallback]\nbase_income = -1.0").is_err());
    }

    #[test]
    fn test_oversized_fallback_rejected() {
        let err = ForecastConfig::parse("[fallback]\nbase_income = 1e307").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_negative_growth_step_rejected() {
        let err = ForecastConfig::parse("[fallback]\ngrowth_step = -0.5").unwrap_err();
        assert!(err.to_string().contains("growth_step"));
        assert!(ForecastConfig::parse("[fallback]\ngrowth_step = 0.0").is_ok());
    }

    #[test]
    fn test_load_from_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8080\nallowed_origins = [\"http://a.test\"]").unwrap();

        let config = ForecastConfig::load_file(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.allowed_origins, vec!["http://a.test"]);
    }

    #[test]
    fn test_missing_override_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ForecastConfig::load_file(Some(&missing)).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TALLY_BACKEND_URL", "http://backend:4000/api/finance"),
            ("TALLY_MONTHS_AHEAD", "12"),
            ("TALLY_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
            ("TALLY_BACKEND_TIMEOUT_SECS", "3"),
        ]);
        let mut config = ForecastConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend.url, "http://backend:4000/api/finance");
        assert_eq!(config.months_ahead, 12);
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(config.backend.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_env_override() {
        let mut config = ForecastConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "TALLY_MONTHS_AHEAD").then(|| "three".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_env_horizon_above_limit_rejected() {
        let mut config = ForecastConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "TALLY_MONTHS_AHEAD").then(|| "4000000000".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = ForecastConfig::default();
        config.months_ahead = 4;
        config.server.allowed_origins = vec!["http://a.test".to_string()];

        let rendered = config.to_toml().unwrap();
        assert_eq!(ForecastConfig::parse(&rendered).unwrap(), config);
    }
}
