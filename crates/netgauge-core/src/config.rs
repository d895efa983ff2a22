//! netgauge.toml configuration parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::parse_duration;
use crate::types::Channel;

pub const DEFAULT_SNMP_PORT: u16 = 161;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render toml: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeConfig {
    pub snmp: SnmpConfig,
    pub display: DisplayConfig,
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpConfig {
    pub target: String,
    pub port: Option<u16>,
    pub community: String,
    pub oid: String,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `host[:port]`; port defaults to 80.
    pub address: String,
    pub timeout: Option<String>,
    /// Pause between consecutive commands within one publish cycle.
    pub pacing: Option<String>,
    pub gauge_channel: Channel,
    pub warn_channel: Option<Channel>,
    pub danger_channel: Option<Channel>,
    /// Driven high once at startup.
    pub power_channel: Option<Channel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Megabits per second shown at full deflection.
    pub gauge_max: f64,
    pub warn_threshold: f64,
    pub danger_threshold: f64,
    /// Ticks per publish cycle.
    pub publish_threshold: u32,
    pub tick_interval: Option<String>,
    #[serde(default)]
    pub window: WindowMode,
}

/// How a publish cycle is delimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Publish once `tick_count > publish_threshold`, dividing by
    /// `publish_threshold`: each cycle spans one tick more than it averages.
    #[default]
    Legacy,
    /// Publish once `tick_count >= publish_threshold`.
    Exact,
}

impl GaugeConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GaugeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("snmp.target", &self.snmp.target)?;
        non_empty("snmp.community", &self.snmp.community)?;
        non_empty("snmp.oid", &self.snmp.oid)?;
        non_empty("display.address", &self.display.address)?;

        valid_duration("snmp.timeout", self.snmp.timeout.as_deref())?;
        valid_duration("display.timeout", self.display.timeout.as_deref())?;
        valid_duration("display.pacing", self.display.pacing.as_deref())?;
        valid_duration("sampler.tick_interval", self.sampler.tick_interval.as_deref())?;

        if !(self.sampler.gauge_max.is_finite() && self.sampler.gauge_max > 0.0) {
            return Err(invalid(
                "sampler.gauge_max",
                format!("must be a positive number, got {}", self.sampler.gauge_max),
            ));
        }
        if self.sampler.publish_threshold == 0 {
            return Err(invalid("sampler.publish_threshold", "must be at least 1"));
        }
        Ok(())
    }
}

impl SnmpConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SNMP_PORT)
    }

    pub fn timeout(&self) -> Duration {
        duration_or(self.timeout.as_deref(), DEFAULT_TIMEOUT)
    }
}

impl DisplayConfig {
    pub fn timeout(&self) -> Duration {
        duration_or(self.timeout.as_deref(), DEFAULT_TIMEOUT)
    }

    pub fn pacing(&self) -> Duration {
        duration_or(self.pacing.as_deref(), DEFAULT_PACING)
    }
}

impl SamplerConfig {
    pub fn tick_interval(&self) -> Duration {
        duration_or(self.tick_interval.as_deref(), DEFAULT_TICK_INTERVAL)
    }
}

fn duration_or(value: Option<&str>, default: Duration) -> Duration {
    value.and_then(parse_duration).unwrap_or(default)
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(invalid(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn valid_duration(field: &'static str, value: Option<&str>) -> Result<(), ConfigError> {
    match value {
        Some(s) if parse_duration(s).is_none() => {
            Err(invalid(field, format!("unrecognised duration {s:?}")))
        }
        _ => Ok(()),
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[snmp]
target = "10.1.10.1"
community = "public"
oid = "1.3.6.1.2.1.31.1.1.1.6.15"
timeout = "500ms"

[display]
address = "10.0.1.3"
gauge_channel = 5
warn_channel = 15
danger_channel = 16
power_channel = 14

[sampler]
gauge_max = 50.0
warn_threshold = 100.0
danger_threshold = 200.0
publish_threshold = 10
"#;

    #[test]
    fn parses_full_config_with_defaults() {
        let config = GaugeConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.snmp.port(), 161);
        assert_eq!(config.snmp.timeout(), Duration::from_millis(500));
        assert_eq!(config.display.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.display.pacing(), Duration::from_secs(1));
        assert_eq!(config.display.warn_channel, Some(15));
        assert_eq!(config.sampler.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.sampler.window, WindowMode::Legacy);
    }

    #[test]
    fn parses_exact_window() {
        let toml_str = FULL.replace(
            "publish_threshold = 10",
            "publish_threshold = 10\nwindow = \"exact\"",
        );
        let config = GaugeConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(config.sampler.window, WindowMode::Exact);
    }

    #[test]
    fn led_channels_are_optional() {
        let toml_str = FULL
            .replace("warn_channel = 15\n", "")
            .replace("danger_channel = 16\n", "")
            .replace("power_channel = 14\n", "");
        let config = GaugeConfig::from_toml_str(&toml_str).unwrap();
        assert!(config.display.warn_channel.is_none());
        assert!(config.display.power_channel.is_none());
    }

    #[test]
    fn rejects_zero_threshold() {
        let toml_str = FULL.replace("publish_threshold = 10", "publish_threshold = 0");
        let err = GaugeConfig::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "sampler.publish_threshold",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_gauge_max() {
        let toml_str = FULL.replace("gauge_max = 50.0", "gauge_max = 0.0");
        let err = GaugeConfig::from_toml_str(&toml_str).unwrap_err();
        assert!(err.to_string().contains("sampler.gauge_max"));
    }

    #[test]
    fn rejects_bad_duration() {
        let toml_str = FULL.replace("timeout = \"500ms\"", "timeout = \"fast\"");
        let err = GaugeConfig::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "snmp.timeout",
                ..
            }
        ));
    }

    #[test]
    fn rejects_overflowing_duration() {
        let toml_str = FULL.replace(
            "timeout = \"500ms\"",
            "timeout = \"307445734561825861m\"",
        );
        let err = GaugeConfig::from_toml_str(&toml_str).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "snmp.timeout",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_community() {
        let toml_str = FULL.replace("community = \"public\"", "community = \"\"");
        assert!(GaugeConfig::from_toml_str(&toml_str).is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = GaugeConfig::from_toml_str(FULL).unwrap();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("10.1.10.1"));
        assert!(rendered.contains("window = \"legacy\""));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GaugeConfig::from_file(Path::new("/nonexistent/netgauge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/netgauge.toml"));
    }
}
