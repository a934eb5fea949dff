//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Environment variable that overrides `remote.api_key`
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub retry: RetryConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempt budget when `unbounded` is false
    pub max_attempts: u32,
    /// Retry forever. A service that never recovers stalls the run.
    pub unbounded: bool,
    pub cooloff_min_secs: u64,
    pub cooloff_max_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub max_files: usize,
    /// Scores below this are forced to zero before ranking
    pub min_match_score: u8,
    pub experience_mode: ExperienceMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

/// How the "Total Experience" column is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceMode {
    /// Sum of locally normalized per-company month counts
    Local,
    /// Dedicated model call over the concatenated duration strings
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
    Markdown,
    Html,
}

/// Retry budget for the remote caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryLimit {
    Bounded(u32),
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub limit: RetryLimit,
    pub cooloff_min: Duration,
    pub cooloff_max: Duration,
}

impl RetryPolicy {
    pub fn bounded(attempts: u32) -> Self {
        Self {
            limit: RetryLimit::Bounded(attempts.max(1)),
            ..Self::default()
        }
    }

    pub fn unbounded() -> Self {
        Self {
            limit: RetryLimit::Unbounded,
            ..Self::default()
        }
    }

    pub fn with_cooloff(mut self, min: Duration, max: Duration) -> Self {
        self.cooloff_min = min.min(max);
        self.cooloff_max = max.max(min);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: RetryLimit::Bounded(5),
            cooloff_min: Duration::from_secs(8),
            cooloff_max: Duration::from_secs(20),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                api_key: None,
                timeout_secs: 90,
            },
            retry: RetryConfig {
                max_attempts: 5,
                unbounded: false,
                cooloff_min_secs: 8,
                cooloff_max_secs: 20,
            },
            pipeline: PipelineConfig {
                max_files: 5,
                min_match_score: 30,
                experience_mode: ExperienceMode::Local,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, creating it with defaults if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path` and apply the API key environment override.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_from(path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.remote.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Contents of `path` exactly as stored, created with defaults if missing.
    pub fn read_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = if self.retry.unbounded {
            RetryPolicy::unbounded()
        } else {
            RetryPolicy::bounded(self.retry.max_attempts)
        };
        policy.with_cooloff(
            Duration::from_secs(self.retry.cooloff_min_secs),
            Duration::from_secs(self.retry.cooloff_max_secs),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    /// Set a single value addressed by a dotted key, e.g. `retry.max_attempts`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote.endpoint" => self.remote.endpoint = value.to_string(),
            "remote.api_key" => {
                self.remote.api_key = (!value.is_empty()).then(|| value.to_string())
            }
            "remote.timeout_secs" => self.remote.timeout_secs = parse_value(key, value)?,
            "retry.max_attempts" => self.retry.max_attempts = parse_value(key, value)?,
            "retry.unbounded" => self.retry.unbounded = parse_value(key, value)?,
            "retry.cooloff_min_secs" => self.retry.cooloff_min_secs = parse_value(key, value)?,
            "retry.cooloff_max_secs" => self.retry.cooloff_max_secs = parse_value(key, value)?,
            "pipeline.max_files" => self.pipeline.max_files = parse_value(key, value)?,
            "pipeline.min_match_score" => {
                let score: u8 = parse_value(key, value)?;
                self.pipeline.min_match_score = score.min(100);
            }
            "pipeline.experience_mode" => {
                self.pipeline.experience_mode = parse_experience_mode(value)
                    .map_err(ScreenerError::Configuration)?
            }
            "output.format" => {
                self.output.format =
                    crate::cli::parse_output_format(value).map_err(ScreenerError::Configuration)?
            }
            "output.detailed" => self.output.detailed = parse_value(key, value)?,
            "output.color_output" => self.output.color_output = parse_value(key, value)?,
            _ => {
                return Err(ScreenerError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let parsed = value
        .parse::<T>()
        .with_context(|| format!("Invalid value '{}' for {}", value, key))?;
    Ok(parsed)
}

pub fn parse_experience_mode(value: &str) -> std::result::Result<ExperienceMode, String> {
    match value.to_lowercase().as_str() {
        "local" => Ok(ExperienceMode::Local),
        "model" => Ok(ExperienceMode::Model),
        _ => Err(format!("Invalid experience mode: {}. Supported: local, model", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy_is_bounded() {
        let policy = Config::default().retry_policy();
        assert_eq!(policy.limit, RetryLimit::Bounded(5));
        assert_eq!(policy.cooloff_min, Duration::from_secs(8));
        assert_eq!(policy.cooloff_max, Duration::from_secs(20));
    }

    #[test]
    fn test_unbounded_flag_wins_over_attempts() {
        let mut config = Config::default();
        config.retry.unbounded = true;
        assert_eq!(config.retry_policy().limit, RetryLimit::Unbounded);
    }

    #[test]
    fn test_cooloff_window_is_ordered() {
        let policy = RetryPolicy::bounded(0)
            .with_cooloff(Duration::from_secs(20), Duration::from_secs(8));
        assert_eq!(policy.limit, RetryLimit::Bounded(1));
        assert!(policy.cooloff_min <= policy.cooloff_max);
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("retry.max_attempts", "3").unwrap();
        config.set_value("pipeline.experience_mode", "model").unwrap();
        config.set_value("pipeline.min_match_score", "250").unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.pipeline.experience_mode, ExperienceMode::Model);
        assert_eq!(config.pipeline.min_match_score, 100);

        assert!(config.set_value("retry.max_attempts", "many").is_err());
        assert!(config.set_value("nope.key", "1").is_err());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.pipeline.max_files, 5);

        let mut edited = created.clone();
        edited.set_value("output.format", "csv").unwrap();
        edited.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.output.format, OutputFormat::Csv);
        assert_eq!(reloaded.remote.timeout_secs, 90);
    }
}
