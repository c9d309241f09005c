// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const CLIENT_API_KEY_ENV: &str = "TALENTAI_API_KEY";

/// How the server reaches the chat-completion gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub gateway_url: String,
    pub analysis_model: String,
    pub ocr_model: String,
    pub request_timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            gateway_url: "https://ai.gateway.lovable.dev/v1/chat/completions".to_string(),
            analysis_model: "google/gemini-3-flash-preview".to_string(),
            ocr_model: "google/gemini-2.5-flash".to_string(),
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub port: u16,
    #[serde(flatten)]
    pub gateway: GatewaySettings,
    /// Base URL the CLI client uses to reach the functions
    pub api_base_url: String,
    pub screening_delay_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            gateway: GatewaySettings::default(),
            api_base_url: "http://127.0.0.1:8000/functions/v1".to_string(),
            screening_delay_ms: 1000,
            log_file: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn screening_delay(&self) -> Duration {
        Duration::from_millis(self.screening_delay_ms)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

/// Where the active settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file was absent and built-in defaults are in use
    Defaults(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub settings: EnvironmentConfig,
    pub source: ConfigSource,
}

impl AppConfig {
    /// Load the section of `path` matching the current environment.
    /// Runs before logging is set up; call [`AppConfig::log_summary`] afterwards.
    pub fn load(path: &Path) -> Result<Self> {
        let environment = Self::get_environment();

        let (mut settings, source) = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let settings = Self::select(&content, &environment)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            (settings, ConfigSource::File(path.to_path_buf()))
        } else {
            (
                EnvironmentConfig::default(),
                ConfigSource::Defaults(path.to_path_buf()),
            )
        };

        if let Ok(port) = std::env::var("ROCKET_PORT") {
            settings.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        Ok(Self {
            environment,
            settings,
            source,
        })
    }

    pub fn log_summary(&self) {
        match &self.source {
            ConfigSource::File(path) => info!(
                "Loaded configuration for environment {} from {}",
                self.environment,
                path.display()
            ),
            ConfigSource::Defaults(path) => warn!(
                "{} not found, falling back to built-in defaults (environment: {})",
                path.display(),
                self.environment
            ),
        }
    }

    fn get_environment() -> String {
        std::env::var("TALENTAI_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn select(content: &str, environment: &str) -> Result<EnvironmentConfig> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    pub fn client_api_key() -> Option<String> {
        std::env::var(CLIENT_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
local:
  port: 9000
  analysis_model: test/analysis
  screening_delay_ms: 10
production:
  port: 80
  gateway_url: https://gateway.internal/v1/chat/completions
  api_base_url: https://hr.example.com/functions/v1
"#;

    #[test]
    fn test_select_local_keeps_defaults_for_missing_fields() {
        let settings = AppConfig::select(SAMPLE, "local").unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.gateway.analysis_model, "test/analysis");
        assert_eq!(settings.gateway.ocr_model, "google/gemini-2.5-flash");
        assert_eq!(settings.screening_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_select_production() {
        let settings = AppConfig::select(SAMPLE, "production").unwrap();
        assert_eq!(settings.port, 80);
        assert_eq!(
            settings.gateway.gateway_url,
            "https://gateway.internal/v1/chat/completions"
        );
        assert_eq!(settings.screening_delay_ms, 1000);
    }

    #[test]
    fn test_unknown_environment_uses_local() {
        let settings = AppConfig::select(SAMPLE, "staging").unwrap();
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        assert!(AppConfig::select("local: [1, 2", "local").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.settings.gateway, GatewaySettings::default());
        assert_eq!(config.source, ConfigSource::Defaults(path));
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.settings.api_base_url.contains("/functions/v1"));
        assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
    }
}
