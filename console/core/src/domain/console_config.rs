// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Console Configuration Types
//
// Defines the configuration manifest for a FieldOps console instance:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Scheduling API and geocoding endpoints
// - Assignment search error policy
// - Logging settings

use crate::domain::assignment::SearchErrorPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "fieldops/v1";
pub const KIND: &str = "ConsoleConfig";

/// Top-level console configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfigManifest {
    /// API version (must be "fieldops/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ConsoleConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ConsoleConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable console name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfigSpec {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub assignment: AssignmentConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheduling API base URL (agent search + booking persistence)
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Bearer token (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default = "default_search_agents_path")]
    pub search_agents_path: String,

    #[serde(default = "default_bookings_path")]
    pub bookings_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_geocoding_path")]
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// What a failed agent search does: "swallow" (default) or "surface"
    #[serde(default)]
    pub search_error_policy: SearchErrorPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Configuration problems found by [`ConsoleConfigManifest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid apiVersion: '{0}'. Must be 'fieldops/v1'")]
    ApiVersion(String),

    #[error("Invalid kind: '{0}'. Must be 'ConsoleConfig'")]
    Kind(String),

    #[error("{0} must not be empty")]
    EmptyUrl(&'static str),

    #[error("Environment variable not set: {0}")]
    MissingEnv(String),
}

// Default value functions
fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_search_agents_path() -> String {
    "/agents/search".to_string()
}

fn default_bookings_path() -> String {
    "/bookings".to_string()
}

fn default_geocoding_path() -> String {
    "/location/lat-long".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            auth_token: None,
            search_agents_path: default_search_agents_path(),
            bookings_path: default_bookings_path(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            path: default_geocoding_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ConsoleConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "fieldops-console".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
            },
            spec: ConsoleConfigSpec::default(),
        }
    }
}

impl ApiConfig {
    /// Resolve the bearer token (supports "env:VAR_NAME" syntax)
    pub fn resolve_auth_token(&self) -> Result<Option<String>, ConfigError> {
        match &self.auth_token {
            Some(token) => match token.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name)
                    .map(Some)
                    .map_err(|_| ConfigError::MissingEnv(var_name.to_string())),
                None => Ok(Some(token.clone())),
            },
            None => Ok(None),
        }
    }
}

impl ConsoleConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate configuration paths in precedence order
    /// 1. FIELDOPS_CONFIG_PATH environment variable
    /// 2. ./fieldops-config.yaml (working directory)
    /// 3. ~/.fieldops/config.yaml (user home)
    /// 4. /etc/fieldops/config.yaml (system, Unix) or C:\ProgramData\FieldOps\config.yaml (Windows)
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("FIELDOPS_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./fieldops-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".fieldops").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fieldops/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\FieldOps\\config.yaml"));

        paths
    }

    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FIELDOPS_API_URL") {
            tracing::info!("Environment override: FIELDOPS_API_URL={}", url);
            self.spec.api.base_url = url;
        }

        if let Some(token) = lookup("FIELDOPS_API_TOKEN") {
            tracing::info!("Environment override: FIELDOPS_API_TOKEN=<redacted>");
            self.spec.api.auth_token = Some(token);
        }

        if let Some(url) = lookup("FIELDOPS_GEOCODING_URL") {
            tracing::info!("Environment override: FIELDOPS_GEOCODING_URL={}", url);
            self.spec.geocoding.base_url = url;
        }

        if let Some(val) = lookup("FIELDOPS_SEARCH_ERROR_POLICY") {
            match val.parse::<SearchErrorPolicy>() {
                Ok(policy) => {
                    tracing::info!("Environment override: FIELDOPS_SEARCH_ERROR_POLICY={}", policy);
                    self.spec.assignment.search_error_policy = policy;
                }
                Err(e) => {
                    tracing::warn!("Invalid value for FIELDOPS_SEARCH_ERROR_POLICY: {}. Ignoring.", e);
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::ApiVersion(self.api_version.clone()));
        }

        if self.kind != KIND {
            return Err(ConfigError::Kind(self.kind.clone()));
        }

        if self.spec.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("spec.api.base_url"));
        }

        if self.spec.geocoding.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("spec.geocoding.base_url"));
        }

        Ok(())
    }

    /// Logging settings, falling back to defaults when not configured
    pub fn logging(&self) -> LoggingConfig {
        self.spec
            .observability
            .as_ref()
            .and_then(|o| o.logging.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
apiVersion: fieldops/v1
kind: ConsoleConfig
metadata:
  name: dispatch-desk
spec:
  api:
    base_url: https://api.example.com
    auth_token: env:FIELDOPS_TEST_TOKEN_UNSET
  geocoding:
    base_url: https://geo.example.com
  assignment:
    search_error_policy: surface
  observability:
    logging:
      level: debug
      format: json
"#;

    #[test]
    fn test_parse_sample_manifest() {
        let config = ConsoleConfigManifest::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.metadata.name, "dispatch-desk");
        assert_eq!(config.spec.api.base_url, "https://api.example.com");
        assert_eq!(config.spec.api.search_agents_path, "/agents/search");
        assert_eq!(config.spec.api.bookings_path, "/bookings");
        assert_eq!(config.spec.geocoding.path, "/location/lat-long");
        assert_eq!(config.spec.assignment.search_error_policy, SearchErrorPolicy::Surface);
        assert_eq!(config.logging().format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_swallow_search_errors() {
        let config = ConsoleConfigManifest::default();
        assert_eq!(config.spec.assignment.search_error_policy, SearchErrorPolicy::Swallow);
        assert_eq!(config.logging().level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_kind_and_empty_url() {
        let mut config = ConsoleConfigManifest::default();
        config.kind = "NodeConfig".to_string();
        assert_eq!(config.validate(), Err(ConfigError::Kind("NodeConfig".to_string())));

        let mut config = ConsoleConfigManifest::default();
        config.spec.geocoding.base_url = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyUrl("spec.geocoding.base_url"))
        );
    }

    #[test]
    fn test_overrides_apply_and_ignore_invalid_policy() {
        let vars: HashMap<&str, &str> = [
            ("FIELDOPS_API_URL", "https://override.example.com"),
            ("FIELDOPS_SEARCH_ERROR_POLICY", "loud"),
        ]
        .into_iter()
        .collect();

        let mut config = ConsoleConfigManifest::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.spec.api.base_url, "https://override.example.com");
        assert_eq!(config.spec.assignment.search_error_policy, SearchErrorPolicy::Swallow);
    }

    #[test]
    fn test_auth_token_env_reference_must_be_set() {
        let config = ConsoleConfigManifest::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(
            config.spec.api.resolve_auth_token(),
            Err(ConfigError::MissingEnv("FIELDOPS_TEST_TOKEN_UNSET".to_string()))
        );

        let mut config = ConsoleConfigManifest::default();
        config.spec.api.auth_token = Some("literal-token".to_string());
        assert_eq!(
            config.spec.api.resolve_auth_token(),
            Ok(Some("literal-token".to_string()))
        );
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldops-config.yaml");

        let mut config = ConsoleConfigManifest::default();
        config.spec.api.base_url = "https://saved.example.com".to_string();
        config.to_yaml_file(&path).unwrap();

        let loaded = ConsoleConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.spec.api.base_url, "https://saved.example.com");
    }
}
