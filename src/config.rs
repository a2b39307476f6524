//! Service configuration
//!
//! Loaded from a YAML (or JSON) file. Every section has defaults, so an
//! empty or partial file is valid.

use crate::api::ApiServerConfig;
use crate::domain::ports::SettingsRegistryRef;
use crate::error::{Error, Result};
use crate::inventory::ProxyConfig;
use crate::settings::{ClusterManagerConfig, ClusterManagerSettings, FileSettingsRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// AWS proxy used for EFS and FSx inventory queries
    pub proxy: ProxyConfig,
    /// Where cluster and shared-storage settings are read from
    pub settings: SettingsSourceConfig,
    /// REST API server
    pub api: ApiServerConfig,
}

/// Settings registry selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SettingsSourceConfig {
    /// Local settings document
    File { path: PathBuf },
    /// Cluster manager API
    ClusterManager(ClusterManagerConfig),
}

impl Default for SettingsSourceConfig {
    fn default() -> Self {
        SettingsSourceConfig::File {
            path: PathBuf::from("settings.yaml"),
        }
    }
}

impl OnboardingConfig {
    /// Load configuration from a file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load configuration from a file when given, defaults otherwise
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Build the configured settings registry
    pub fn build_settings_registry(&self) -> Result<SettingsRegistryRef> {
        let registry: SettingsRegistryRef = match &self.settings {
            SettingsSourceConfig::File { path } => {
                info!("Reading settings from {}", path.display());
                Arc::new(FileSettingsRegistry::new(path.clone()))
            }
            SettingsSourceConfig::ClusterManager(config) => {
                info!("Reading settings from cluster manager at {}", config.endpoint);
                Arc::new(ClusterManagerSettings::new(config.clone())?)
            }
        };
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = OnboardingConfig::default();
        assert_eq!(config.proxy.max_efs_items, 10_000);
        assert_eq!(config.api.rest_addr.port(), 8090);
        assert_matches!(
            config.settings,
            SettingsSourceConfig::File { ref path } if path == Path::new("settings.yaml")
        );
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "proxy:\n  endpoint: https://console.example.com/awsproxy\n\
             settings:\n  source: cluster_manager\n  endpoint: https://console.example.com/cm\n\
             api:\n  rest_addr: 127.0.0.1:9000\n"
        )
        .unwrap();

        let config = OnboardingConfig::load(file.path()).await.unwrap();

        assert_eq!(config.proxy.endpoint, "https://console.example.com/awsproxy");
        assert_eq!(config.proxy.request_timeout_secs, 30);
        assert_eq!(config.api.rest_addr.port(), 9000);
        assert_matches!(
            config.settings,
            SettingsSourceConfig::ClusterManager(ref cm) if cm.endpoint == "https://console.example.com/cm"
        );
        assert!(config.build_settings_registry().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let result = OnboardingConfig::load("/nonexistent/onboarding.yaml").await;
        assert_matches!(result, Err(Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_settings_source_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "settings:\n  source: etcd\n").unwrap();

        let result = OnboardingConfig::load(file.path()).await;
        assert_matches!(result, Err(Error::Configuration(_)));
    }
}
