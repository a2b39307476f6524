//! Cluster manager settings registry
//!
//! Reads module settings through the cluster manager's
//! `ClusterSettings.GetModuleSettings` API.

use super::model::{
    ClusterModuleSettings, SharedStorageSettings, MODULE_CLUSTER, MODULE_SHARED_STORAGE,
};
use crate::domain::ports::SettingsRegistry;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GET_MODULE_SETTINGS: &str = "ClusterSettings.GetModuleSettings";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the cluster manager settings client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterManagerConfig {
    /// API endpoint, e.g. `https://admin.example.com/cluster-manager/api/v1`
    pub endpoint: String,
    /// Bearer token sent with each request
    pub bearer_token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClusterManagerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/cluster-manager/api/v1".to_string(),
            bearer_token: None,
            request_timeout_secs: 30,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ApiRequest<'a, T> {
    header: ApiHeader<'a>,
    payload: T,
}

#[derive(Debug, Serialize)]
struct ApiHeader<'a> {
    namespace: &'a str,
    request_id: String,
}

#[derive(Debug, Serialize)]
struct GetModuleSettingsRequest<'a> {
    module_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    #[serde(default)]
    success: bool,
    payload: Option<T>,
    error_code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetModuleSettingsResult<T> {
    settings: T,
}

// =============================================================================
// Client
// =============================================================================

/// Settings registry backed by the cluster manager API
pub struct ClusterManagerSettings {
    config: ClusterManagerConfig,
    client: reqwest::Client,
}

impl ClusterManagerSettings {
    pub fn new(config: ClusterManagerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    async fn get_module_settings<T: DeserializeOwned>(&self, module_id: &str) -> Result<T> {
        let request = ApiRequest {
            header: ApiHeader {
                namespace: GET_MODULE_SETTINGS,
                request_id: generate_id(),
            },
            payload: GetModuleSettingsRequest { module_id },
        };

        debug!(module_id, "Fetching module settings");

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(ref token) = self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Error::Settings {
                module: module_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let reply: ApiReply<GetModuleSettingsResult<T>> = response.json().await?;
        match reply {
            ApiReply {
                success: true,
                payload: Some(result),
                ..
            } => Ok(result.settings),
            ApiReply {
                error_code,
                message,
                ..
            } => Err(Error::Settings {
                module: module_id.to_string(),
                reason: format!(
                    "{}: {}",
                    error_code.as_deref().unwrap_or("UNKNOWN"),
                    message.as_deref().unwrap_or("no settings returned")
                ),
            }),
        }
    }
}

#[async_trait]
impl SettingsRegistry for ClusterManagerSettings {
    async fn cluster_settings(&self) -> Result<ClusterModuleSettings> {
        self.get_module_settings(MODULE_CLUSTER).await
    }

    async fn shared_storage_settings(&self) -> Result<SharedStorageSettings> {
        self.get_module_settings(MODULE_SHARED_STORAGE).await
    }
}

/// Request id derived from the current time
fn generate_id() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{:016x}", nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn module_settings(Json(request): Json<Value>) -> Json<Value> {
        assert_eq!(request["header"]["namespace"], GET_MODULE_SETTINGS);
        match request["payload"]["module_id"].as_str() {
            Some("cluster") => Json(json!({
                "success": true,
                "payload": {"settings": {"aws": {"region": "us-east-1"}, "network": {"vpc_id": "vpc-9"}}}
            })),
            Some("shared-storage") => Json(json!({
                "success": true,
                "payload": {"settings": {"home": {"efs": {"file_system_id": "fs-home"}}}}
            })),
            _ => Json(json!({
                "success": false,
                "error_code": "MODULE_NOT_FOUND",
                "message": "module not found"
            })),
        }
    }

    async fn spawn_cluster_manager() -> String {
        let app = Router::new().route("/api/v1", post(module_settings));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1", addr)
    }

    #[tokio::test]
    async fn test_reads_module_settings() {
        let endpoint = spawn_cluster_manager().await;
        let registry = ClusterManagerSettings::new(ClusterManagerConfig {
            endpoint,
            ..Default::default()
        })
        .unwrap();

        let cluster = registry.cluster_settings().await.unwrap();
        assert_eq!(cluster.region().unwrap(), "us-east-1");
        assert_eq!(cluster.vpc_id().unwrap(), "vpc-9");

        let shared = registry.shared_storage_settings().await.unwrap();
        assert!(shared.onboarded_file_system_ids().contains("fs-home"));
    }

    #[tokio::test]
    async fn test_api_failure_is_settings_error() {
        let endpoint = spawn_cluster_manager().await;
        let registry = ClusterManagerSettings::new(ClusterManagerConfig {
            endpoint,
            ..Default::default()
        })
        .unwrap();

        let result: Result<Value> = registry.get_module_settings("unknown").await;
        assert_matches!(result, Err(Error::Settings { reason, .. }) if reason.starts_with("MODULE_NOT_FOUND"));
    }
}
