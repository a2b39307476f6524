//! File-backed settings registry
//!
//! Reads a YAML (or JSON) document holding both the `cluster` and the
//! `shared-storage` module settings. The file is re-read on every call so
//! that edits made between two resolutions are picked up.

use super::model::{
    ClusterModuleSettings, SettingsDocument, SharedStorageSettings, MODULE_CLUSTER,
    MODULE_SHARED_STORAGE,
};
use crate::domain::ports::SettingsRegistry;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings registry backed by a local document
pub struct FileSettingsRegistry {
    path: PathBuf,
}

impl FileSettingsRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self, module: &str) -> Result<SettingsDocument> {
        debug!("Reading {} settings from {}", module, self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Settings {
                module: module.to_string(),
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;
        serde_yaml::from_str(&content).map_err(|e| Error::Settings {
            module: module.to_string(),
            reason: format!("failed to parse {}: {}", self.path.display(), e),
        })
    }
}

#[async_trait]
impl SettingsRegistry for FileSettingsRegistry {
    async fn cluster_settings(&self) -> Result<ClusterModuleSettings> {
        Ok(self.load(MODULE_CLUSTER).await?.cluster)
    }

    async fn shared_storage_settings(&self) -> Result<SharedStorageSettings> {
        Ok(self.load(MODULE_SHARED_STORAGE).await?.shared_storage)
    }
}
