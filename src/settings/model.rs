//! Typed cluster settings
//!
//! Only the fields onboarding reads are modelled; everything else in a
//! module's settings is ignored on deserialization.

use crate::domain::ports::FileSystemKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Module id of the cluster module
pub const MODULE_CLUSTER: &str = "cluster";

/// Module id of the shared-storage module
pub const MODULE_SHARED_STORAGE: &str = "shared-storage";

// =============================================================================
// Cluster Module
// =============================================================================

/// Settings of the cluster module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterModuleSettings {
    pub aws: AwsSettings,
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub vpc_id: Option<String>,
}

impl ClusterModuleSettings {
    /// Region the cluster is deployed in
    pub fn region(&self) -> Result<&str> {
        non_empty(self.aws.region.as_deref())
            .ok_or_else(|| Error::Configuration("cluster setting aws.region is not set".into()))
    }

    /// VPC the cluster is deployed in
    pub fn vpc_id(&self) -> Result<&str> {
        non_empty(self.network.vpc_id.as_deref())
            .ok_or_else(|| Error::Configuration("cluster setting network.vpc_id is not set".into()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Shared Storage Module
// =============================================================================

/// File systems registered by one shared-storage entry, keyed by provider
///
/// Each `<provider>.file_system_id` path is read on its own, so a malformed
/// sibling field never hides an onboarded file system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStorageEntry {
    pub file_systems: BTreeMap<FileSystemKind, String>,
}

impl SharedStorageEntry {
    fn from_object(key: &str, value: &serde_json::Value) -> Self {
        let mut file_systems = BTreeMap::new();
        for kind in FileSystemKind::ALL {
            let Some(provider) = value.get(kind.provider_key()) else {
                continue;
            };
            match provider.get("file_system_id").map(serde_json::Value::as_str) {
                Some(Some(id)) => {
                    file_systems.insert(kind, id.to_string());
                }
                Some(None) => debug!(
                    "Ignoring non-string {}.{}.file_system_id",
                    key,
                    kind.provider_key()
                ),
                None => {}
            }
        }
        Self { file_systems }
    }

    /// File system id configured for a provider, if any
    pub fn file_system_id(&self, kind: FileSystemKind) -> Option<&str> {
        self.file_systems.get(&kind).map(String::as_str)
    }
}

/// Settings of the shared-storage module
///
/// The module mixes scalar settings with file-system entries at the same
/// level, so only object-valued keys are read as entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct SharedStorageSettings {
    pub entries: BTreeMap<String, SharedStorageEntry>,
}

impl From<BTreeMap<String, serde_json::Value>> for SharedStorageSettings {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let entries = raw
            .iter()
            .filter(|(_, value)| value.is_object())
            .map(|(key, value)| (key.clone(), SharedStorageEntry::from_object(key, value)))
            .collect();
        Self { entries }
    }
}

impl SharedStorageSettings {
    /// Identifiers of every file system already registered as shared storage
    pub fn onboarded_file_system_ids(&self) -> BTreeSet<String> {
        self.entries
            .values()
            .flat_map(|entry| entry.file_systems.values().cloned())
            .collect()
    }
}

// =============================================================================
// Settings Document
// =============================================================================

/// Both modules in one document, as read by the file-backed registry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    pub cluster: ClusterModuleSettings,
    #[serde(rename = "shared-storage", alias = "shared_storage")]
    pub shared_storage: SharedStorageSettings,
}
