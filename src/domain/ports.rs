//! Domain Ports - Inventory types and collaborator traits
//!
//! These traits define the boundaries between the eligibility logic and the
//! systems that enumerate storage (the AWS inventory proxy) and hold cluster
//! configuration (the settings registry). Adapters implement them.
//!
//! Inventory types keep the AWS wire field names (`FileSystemId`,
//! `LifeCycleState`, `VpcId`, ...) so that proxy responses deserialize
//! directly and reports serialize in the shape clients already consume.

use crate::error::Result;
use crate::settings::{ClusterModuleSettings, SharedStorageSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Lifecycle States
// =============================================================================

/// EFS lifecycle state of a usable file system
pub const EFS_AVAILABLE: &str = "available";

/// FSx lifecycle state of a usable file system
pub const FSX_AVAILABLE: &str = "AVAILABLE";

/// FSx lifecycle state of a usable SVM or volume
pub const FSX_CREATED: &str = "CREATED";

/// Outcome of comparing a reported lifecycle state with the one required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleMatch {
    /// State equals the required state exactly
    Matches,
    /// State is reported but differs
    Mismatch,
    /// Inventory did not report a state
    Unknown,
}

impl LifecycleMatch {
    /// Compare a reported state against the required one (case-sensitive)
    pub fn of(state: Option<&str>, required: &str) -> Self {
        match state {
            Some(s) if s == required => LifecycleMatch::Matches,
            Some(_) => LifecycleMatch::Mismatch,
            None => LifecycleMatch::Unknown,
        }
    }

    pub fn is_match(self) -> bool {
        self == LifecycleMatch::Matches
    }
}

// =============================================================================
// File System Kinds
// =============================================================================

/// Kind of file system that can be onboarded as shared storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileSystemKind {
    Efs,
    FsxLustre,
    FsxOntap,
}

impl FileSystemKind {
    pub const ALL: [FileSystemKind; 3] = [
        FileSystemKind::Efs,
        FileSystemKind::FsxLustre,
        FileSystemKind::FsxOntap,
    ];

    /// Key under which a shared-storage entry configures this provider
    pub fn provider_key(self) -> &'static str {
        match self {
            FileSystemKind::Efs => "efs",
            FileSystemKind::FsxLustre => "fsx_lustre",
            FileSystemKind::FsxOntap => "fsx_netapp_ontap",
        }
    }
}

impl std::fmt::Display for FileSystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemKind::Efs => write!(f, "EFS"),
            FileSystemKind::FsxLustre => write!(f, "FSX_LUSTRE"),
            FileSystemKind::FsxOntap => write!(f, "FSX_ONTAP"),
        }
    }
}

/// FSx deployment flavour as reported by `DescribeFileSystems`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FsxFileSystemType {
    Lustre,
    Ontap,
    /// Windows, OpenZFS and anything newer; never eligible
    Other(String),
}

impl From<String> for FsxFileSystemType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LUSTRE" => FsxFileSystemType::Lustre,
            "ONTAP" => FsxFileSystemType::Ontap,
            _ => FsxFileSystemType::Other(value),
        }
    }
}

impl From<FsxFileSystemType> for String {
    fn from(value: FsxFileSystemType) -> Self {
        match value {
            FsxFileSystemType::Lustre => "LUSTRE".to_string(),
            FsxFileSystemType::Ontap => "ONTAP".to_string(),
            FsxFileSystemType::Other(other) => other,
        }
    }
}

// =============================================================================
// Inventory Types
// =============================================================================

/// Elastic file system as listed by the EFS inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EfsFileSystem {
    pub file_system_id: String,
    #[serde(default)]
    pub life_cycle_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Network attachment of an elastic file system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountTarget {
    pub file_system_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_target_id: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle_state: Option<String>,
}

/// Managed (FSx) file system as listed by the FSx inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FsxFileSystem {
    pub file_system_id: String,
    pub file_system_type: FsxFileSystemType,
    #[serde(default)]
    pub lifecycle: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<u64>,
}

/// Storage virtual machine of an ONTAP file system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageVirtualMachine {
    pub file_system_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_virtual_machine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<String>,
}

/// Volume of an ONTAP file system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub file_system_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
}

// =============================================================================
// EFS Inventory Port
// =============================================================================

/// Port for elastic file system inventory queries
#[async_trait]
pub trait EfsInventory: Send + Sync {
    /// List all elastic file systems in a region
    async fn list_file_systems(&self, region: &str) -> Result<Vec<EfsFileSystem>>;

    /// List the mount targets of one file system
    async fn describe_mount_targets(
        &self,
        region: &str,
        file_system_id: &str,
    ) -> Result<Vec<MountTarget>>;
}

// =============================================================================
// FSx Inventory Port
// =============================================================================

/// Port for managed (FSx) file system inventory queries
#[async_trait]
pub trait FsxInventory: Send + Sync {
    /// List all FSx file systems in a region
    async fn list_file_systems(&self, region: &str) -> Result<Vec<FsxFileSystem>>;

    /// List the SVMs belonging to any of the given file systems
    async fn list_storage_virtual_machines(
        &self,
        region: &str,
        file_system_ids: &[String],
    ) -> Result<Vec<StorageVirtualMachine>>;

    /// List the volumes belonging to any of the given file systems
    async fn list_volumes(&self, region: &str, file_system_ids: &[String]) -> Result<Vec<Volume>>;
}

// =============================================================================
// Settings Registry Port
// =============================================================================

/// Port for reading cluster module settings
#[async_trait]
pub trait SettingsRegistry: Send + Sync {
    /// Settings of the cluster module (region, network)
    async fn cluster_settings(&self) -> Result<ClusterModuleSettings>;

    /// Settings of the shared-storage module
    async fn shared_storage_settings(&self) -> Result<SharedStorageSettings>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type EfsInventoryRef = Arc<dyn EfsInventory>;
pub type FsxInventoryRef = Arc<dyn FsxInventory>;
pub type SettingsRegistryRef = Arc<dyn SettingsRegistry>;
