//! Snapshot Inventory Adapter
//!
//! Serves a fixed inventory captured for one region. Used for offline runs
//! (`list --inventory-file`) and as the inventory behind tests.

use crate::domain::ports::{
    EfsFileSystem, EfsInventory, FsxFileSystem, FsxInventory, MountTarget, StorageVirtualMachine,
    Volume,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Inventory of one region at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    pub efs: Vec<EfsFileSystem>,
    pub mount_targets: Vec<MountTarget>,
    pub fsx: Vec<FsxFileSystem>,
    pub storage_virtual_machines: Vec<StorageVirtualMachine>,
    pub volumes: Vec<Volume>,
}

impl InventorySnapshot {
    /// Load a snapshot from a YAML or JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading inventory snapshot from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Inventory adapter over an [`InventorySnapshot`]
///
/// The region argument of every query is ignored.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInventory {
    snapshot: InventorySnapshot,
}

impl SnapshotInventory {
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl EfsInventory for SnapshotInventory {
    async fn list_file_systems(&self, _region: &str) -> Result<Vec<EfsFileSystem>> {
        Ok(self.snapshot.efs.clone())
    }

    async fn describe_mount_targets(
        &self,
        _region: &str,
        file_system_id: &str,
    ) -> Result<Vec<MountTarget>> {
        Ok(self
            .snapshot
            .mount_targets
            .iter()
            .filter(|mt| mt.file_system_id == file_system_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FsxInventory for SnapshotInventory {
    async fn list_file_systems(&self, _region: &str) -> Result<Vec<FsxFileSystem>> {
        Ok(self.snapshot.fsx.clone())
    }

    async fn list_storage_virtual_machines(
        &self,
        _region: &str,
        file_system_ids: &[String],
    ) -> Result<Vec<StorageVirtualMachine>> {
        Ok(self
            .snapshot
            .storage_virtual_machines
            .iter()
            .filter(|svm| file_system_ids.contains(&svm.file_system_id))
            .cloned()
            .collect())
    }

    async fn list_volumes(&self, _region: &str, file_system_ids: &[String]) -> Result<Vec<Volume>> {
        Ok(self
            .snapshot
            .volumes
            .iter()
            .filter(|volume| file_system_ids.contains(&volume.file_system_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_and_filter_by_parent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
efs:
  - FileSystemId: fs-1
    LifeCycleState: available
mount_targets:
  - FileSystemId: fs-1
    VpcId: vpc-9
  - FileSystemId: fs-other
    VpcId: vpc-9
fsx:
  - FileSystemId: fs-2
    FileSystemType: ONTAP
    Lifecycle: AVAILABLE
    VpcId: vpc-9
volumes:
  - FileSystemId: fs-2
    Lifecycle: CREATED
  - FileSystemId: fs-3
    Lifecycle: CREATED
"#
        )
        .unwrap();

        let inventory = SnapshotInventory::new(InventorySnapshot::load(file.path()).await.unwrap());
        let targets = inventory.describe_mount_targets("any", "fs-1").await.unwrap();
        assert_eq!(targets.len(), 1);

        let volumes = inventory
            .list_volumes("any", &["fs-2".to_string()])
            .await
            .unwrap();
        assert_eq!(volumes.len(), 1);
        assert!(inventory.snapshot().storage_virtual_machines.is_empty());
    }
}
