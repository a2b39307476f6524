//! Eligibility Report
//!
//! Result of one resolution. Serializes to the layout the admin console
//! renders: `efs`, `fsx_lustre` and `fsx_ontap` candidate lists.

use crate::domain::ports::{FileSystemKind, FsxFileSystem, StorageVirtualMachine, Volume};
use serde::{Deserialize, Serialize};

/// Bare reference to a file system by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileSystemRef {
    pub file_system_id: String,
}

/// Elastic file system eligible for onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfsCandidate {
    pub efs: FileSystemRef,
}

impl EfsCandidate {
    pub fn new(file_system_id: impl Into<String>) -> Self {
        Self {
            efs: FileSystemRef {
                file_system_id: file_system_id.into(),
            },
        }
    }
}

/// Lustre file system eligible for onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LustreCandidate {
    pub filesystem: FsxFileSystem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvmEntry {
    pub storage_virtual_machine: StorageVirtualMachine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub volume: Volume,
}

/// ONTAP file system eligible for onboarding, with the SVMs and volumes
/// that can be mounted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntapCandidate {
    pub filesystem: FileSystemRef,
    pub svm: Vec<SvmEntry>,
    pub volume: Vec<VolumeEntry>,
}

impl OntapCandidate {
    pub fn new(
        file_system_id: impl Into<String>,
        svms: Vec<StorageVirtualMachine>,
        volumes: Vec<Volume>,
    ) -> Self {
        Self {
            filesystem: FileSystemRef {
                file_system_id: file_system_id.into(),
            },
            svm: svms
                .into_iter()
                .map(|storage_virtual_machine| SvmEntry {
                    storage_virtual_machine,
                })
                .collect(),
            volume: volumes.into_iter().map(|volume| VolumeEntry { volume }).collect(),
        }
    }
}

/// File systems newly eligible for onboarding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub efs: Vec<EfsCandidate>,
    pub fsx_lustre: Vec<LustreCandidate>,
    pub fsx_ontap: Vec<OntapCandidate>,
}

impl EligibilityReport {
    /// Number of candidates of one kind
    pub fn count(&self, kind: FileSystemKind) -> usize {
        match kind {
            FileSystemKind::Efs => self.efs.len(),
            FileSystemKind::FsxLustre => self.fsx_lustre.len(),
            FileSystemKind::FsxOntap => self.fsx_ontap.len(),
        }
    }

    pub fn len(&self) -> usize {
        FileSystemKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every candidate, in report order
    pub fn file_system_ids(&self) -> Vec<&str> {
        self.efs
            .iter()
            .map(|c| c.efs.file_system_id.as_str())
            .chain(
                self.fsx_lustre
                    .iter()
                    .map(|c| c.filesystem.file_system_id.as_str()),
            )
            .chain(
                self.fsx_ontap
                    .iter()
                    .map(|c| c.filesystem.file_system_id.as_str()),
            )
            .collect()
    }
}
