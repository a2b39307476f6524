//! Cluster Settings
//!
//! Typed views of the cluster and shared-storage module settings, and the
//! registries that read them:
//! - File: a local YAML/JSON document
//! - Cluster manager: the `ClusterSettings.GetModuleSettings` API

pub mod cluster_manager;
pub mod file;
pub mod model;

pub use cluster_manager::*;
pub use file::*;
pub use model::*;
