//! Storage Onboarding
//!
//! Determines which AWS file systems (EFS, FSx for Lustre and FSx for
//! NetApp ONTAP) can be onboarded as shared storage for a cluster.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    REST API / CLI (`api`, main)                  │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                  Onboarding Service (`onboarding`)               │
//! │   cluster + shared-storage settings ──► exclusion set, target    │
//! │                              │                                   │
//! │                  ┌───────────┴────────────┐                      │
//! │                  │  Eligibility Resolver  │                      │
//! │                  │  EFS ║ FSx ─► ONTAP    │                      │
//! │                  └───────────┬────────────┘                      │
//! ├──────────────────────────────┼───────────────────────────────────┤
//! │        Ports (`domain`)      │                                   │
//! │  EfsInventory  FsxInventory  SettingsRegistry                    │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   Adapters: proxy / snapshot inventory (`inventory`),            │
//! │             file / cluster-manager settings (`settings`)         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`onboarding`]: Eligibility resolver, report types, service and metrics
//! - [`domain`]: Inventory records and port traits
//! - [`inventory`]: EFS and FSx inventory adapters
//! - [`settings`]: Typed cluster settings and their registries
//! - [`api`]: REST API server
//! - [`config`]: Service configuration
//! - [`error`]: Error types and handling

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod onboarding;
pub mod settings;

// Re-export commonly used types
pub use api::{ApiServer, ApiServerConfig, RestRouter};

pub use config::{OnboardingConfig, SettingsSourceConfig};

pub use domain::ports::{
    EfsInventory, EfsInventoryRef, FileSystemKind, FsxInventory, FsxInventoryRef,
    SettingsRegistry, SettingsRegistryRef,
};

pub use error::{Error, Result};

pub use inventory::{InventoryFactory, InventorySnapshot, ProxyConfig};

pub use onboarding::{
    EligibilityReport, EligibilityResolver, OnboardingService, OnboardingTarget,
};

pub use settings::{ClusterManagerConfig, FileSettingsRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
