//! Inventory Adapters
//!
//! Provides implementations of the EFS and FSx inventory ports:
//! - Proxy: live queries through the AWS proxy
//! - Snapshot: a fixed, file-loadable inventory

pub mod proxy;
pub mod snapshot;

pub use proxy::*;
pub use snapshot::*;

use crate::domain::ports::{EfsInventoryRef, FsxInventoryRef};
use crate::error::Result;
use std::sync::Arc;

/// Factory for creating inventory adapters
pub struct InventoryFactory;

impl InventoryFactory {
    /// Both ports served by one proxy client
    pub fn proxy(config: ProxyConfig) -> Result<(EfsInventoryRef, FsxInventoryRef)> {
        let inventory = Arc::new(ProxyInventory::new(config)?);
        let efs: EfsInventoryRef = inventory.clone();
        let fsx: FsxInventoryRef = inventory;
        Ok((efs, fsx))
    }

    /// Both ports served by one snapshot
    pub fn snapshot(snapshot: InventorySnapshot) -> (EfsInventoryRef, FsxInventoryRef) {
        let inventory = Arc::new(SnapshotInventory::new(snapshot));
        let efs: EfsInventoryRef = inventory.clone();
        let fsx: FsxInventoryRef = inventory;
        (efs, fsx)
    }
}
