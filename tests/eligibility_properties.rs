//! Property-based tests for the eligibility resolver.
//!
//! Inventories are drawn from small id pools so that duplicates, partial
//! ONTAP resources and exclusions all show up often.

use proptest::prelude::*;
use std::collections::BTreeSet;
use storage_onboarding::domain::ports::{
    EfsFileSystem, FsxFileSystem, FsxFileSystemType, MountTarget, StorageVirtualMachine, Volume,
};
use storage_onboarding::{
    EligibilityReport, EligibilityResolver, InventoryFactory, InventorySnapshot, OnboardingTarget,
};

const VPC: &str = "vpc-1";

/// Generator for lifecycle states, including missing ones.
fn lifecycle(valid: &'static str) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(Some(valid.to_string())),
        1 => Just(Some("CREATING".to_string())),
        1 => Just(Some("deleting".to_string())),
        1 => Just(None),
    ]
}

fn vpc() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(Some(VPC.to_string())),
        1 => Just(Some("vpc-2".to_string())),
        1 => Just(None),
    ]
}

fn efs_id(i: u8) -> String {
    format!("fs-efs{}", i)
}

fn fsx_id(i: u8) -> String {
    format!("fs-fsx{}", i)
}

/// FSx type is a function of the id, so duplicated ids agree on it
fn fsx_type(i: u8) -> FsxFileSystemType {
    match i % 3 {
        0 => FsxFileSystemType::Lustre,
        1 => FsxFileSystemType::Ontap,
        _ => FsxFileSystemType::Other("WINDOWS".to_string()),
    }
}

fn any_snapshot() -> impl Strategy<Value = InventorySnapshot> {
    let efs = proptest::collection::vec((0u8..6, lifecycle("available")), 0..10);
    let mount_targets = proptest::collection::vec((0u8..6, vpc()), 0..10);
    let fsx = proptest::collection::vec((0u8..9, lifecycle("AVAILABLE"), vpc()), 0..12);
    let svms = proptest::collection::vec((0u8..9, lifecycle("CREATED")), 0..10);
    let volumes = proptest::collection::vec((0u8..9, lifecycle("CREATED")), 0..14);

    (efs, mount_targets, fsx, svms, volumes).prop_map(|(efs, mts, fsx, svms, volumes)| {
        InventorySnapshot {
            efs: efs
                .into_iter()
                .map(|(i, state)| EfsFileSystem {
                    file_system_id: efs_id(i),
                    life_cycle_state: state,
                    name: None,
                })
                .collect(),
            mount_targets: mts
                .into_iter()
                .map(|(i, vpc_id)| MountTarget {
                    file_system_id: efs_id(i),
                    mount_target_id: None,
                    vpc_id,
                    subnet_id: None,
                    life_cycle_state: None,
                })
                .collect(),
            fsx: fsx
                .into_iter()
                .map(|(i, lifecycle, vpc_id)| FsxFileSystem {
                    file_system_id: fsx_id(i),
                    file_system_type: fsx_type(i),
                    lifecycle,
                    vpc_id,
                    storage_capacity: None,
                })
                .collect(),
            storage_virtual_machines: svms
                .into_iter()
                .map(|(i, lifecycle)| StorageVirtualMachine {
                    file_system_id: fsx_id(i),
                    storage_virtual_machine_id: None,
                    name: None,
                    lifecycle,
                })
                .collect(),
            volumes: volumes
                .into_iter()
                .map(|(i, lifecycle)| Volume {
                    file_system_id: fsx_id(i),
                    volume_id: None,
                    name: None,
                    lifecycle,
                    volume_type: None,
                })
                .collect(),
        }
    })
}

fn any_excluded() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(
        prop_oneof![(0u8..6).prop_map(efs_id), (0u8..9).prop_map(fsx_id)],
        0..6,
    )
}

fn resolve(snapshot: &InventorySnapshot, excluded: &BTreeSet<String>) -> EligibilityReport {
    let (efs, fsx) = InventoryFactory::snapshot(snapshot.clone());
    let resolver = EligibilityResolver::new(efs, fsx);
    let target = OnboardingTarget::new("us-east-1", VPC).exclude(excluded.iter().cloned());

    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(resolver.resolve(&target))
        .unwrap()
}

fn is(state: &Option<String>, expected: &str) -> bool {
    state.as_deref() == Some(expected)
}

proptest! {
    /// No excluded id is ever reported
    #[test]
    fn test_exclusion_is_absolute(snapshot in any_snapshot(), excluded in any_excluded()) {
        let report = resolve(&snapshot, &excluded);

        for id in report.file_system_ids() {
            prop_assert!(!excluded.contains(id), "excluded {} was reported", id);
        }
    }

    /// Same inventory and exclusions, same report
    #[test]
    fn test_resolution_is_idempotent(snapshot in any_snapshot(), excluded in any_excluded()) {
        prop_assert_eq!(resolve(&snapshot, &excluded), resolve(&snapshot, &excluded));
    }

    /// EFS reported iff available, mounted in the VPC and not excluded
    #[test]
    fn test_efs_membership(snapshot in any_snapshot(), excluded in any_excluded()) {
        let report = resolve(&snapshot, &excluded);

        let expected: BTreeSet<&str> = snapshot
            .efs
            .iter()
            .filter(|fs| !excluded.contains(&fs.file_system_id))
            .filter(|fs| is(&fs.life_cycle_state, "available"))
            .filter(|fs| {
                snapshot.mount_targets.iter().any(|mt| {
                    mt.file_system_id == fs.file_system_id && is(&mt.vpc_id, VPC)
                })
            })
            .map(|fs| fs.file_system_id.as_str())
            .collect();
        let reported: Vec<&str> = report
            .efs
            .iter()
            .map(|c| c.efs.file_system_id.as_str())
            .collect();

        prop_assert_eq!(reported.len(), expected.len(), "duplicate EFS candidates");
        prop_assert_eq!(reported.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    /// ONTAP reported iff it qualifies and has a CREATED SVM and a CREATED
    /// volume; every reported SVM and volume is CREATED
    #[test]
    fn test_ontap_needs_svm_and_volume(snapshot in any_snapshot(), excluded in any_excluded()) {
        let report = resolve(&snapshot, &excluded);

        let expected: BTreeSet<&str> = snapshot
            .fsx
            .iter()
            .filter(|fs| fs.file_system_type == FsxFileSystemType::Ontap)
            .filter(|fs| !excluded.contains(&fs.file_system_id))
            .filter(|fs| is(&fs.lifecycle, "AVAILABLE") && is(&fs.vpc_id, VPC))
            .filter(|fs| {
                snapshot.storage_virtual_machines.iter().any(|svm| {
                    svm.file_system_id == fs.file_system_id && is(&svm.lifecycle, "CREATED")
                })
            })
            .filter(|fs| {
                snapshot.volumes.iter().any(|v| {
                    v.file_system_id == fs.file_system_id && is(&v.lifecycle, "CREATED")
                })
            })
            .map(|fs| fs.file_system_id.as_str())
            .collect();

        let mut reported = BTreeSet::new();
        for candidate in &report.fsx_ontap {
            prop_assert!(!candidate.svm.is_empty());
            prop_assert!(!candidate.volume.is_empty());
            for entry in &candidate.svm {
                prop_assert!(is(&entry.storage_virtual_machine.lifecycle, "CREATED"));
            }
            for entry in &candidate.volume {
                prop_assert!(is(&entry.volume.lifecycle, "CREATED"));
            }
            prop_assert!(reported.insert(candidate.filesystem.file_system_id.as_str()));
        }

        prop_assert_eq!(reported, expected);
    }

    /// Lustre never depends on SVMs or volumes
    #[test]
    fn test_lustre_membership(snapshot in any_snapshot(), excluded in any_excluded()) {
        let report = resolve(&snapshot, &excluded);

        let expected: BTreeSet<&str> = snapshot
            .fsx
            .iter()
            .filter(|fs| fs.file_system_type == FsxFileSystemType::Lustre)
            .filter(|fs| !excluded.contains(&fs.file_system_id))
            .filter(|fs| is(&fs.lifecycle, "AVAILABLE") && is(&fs.vpc_id, VPC))
            .map(|fs| fs.file_system_id.as_str())
            .collect();
        let reported: BTreeSet<&str> = report
            .fsx_lustre
            .iter()
            .map(|c| c.filesystem.file_system_id.as_str())
            .collect();

        prop_assert_eq!(reported.len(), report.fsx_lustre.len());
        prop_assert_eq!(reported, expected);
    }
}
