//! Onboarding-Eligibility Resolver
//!
//! Computes which file systems in a region can be onboarded as shared
//! storage for a cluster:
//!
//! ```text
//!   EFS list ──► exclude ──► available ──► mount targets (fan-out) ──► in VPC ─┐
//!                                                                            ├─► report
//!   FSx list ──► exclude ──► AVAILABLE + VPC ──┬─► LUSTRE ───────────────────┤
//!                                              └─► ONTAP ──► SVMs ∥ volumes ─┘
//!                                                            (CREATED, joined)
//! ```
//!
//! The EFS and FSx tracks run concurrently, as do the per-file-system mount
//! target lookups and the SVM/volume listings. The first failing query fails
//! the whole resolution; the remaining queries are dropped.

use super::report::{EfsCandidate, EligibilityReport, LustreCandidate, OntapCandidate};
use crate::domain::ports::{
    EfsFileSystem, EfsInventoryRef, FsxFileSystem, FsxFileSystemType, FsxInventoryRef,
    LifecycleMatch, MountTarget, StorageVirtualMachine, Volume, EFS_AVAILABLE, FSX_AVAILABLE,
    FSX_CREATED,
};
use crate::error::Result;
use futures::future::try_join_all;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// =============================================================================
// Target
// =============================================================================

/// Where to look and what to leave out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingTarget {
    /// Region the inventory is queried in
    pub region: String,
    /// Cluster VPC candidates must belong to
    pub vpc_id: String,
    /// File system ids that are never reported
    pub excluded: BTreeSet<String>,
}

impl OnboardingTarget {
    pub fn new(region: impl Into<String>, vpc_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            vpc_id: vpc_id.into(),
            excluded: BTreeSet::new(),
        }
    }

    /// Add ids to the exclusion set
    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(ids.into_iter().map(Into::into));
        self
    }
}

// =============================================================================
// Pure Stages
// =============================================================================

/// Lifecycle filter tallies, logged per stage
#[derive(Debug, Default)]
struct LifecycleTally {
    mismatched: usize,
    unknown: usize,
}

impl LifecycleTally {
    fn admit(&mut self, state: Option<&str>, required: &str) -> bool {
        match LifecycleMatch::of(state, required) {
            LifecycleMatch::Matches => true,
            LifecycleMatch::Mismatch => {
                self.mismatched += 1;
                false
            }
            LifecycleMatch::Unknown => {
                self.unknown += 1;
                false
            }
        }
    }
}

/// EFS file systems that are not excluded and are `available`.
///
/// Duplicated ids keep their first occurrence.
pub fn select_efs_candidates<'a>(
    file_systems: &'a [EfsFileSystem],
    excluded: &BTreeSet<String>,
) -> Vec<&'a EfsFileSystem> {
    let mut seen = BTreeSet::new();
    let mut tally = LifecycleTally::default();

    let selected: Vec<_> = file_systems
        .iter()
        .filter(|fs| !excluded.contains(&fs.file_system_id))
        .filter(|fs| tally.admit(fs.life_cycle_state.as_deref(), EFS_AVAILABLE))
        .filter(|fs| seen.insert(fs.file_system_id.as_str()))
        .collect();

    debug!(
        listed = file_systems.len(),
        selected = selected.len(),
        not_available = tally.mismatched,
        state_unknown = tally.unknown,
        "EFS lifecycle filter"
    );
    selected
}

/// Whether any mount target places the file system in the VPC
pub fn efs_in_vpc(mount_targets: &[MountTarget], vpc_id: &str) -> bool {
    mount_targets
        .iter()
        .any(|mt| mt.vpc_id.as_deref() == Some(vpc_id))
}

/// FSx file systems that passed exclusion, lifecycle and VPC filters
#[derive(Debug, Default)]
pub struct FsxSelection<'a> {
    pub lustre: Vec<&'a FsxFileSystem>,
    pub ontap: Vec<&'a FsxFileSystem>,
}

/// FSx file systems that are not excluded, `AVAILABLE` and in the VPC,
/// partitioned by type. Other FSx types are dropped.
pub fn select_fsx_candidates<'a>(
    file_systems: &'a [FsxFileSystem],
    excluded: &BTreeSet<String>,
    vpc_id: &str,
) -> FsxSelection<'a> {
    let mut seen = BTreeSet::new();
    let mut tally = LifecycleTally::default();
    let mut selection = FsxSelection::default();

    for fs in file_systems {
        if excluded.contains(&fs.file_system_id)
            || !tally.admit(fs.lifecycle.as_deref(), FSX_AVAILABLE)
            || fs.vpc_id.as_deref() != Some(vpc_id)
            || !seen.insert(fs.file_system_id.as_str())
        {
            continue;
        }
        match fs.file_system_type {
            FsxFileSystemType::Lustre => selection.lustre.push(fs),
            FsxFileSystemType::Ontap => selection.ontap.push(fs),
            FsxFileSystemType::Other(_) => {}
        }
    }

    debug!(
        listed = file_systems.len(),
        lustre = selection.lustre.len(),
        ontap = selection.ontap.len(),
        not_available = tally.mismatched,
        state_unknown = tally.unknown,
        "FSx filter"
    );
    selection
}

/// Join ONTAP file systems with their `CREATED` SVMs and volumes.
///
/// A volume only counts when its file system also has a `CREATED` SVM, and a
/// file system is only emitted when it has at least one counted volume.
/// Records follow the order of `ontap_ids`.
pub fn join_ontap_resources(
    ontap_ids: &[String],
    svms: Vec<StorageVirtualMachine>,
    volumes: Vec<Volume>,
) -> Vec<OntapCandidate> {
    let requested: BTreeSet<&str> = ontap_ids.iter().map(String::as_str).collect();

    let mut svms_by_fs: BTreeMap<String, Vec<StorageVirtualMachine>> = BTreeMap::new();
    for svm in svms {
        if requested.contains(svm.file_system_id.as_str())
            && LifecycleMatch::of(svm.lifecycle.as_deref(), FSX_CREATED).is_match()
        {
            svms_by_fs
                .entry(svm.file_system_id.clone())
                .or_default()
                .push(svm);
        }
    }

    let mut volumes_by_fs: BTreeMap<String, Vec<Volume>> = BTreeMap::new();
    for volume in volumes {
        if svms_by_fs.contains_key(&volume.file_system_id)
            && LifecycleMatch::of(volume.lifecycle.as_deref(), FSX_CREATED).is_match()
        {
            volumes_by_fs
                .entry(volume.file_system_id.clone())
                .or_default()
                .push(volume);
        }
    }

    // Removing as we go also collapses repeated ids
    ontap_ids
        .iter()
        .filter_map(|id| {
            let volumes = volumes_by_fs.remove(id)?;
            let svms = svms_by_fs.remove(id)?;
            Some(OntapCandidate::new(id.clone(), svms, volumes))
        })
        .collect()
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves onboarding candidates against live inventory
#[derive(Clone)]
pub struct EligibilityResolver {
    efs: EfsInventoryRef,
    fsx: FsxInventoryRef,
}

impl EligibilityResolver {
    pub fn new(efs: EfsInventoryRef, fsx: FsxInventoryRef) -> Self {
        Self { efs, fsx }
    }

    /// Compute the eligibility report for a target.
    ///
    /// Any inventory failure is returned unchanged; no partial report is
    /// produced and nothing is retried.
    pub async fn resolve(&self, target: &OnboardingTarget) -> Result<EligibilityReport> {
        debug!(
            region = %target.region,
            vpc_id = %target.vpc_id,
            excluded = target.excluded.len(),
            "Resolving onboarding candidates"
        );

        let (efs, (fsx_lustre, fsx_ontap)) =
            futures::try_join!(self.resolve_efs(target), self.resolve_fsx(target))?;

        info!(
            "Onboarding candidates in {}: {} EFS, {} FSx Lustre, {} FSx ONTAP",
            target.vpc_id,
            efs.len(),
            fsx_lustre.len(),
            fsx_ontap.len()
        );

        Ok(EligibilityReport {
            efs,
            fsx_lustre,
            fsx_ontap,
        })
    }

    async fn resolve_efs(&self, target: &OnboardingTarget) -> Result<Vec<EfsCandidate>> {
        let file_systems = self.efs.list_file_systems(&target.region).await?;
        let candidates = select_efs_candidates(&file_systems, &target.excluded);

        let lookups = candidates
            .iter()
            .map(|fs| self.efs.describe_mount_targets(&target.region, &fs.file_system_id));
        let mount_targets = try_join_all(lookups).await?;

        Ok(candidates
            .into_iter()
            .zip(mount_targets)
            .filter(|(_, targets)| efs_in_vpc(targets, &target.vpc_id))
            .map(|(fs, _)| EfsCandidate::new(fs.file_system_id.clone()))
            .collect())
    }

    async fn resolve_fsx(
        &self,
        target: &OnboardingTarget,
    ) -> Result<(Vec<LustreCandidate>, Vec<OntapCandidate>)> {
        let file_systems = self.fsx.list_file_systems(&target.region).await?;
        let selection = select_fsx_candidates(&file_systems, &target.excluded, &target.vpc_id);

        let lustre: Vec<LustreCandidate> = selection
            .lustre
            .iter()
            .map(|fs| LustreCandidate {
                filesystem: (*fs).clone(),
            })
            .collect();

        if selection.ontap.is_empty() {
            return Ok((lustre, Vec::new()));
        }

        let ontap_ids: Vec<String> = selection
            .ontap
            .iter()
            .map(|fs| fs.file_system_id.clone())
            .collect();
        let (svms, volumes) = futures::try_join!(
            self.fsx
                .list_storage_virtual_machines(&target.region, &ontap_ids),
            self.fsx.list_volumes(&target.region, &ontap_ids),
        )?;

        Ok((lustre, join_ontap_resources(&ontap_ids, svms, volumes)))
    }
}
