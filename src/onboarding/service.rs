//! Onboarding Service
//!
//! Ties the settings registry to the resolver: the cluster module supplies
//! region and VPC, the shared-storage module supplies what is already
//! onboarded, and the caller adds what it onboarded during its session.

use super::metrics::OnboardingMetrics;
use super::report::EligibilityReport;
use super::resolver::{EligibilityResolver, OnboardingTarget};
use crate::domain::ports::{EfsInventoryRef, FsxInventoryRef, SettingsRegistryRef};
use crate::error::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Lists file systems that can be onboarded as cluster shared storage
pub struct OnboardingService {
    settings: SettingsRegistryRef,
    resolver: EligibilityResolver,
    metrics: OnboardingMetrics,
}

impl OnboardingService {
    /// Create a new onboarding service
    pub fn new(
        settings: SettingsRegistryRef,
        efs: EfsInventoryRef,
        fsx: FsxInventoryRef,
    ) -> Result<Arc<Self>> {
        Ok(Arc::new(Self {
            settings,
            resolver: EligibilityResolver::new(efs, fsx),
            metrics: OnboardingMetrics::new()?,
        }))
    }

    pub fn metrics(&self) -> &OnboardingMetrics {
        &self.metrics
    }

    /// Candidates for onboarding, leaving out everything already registered
    /// in shared storage and every id in `just_onboarded`
    pub async fn list_file_systems_for_onboard(
        &self,
        just_onboarded: &[String],
    ) -> Result<EligibilityReport> {
        let started = Instant::now();
        let result = self.resolve(just_onboarded).await;

        match result {
            Ok(ref report) => self.metrics.record_success(report, started.elapsed()),
            Err(ref e) => {
                warn!("Onboarding resolution failed: {}", e);
                self.metrics.record_failure(e, started.elapsed());
            }
        }
        result
    }

    async fn resolve(&self, just_onboarded: &[String]) -> Result<EligibilityReport> {
        let (cluster, shared_storage) = futures::try_join!(
            self.settings.cluster_settings(),
            self.settings.shared_storage_settings(),
        )?;

        let onboarded = shared_storage.onboarded_file_system_ids();
        debug!(
            "{} file systems already onboarded, {} onboarded this session",
            onboarded.len(),
            just_onboarded.len()
        );

        let target = OnboardingTarget::new(cluster.region()?, cluster.vpc_id()?)
            .exclude(onboarded)
            .exclude(just_onboarded.iter().cloned());

        self.resolver.resolve(&target).await
    }
}
