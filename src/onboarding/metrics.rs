//! Resolution metrics
//!
//! Prometheus collectors kept in a registry owned by the service, so that
//! several services (and tests) never share global state.

use super::report::EligibilityReport;
use crate::domain::ports::FileSystemKind;
use crate::error::{Error, Result};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

pub struct OnboardingMetrics {
    registry: Registry,
    resolutions: IntCounterVec,
    duration: Histogram,
    candidates: IntGaugeVec,
}

impl OnboardingMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let resolutions = IntCounterVec::new(
            Opts::new(
                "onboarding_resolutions_total",
                "Eligibility resolutions by outcome",
            ),
            &["outcome"],
        )?;
        let duration = Histogram::with_opts(HistogramOpts::new(
            "onboarding_resolution_duration_seconds",
            "Duration of eligibility resolutions",
        ))?;
        let candidates = IntGaugeVec::new(
            Opts::new(
                "onboarding_candidates",
                "Candidates found by the last successful resolution",
            ),
            &["kind"],
        )?;

        registry.register(Box::new(resolutions.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(candidates.clone()))?;

        Ok(Self {
            registry,
            resolutions,
            duration,
            candidates,
        })
    }

    pub fn record_success(&self, report: &EligibilityReport, elapsed: Duration) {
        self.resolutions.with_label_values(&["success"]).inc();
        self.duration.observe(elapsed.as_secs_f64());
        for kind in FileSystemKind::ALL {
            let label = kind.to_string();
            self.candidates
                .with_label_values(&[label.as_str()])
                .set(report.count(kind) as i64);
        }
    }

    pub fn record_failure(&self, error: &Error, elapsed: Duration) {
        let outcome = if error.is_upstream() {
            "upstream_error"
        } else {
            "error"
        };
        self.resolutions.with_label_values(&[outcome]).inc();
        self.duration.observe(elapsed.as_secs_f64());
    }

    /// Number of resolutions recorded with an outcome
    pub fn resolutions(&self, outcome: &str) -> u64 {
        self.resolutions.with_label_values(&[outcome]).get()
    }

    /// Prometheus text exposition of all collectors
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Internal(format!("metrics encoding: {}", e)))
    }
}
