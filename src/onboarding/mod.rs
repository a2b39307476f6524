//! Onboarding Module
//!
//! Determines which EFS and FSx file systems can be onboarded into the
//! cluster's shared storage.

pub mod metrics;
pub mod report;
pub mod resolver;
pub mod service;

pub use metrics::*;
pub use report::*;
pub use resolver::*;
pub use service::*;
