//! API Module
//!
//! REST surface for the admin console: candidate listing, health and
//! metrics.

pub mod rest;
pub mod server;

pub use rest::*;
pub use server::*;
