//! costctl library
//!
//! Workload description, request building, provider routing, and result
//! interpretation for the costctl CLI.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod interpret;
pub mod model;
pub mod provider;
pub mod render;
pub mod submit;
pub mod validation;
pub mod workload;

// Re-export commonly used types
pub use client::{OptimizerApi, OptimizerClient};
pub use error::{CostctlError, Result};
pub use model::{App, Component, FleetRequest, SingleInstanceRequest};
pub use provider::{endpoint, Operation, Provider};
pub use workload::WorkloadForm;
