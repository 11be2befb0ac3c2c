//! Request building and input validation
//!
//! Turns raw workload form state into normalized, provider-agnostic request
//! payloads. Both builders are pure: the same input always yields the same
//! request or the same validation error, and nothing here talks to the network.

use crate::error::{CostctlError, Result};
use crate::model::{
    App, Component, FleetRequest, InterruptionBehavior, InterruptionFrequency, OperatingSystem,
    PaymentOption, Region, SingleInstanceRequest,
};

/// Shown when any component lacks a name, vCPUs or memory.
pub const INCOMPLETE_COMPONENTS_MESSAGE: &str = "Please fill in all required component fields";

/// Shown when a single-instance search has no sizing.
pub const INVALID_SIZING_MESSAGE: &str = "vCPUs and memory must be greater than zero";

/// Fleet-level settings chosen alongside the workload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetOptions {
    pub os: OperatingSystem,
    pub payment: PaymentOption,
    pub region: Region,
    pub filter_instances: Option<Vec<String>>,
    pub architecture: Option<String>,
    pub type_major: Option<Vec<String>>,
}

/// Optional sizing and storage hints for a single-instance search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleInstanceHints {
    pub size: Option<u32>,
    pub iops: Option<u32>,
    pub throughput: Option<u32>,
    pub network: Option<u32>,
    pub behavior: Option<InterruptionBehavior>,
    pub frequency: Option<InterruptionFrequency>,
    pub storage_type: Option<String>,
    pub burstable: Option<bool>,
}

/// Check that every component of every App is complete.
///
/// The error carries one aggregate message, not a per-field report.
pub fn validate_apps(apps: &[App]) -> Result<()> {
    let incomplete = apps
        .iter()
        .flat_map(|app| app.components.iter())
        .any(|component| !component.is_complete());

    if incomplete {
        return Err(CostctlError::Validation {
            field: "components".to_string(),
            reason: INCOMPLETE_COMPONENTS_MESSAGE.to_string(),
        });
    }

    Ok(())
}

/// Build a fleet request with default hints.
pub fn build_fleet_request(
    os: OperatingSystem,
    payment: PaymentOption,
    region: Region,
    apps: &[App],
) -> Result<FleetRequest> {
    let options = FleetOptions {
        os,
        payment,
        region,
        ..FleetOptions::default()
    };
    build_fleet_request_with(&options, apps)
}

/// Validate `apps` and normalize them into a fleet request.
///
/// App labels are replaced by positional identifiers (`App1`, `App2`, ...) and
/// incomplete components are filtered out as a second pass.
pub fn build_fleet_request_with(options: &FleetOptions, apps: &[App]) -> Result<FleetRequest> {
    validate_apps(apps)?;

    let apps = apps
        .iter()
        .enumerate()
        .map(|(index, app)| App {
            app: format!("App{}", index + 1),
            share: app.share,
            components: app
                .components
                .iter()
                .filter(|c| c.is_complete())
                .cloned()
                .collect::<Vec<Component>>(),
        })
        .collect::<Vec<_>>();

    // Unreachable after validate_apps, but an empty App must never go out.
    if apps.is_empty() || apps.iter().any(|app| app.components.is_empty()) {
        return Err(CostctlError::Validation {
            field: "apps".to_string(),
            reason: INCOMPLETE_COMPONENTS_MESSAGE.to_string(),
        });
    }

    Ok(FleetRequest {
        selected_os: options.os,
        payment: options.payment,
        region: options.region.clone(),
        apps,
        filter_instances: non_empty(options.filter_instances.as_ref()),
        architecture: options
            .architecture
            .as_ref()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()),
        type_major: non_empty(options.type_major.as_ref()),
    })
}

/// Validate sizing and build a single-instance request.
///
/// An empty region means unconstrained and is sent as `"all"`.
pub fn build_single_request(
    os: OperatingSystem,
    payment: PaymentOption,
    region: &str,
    vcpus: u32,
    memory: u32,
    hints: SingleInstanceHints,
) -> Result<SingleInstanceRequest> {
    if vcpus == 0 || memory == 0 {
        return Err(CostctlError::Validation {
            field: "sizing".to_string(),
            reason: INVALID_SIZING_MESSAGE.to_string(),
        });
    }

    let region = region.trim();
    let selected_region = if region.is_empty() {
        Region::ALL.to_string()
    } else {
        region.to_string()
    };

    Ok(SingleInstanceRequest {
        selected_os: os,
        payment,
        selected_region,
        vcpus,
        memory,
        size: hints.size,
        iops: hints.iops,
        throughput: hints.throughput,
        network: hints.network,
        behavior: hints.behavior,
        frequency: hints.frequency,
        storage_type: hints.storage_type,
        burstable: hints.burstable,
    })
}

fn non_empty(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    values
        .map(|v| {
            v.iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
}
