//! Result interpretation
//!
//! Normalizes the optimizer's two response shapes into display models. The
//! optimizer ranks results by price before returning them; nothing here
//! re-sorts, it only keeps a bounded prefix in server order.

use crate::error::{CostctlError, Result};
use crate::model::{FleetResult, Instance, SingleInstanceResult};
use crate::provider::Operation;
use serde::Serialize;

/// Fleet configurations shown by default
pub const FLEET_DISPLAY_LIMIT: usize = 10;
/// Single-instance results shown by default
pub const SINGLE_DISPLAY_LIMIT: usize = 20;

/// Shown when the optimizer finds nothing that satisfies the workload
pub const NO_RESULTS_MESSAGE: &str = "No results found. Try adjusting your requirements.";

/// Raw optimizer output, decoded according to the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "results", rename_all = "lowercase")]
pub enum OptimizationResults {
    Fleet(Vec<FleetResult>),
    Single(Vec<SingleInstanceResult>),
}

impl OptimizationResults {
    /// Decode a response body for a known operation.
    pub fn decode(operation: Operation, body: &[u8]) -> Result<Self> {
        Ok(match operation {
            Operation::Fleet => OptimizationResults::Fleet(serde_json::from_slice(body)?),
            Operation::Single => OptimizationResults::Single(serde_json::from_slice(body)?),
        })
    }

    pub fn len(&self) -> usize {
        match self {
            OptimizationResults::Fleet(r) => r.len(),
            OptimizationResults::Single(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a successful submission: either results or "no matches".
///
/// An empty answer is a valid outcome, distinct from a transport failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum ResultSet<T> {
    Found(Vec<T>),
    NoMatches,
}

impl<T> ResultSet<T> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            ResultSet::NoMatches
        } else {
            ResultSet::Found(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ResultSet::Found(items) => items,
            ResultSet::NoMatches => &[],
        }
    }

    pub fn is_no_matches(&self) -> bool {
        matches!(self, ResultSet::NoMatches)
    }
}

/// One instance inside a fleet configuration, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFleetInstance {
    pub type_name: String,
    pub region: String,
    pub cpu: String,
    pub memory: String,
    pub network: String,
    pub spot_price: f64,
    pub on_demand_price: f64,
    pub discount_badge: Option<String>,
    /// Comma-separated names of the components placed on this instance
    pub component_summary: Option<String>,
    pub interruption_frequency: Option<String>,
}

/// One ranked fleet configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayConfiguration {
    /// 1-based position in server order
    pub rank: usize,
    pub price: f64,
    pub region: String,
    pub instances: Vec<DisplayFleetInstance>,
}

/// One ranked single-instance result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayInstance {
    pub rank: usize,
    pub type_name: String,
    pub region: String,
    pub cpu: String,
    pub memory: String,
    pub network: String,
    pub total_price: f64,
    pub spot_price: f64,
    pub on_demand_price: f64,
    pub discount_badge: Option<String>,
    pub interruption_frequency: Option<String>,
}

/// Badge text, only for a strictly positive discount.
pub fn discount_badge(discount: f64) -> Option<String> {
    (discount > 0.0).then(|| format!("{}% discount", discount))
}

/// Component names joined for display, if the optimizer attributed any.
pub fn component_summary(instance: &Instance) -> Option<String> {
    instance
        .components
        .as_ref()
        .filter(|c| !c.is_empty())
        .map(|components| {
            components
                .iter()
                .map(|c| c.component_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
}

pub fn interpret_fleet_results(raw: Vec<FleetResult>, limit: usize) -> ResultSet<DisplayConfiguration> {
    let configurations = raw
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, result)| DisplayConfiguration {
            rank: index + 1,
            price: result.price,
            region: result.region,
            instances: result
                .instances
                .iter()
                .map(|instance| DisplayFleetInstance {
                    type_name: instance.type_name.clone(),
                    region: instance.region.clone(),
                    cpu: instance.cpu.clone(),
                    memory: instance.memory.clone(),
                    network: instance.network.clone(),
                    spot_price: instance.spot_price,
                    on_demand_price: instance.on_demand_price,
                    discount_badge: discount_badge(instance.discount),
                    component_summary: component_summary(instance),
                    interruption_frequency: instance.interruption_frequency.clone(),
                })
                .collect(),
        })
        .collect();

    ResultSet::from_items(configurations)
}

pub fn interpret_single_results(raw: Vec<SingleInstanceResult>, limit: usize) -> ResultSet<DisplayInstance> {
    let instances = raw
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, result)| DisplayInstance {
            rank: index + 1,
            discount_badge: discount_badge(result.discount),
            type_name: result.type_name,
            region: result.region,
            cpu: result.cpu,
            memory: result.memory,
            network: result.network,
            total_price: result.total_price,
            spot_price: result.spot_price,
            on_demand_price: result.on_demand_price,
            interruption_frequency: result.interruption_frequency,
        })
        .collect();

    ResultSet::from_items(instances)
}

/// Interpreted output of either kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Interpreted {
    Fleet { configurations: ResultSet<DisplayConfiguration> },
    Single { instances: ResultSet<DisplayInstance> },
}

impl Interpreted {
    pub fn is_no_matches(&self) -> bool {
        match self {
            Interpreted::Fleet { configurations } => configurations.is_no_matches(),
            Interpreted::Single { instances } => instances.is_no_matches(),
        }
    }
}

/// Interpret decoded results, keeping at most `limit` entries.
pub fn interpret(results: OptimizationResults, limit: usize) -> Interpreted {
    match results {
        OptimizationResults::Fleet(raw) => Interpreted::Fleet {
            configurations: interpret_fleet_results(raw, limit),
        },
        OptimizationResults::Single(raw) => Interpreted::Single {
            instances: interpret_single_results(raw, limit),
        },
    }
}

/// A limit of zero would hide every result; treat it as a configuration mistake.
pub fn checked_limit(limit: usize, field: &str) -> Result<usize> {
    if limit == 0 {
        return Err(CostctlError::Validation {
            field: field.to_string(),
            reason: format!("{} must be at least 1", field),
        });
    }
    Ok(limit)
}
