//! Domain model for workloads, optimization requests, and optimizer results
//!
//! Field names follow the optimization service's JSON contract (`vCPUs`,
//! `selectedOs`, `spot_price`, ...), so the serde renames here are the wire
//! format, not a presentation choice.

use crate::provider::Operation;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Operating system the instances must run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    #[default]
    Linux,
    Windows,
}

/// Pricing model for the instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum PaymentOption {
    #[default]
    #[serde(rename = "Spot")]
    Spot,
    #[serde(rename = "onDemand")]
    #[value(name = "on-demand", alias = "ondemand")]
    OnDemand,
}

/// How a component's instance reacts to a spot interruption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InterruptionBehavior {
    #[default]
    Terminate,
    Stop,
    Hibernate,
}

impl InterruptionBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            InterruptionBehavior::Terminate => "terminate",
            InterruptionBehavior::Stop => "stop",
            InterruptionBehavior::Hibernate => "hibernate",
        }
    }
}

/// Interruption-probability band a component tolerates.
///
/// | band | interruption frequency |
/// |------|------------------------|
/// | 0    | <5%                    |
/// | 1    | 5-10%                  |
/// | 2    | 10-15%                 |
/// | 3    | 15-20%                 |
/// | 4    | >20%                   |
///
/// The default is 4, the least restrictive band for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct InterruptionFrequency(u8);

impl InterruptionFrequency {
    pub const MAX: u8 = 4;

    pub fn new(band: u8) -> Option<Self> {
        (band <= Self::MAX).then_some(Self(band))
    }

    pub fn band(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "<5%",
            1 => "5-10%",
            2 => "10-15%",
            3 => "15-20%",
            _ => ">20%",
        }
    }
}

impl Default for InterruptionFrequency {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for InterruptionFrequency {
    type Error = String;

    fn try_from(band: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(band).ok_or_else(|| {
            format!("interruption frequency must be between 0 and {}, got {}", Self::MAX, band)
        })
    }
}

impl From<InterruptionFrequency> for u8 {
    fn from(value: InterruptionFrequency) -> Self {
        value.0
    }
}

/// A named unit of resource demand within an App
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "vCPUs", default)]
    pub vcpus: u32,
    /// Memory in GB
    #[serde(default)]
    pub memory: u32,
    /// Network bandwidth in Gbps
    #[serde(default)]
    pub network: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<InterruptionBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<InterruptionFrequency>,
    #[serde(rename = "storageType", default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<String>,
    #[serde(rename = "anti-affinity", default, skip_serializing_if = "Option::is_none")]
    pub anti_affinity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burstable: Option<bool>,
}

impl Component {
    pub fn new(name: impl Into<String>, vcpus: u32, memory: u32) -> Self {
        Self {
            name: name.into(),
            vcpus,
            memory,
            ..Self::default()
        }
    }

    /// A component is complete when it has a name, vCPUs and memory.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.vcpus > 0 && self.memory > 0
    }

    pub fn effective_behavior(&self) -> InterruptionBehavior {
        self.behavior.unwrap_or_default()
    }

    pub fn effective_frequency(&self) -> InterruptionFrequency {
        self.frequency.unwrap_or_default()
    }
}

fn default_share() -> bool {
    true
}

/// A named collection of Components sharing a deployment unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub app: String,
    /// Whether this App's components may share instances with other Apps
    #[serde(default = "default_share")]
    pub share: bool,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl App {
    /// A shareable App with a single blank component.
    pub fn blank(label: impl Into<String>) -> Self {
        Self {
            app: label.into(),
            share: true,
            components: vec![Component::default()],
        }
    }
}

/// Region constraint for a fleet request.
///
/// Serialized untagged: either a plain string (including the sentinel
/// `"all"`) or an array of region codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Region {
    One(String),
    Many(Vec<String>),
}

impl Region {
    pub const ALL: &'static str = "all";

    pub fn all() -> Self {
        Region::One(Self::ALL.to_string())
    }

    /// Parse user input: empty or `all` is unconstrained, a comma-separated
    /// list with several entries becomes `Many`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL) {
            return Self::all();
        }
        let parts: Vec<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.len() {
            0 => Self::all(),
            1 => Region::One(parts.into_iter().next().unwrap_or_default()),
            _ => Region::Many(parts),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::One(r) => write!(f, "{}", r),
            Region::Many(rs) => write!(f, "{}", rs.join(",")),
        }
    }
}

/// Request body for the fleet endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRequest {
    #[serde(rename = "selectedOs")]
    pub selected_os: OperatingSystem,
    pub payment: PaymentOption,
    pub region: Region,
    pub apps: Vec<App>,
    #[serde(rename = "filterInstances", default, skip_serializing_if = "Option::is_none")]
    pub filter_instances: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_major: Option<Vec<String>>,
}

/// Request body for the single-instance price endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleInstanceRequest {
    #[serde(rename = "selectedOs")]
    pub selected_os: OperatingSystem,
    pub payment: PaymentOption,
    #[serde(rename = "selectedRegion")]
    pub selected_region: String,
    #[serde(rename = "vCPUs")]
    pub vcpus: u32,
    pub memory: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<InterruptionBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<InterruptionFrequency>,
    #[serde(rename = "storageType", default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burstable: Option<bool>,
}

/// A built request of either kind
///
/// Serializes as the inner body; the variant picks the endpoint and the
/// shape the answer is decoded as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptimizationRequest {
    Fleet(FleetRequest),
    Single(SingleInstanceRequest),
}

impl OptimizationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OptimizationRequest::Fleet(_) => Operation::Fleet,
            OptimizationRequest::Single(_) => Operation::Single,
        }
    }
}

/// Which workload piece occupies an instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAssignment {
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "componentName")]
    pub component_name: String,
}

/// One priced instance within a fleet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "typeName", default)]
    pub type_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cpu: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub memory: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub network: String,
    #[serde(default)]
    pub os: String,
    #[serde(rename = "typeMajor", default)]
    pub type_major: String,
    #[serde(rename = "typeMinor", default)]
    pub type_minor: String,
    #[serde(rename = "onDemandPrice", default)]
    pub on_demand_price: f64,
    #[serde(default)]
    pub spot_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_frequency: Option<String>,
    #[serde(rename = "priceAfterDiscount", default, skip_serializing_if = "Option::is_none")]
    pub price_after_discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentAssignment>>,
}

/// One candidate fleet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetResult {
    pub price: f64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// One priced instance returned by a single-instance search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleInstanceResult {
    #[serde(rename = "typeName", default)]
    pub type_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cpu: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub memory: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub network: String,
    #[serde(default)]
    pub os: String,
    #[serde(rename = "typeMajor", default)]
    pub type_major: String,
    #[serde(rename = "typeMinor", default)]
    pub type_minor: String,
    #[serde(rename = "onDemandPrice", default)]
    pub on_demand_price: f64,
    #[serde(default)]
    pub spot_price: f64,
    #[serde(default)]
    pub discount: f64,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_frequency: Option<String>,
}

/// The optimizer reports sizes either as text ("4", "Up to 10 Gigabit") or
/// bare numbers; both are kept as display strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_wire_format_omits_unset_hints() {
        let component = Component::new("web", 2, 4);
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value, json!({"name": "web", "vCPUs": 2, "memory": 4, "network": 0}));
    }

    #[test]
    fn test_component_defaults() {
        let component = Component::default();
        assert!(!component.is_complete());
        assert_eq!(component.effective_behavior(), InterruptionBehavior::Terminate);
        assert_eq!(component.effective_frequency().band(), 4);
        assert_eq!(component.network, 0);
    }

    #[test]
    fn test_component_hint_wire_names() {
        let component = Component {
            storage_type: Some("ssd".to_string()),
            anti_affinity: Some("db".to_string()),
            behavior: Some(InterruptionBehavior::Hibernate),
            frequency: InterruptionFrequency::new(1),
            ..Component::new("api", 1, 2)
        };
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["storageType"], "ssd");
        assert_eq!(value["anti-affinity"], "db");
        assert_eq!(value["behavior"], "hibernate");
        assert_eq!(value["frequency"], 1);
    }

    #[test]
    fn test_frequency_out_of_range_rejected() {
        let result: std::result::Result<Component, _> =
            serde_json::from_value(json!({"name": "x", "vCPUs": 1, "memory": 1, "frequency": 7}));
        assert!(result.is_err());
        assert!(InterruptionFrequency::new(5).is_none());
        assert_eq!(InterruptionFrequency::new(0).unwrap().label(), "<5%");
    }

    #[test]
    fn test_enums_wire_names() {
        assert_eq!(serde_json::to_value(PaymentOption::Spot).unwrap(), "Spot");
        assert_eq!(serde_json::to_value(PaymentOption::OnDemand).unwrap(), "onDemand");
        assert_eq!(serde_json::to_value(OperatingSystem::Windows).unwrap(), "windows");
    }

    #[test]
    fn test_region_parse() {
        assert_eq!(Region::parse("all"), Region::all());
        assert_eq!(Region::parse("  ALL "), Region::all());
        assert_eq!(Region::parse(""), Region::all());
        assert_eq!(Region::parse("us-east-1"), Region::One("us-east-1".to_string()));
        assert_eq!(
            Region::parse("us-east-1, eu-west-1"),
            Region::Many(vec!["us-east-1".to_string(), "eu-west-1".to_string()])
        );
        assert_eq!(Region::parse("us-east-1,"), Region::One("us-east-1".to_string()));
    }

    #[test]
    fn test_region_serializes_untagged() {
        assert_eq!(serde_json::to_value(Region::all()).unwrap(), json!("all"));
        assert_eq!(
            serde_json::to_value(Region::parse("a,b")).unwrap(),
            json!(["a", "b"])
        );
    }

    #[test]
    fn test_instance_accepts_numeric_sizes() {
        let instance: Instance = serde_json::from_value(json!({
            "typeName": "m5.large",
            "region": "us-east-1",
            "cpu": 2,
            "memory": "8",
            "network": "Up to 10 Gigabit",
            "os": "linux",
            "typeMajor": "m5",
            "typeMinor": "large",
            "onDemandPrice": 0.096,
            "spot_price": 0.035,
            "discount": 63,
            "components": [{"appName": "App1", "componentName": "web"}]
        }))
        .unwrap();
        assert_eq!(instance.cpu, "2");
        assert_eq!(instance.memory, "8");
        assert_eq!(instance.discount, 63.0);
        assert_eq!(instance.components.unwrap()[0].component_name, "web");
    }
}
