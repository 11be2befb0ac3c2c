//! Provider routing
//!
//! Maps a provider selection and an operation onto one of the optimization
//! service's six endpoints. The provider set is closed: command-line input is
//! parsed into `Provider` by clap, so routing itself can never see an unknown
//! provider.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud vendor (or vendor combination) whose catalog is searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Provider {
    #[default]
    #[serde(rename = "AWS", alias = "aws")]
    #[value(name = "aws")]
    Aws,
    #[serde(rename = "Azure", alias = "azure")]
    #[value(name = "azure")]
    Azure,
    /// AWS and Azure combined
    #[serde(rename = "Hybrid", alias = "hybrid")]
    #[value(name = "hybrid")]
    Hybrid,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Hybrid];

    pub fn label(self) -> &'static str {
        match self {
            Provider::Aws => "AWS",
            Provider::Azure => "Azure",
            Provider::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the optimization service is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Pack a multi-app workload onto a set of instances
    Fleet,
    /// Price instances matching one vCPU/memory sizing
    Single,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Fleet, Operation::Single];
}

/// Endpoint path for a provider and operation.
pub fn endpoint(provider: Provider, operation: Operation) -> &'static str {
    match (provider, operation) {
        (Provider::Aws, Operation::Fleet) => "/getAWSFleet",
        (Provider::Aws, Operation::Single) => "/getAWSPrices",
        (Provider::Azure, Operation::Fleet) => "/getAzureFleet",
        (Provider::Azure, Operation::Single) => "/getAzurePrices",
        (Provider::Hybrid, Operation::Fleet) => "/getHybridCloudFleet",
        (Provider::Hybrid, Operation::Single) => "/getHybridPrices",
    }
}
