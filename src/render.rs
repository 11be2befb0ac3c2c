//! Terminal and JSON rendering of interpreted results

use crate::interpret::{
    DisplayConfiguration, DisplayInstance, Interpreted, ResultSet, NO_RESULTS_MESSAGE,
};
use crate::provider::Provider;
use crate::workload::WorkloadForm;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use comfy_table::{Cell, Color, Table};
use console::style;
use serde::Serialize;

/// Output format selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON document printed for `--output json`
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub provider: Provider,
    pub endpoint: &'a str,
    #[serde(flatten)]
    pub results: &'a Interpreted,
    pub generated_at: DateTime<Utc>,
}

pub fn format_price(price: f64) -> String {
    format!("${:.4}", price)
}

fn discount_cell(badge: Option<&str>) -> Cell {
    match badge {
        Some(text) => Cell::new(text).fg(Color::Green),
        None => Cell::new("-"),
    }
}

pub fn fleet_text(set: &ResultSet<DisplayConfiguration>) -> String {
    let configurations = match set {
        ResultSet::NoMatches => return NO_RESULTS_MESSAGE.to_string(),
        ResultSet::Found(items) => items,
    };

    let mut out = String::new();
    for configuration in configurations {
        out.push_str(&format!(
            "{}  {}  {}\n",
            style(format!("Configuration #{}", configuration.rank)).bold(),
            style(format!("{}/hr", format_price(configuration.price))).green(),
            configuration.region
        ));

        let mut table = Table::new();
        table.set_header(vec![
            "Instance", "Region", "vCPUs", "Memory (GB)", "Network", "Spot/hr", "Discount",
            "Interruption", "Components",
        ]);
        for instance in &configuration.instances {
            table.add_row(vec![
                Cell::new(&instance.type_name),
                Cell::new(&instance.region),
                Cell::new(&instance.cpu),
                Cell::new(&instance.memory),
                Cell::new(&instance.network),
                Cell::new(format_price(instance.spot_price)),
                discount_cell(instance.discount_badge.as_deref()),
                Cell::new(instance.interruption_frequency.as_deref().unwrap_or("-")),
                Cell::new(instance.component_summary.as_deref().unwrap_or("-")),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    out
}

pub fn single_text(set: &ResultSet<DisplayInstance>) -> String {
    let instances = match set {
        ResultSet::NoMatches => return NO_RESULTS_MESSAGE.to_string(),
        ResultSet::Found(items) => items,
    };

    let mut table = Table::new();
    table.set_header(vec![
        "#", "Instance", "Region", "vCPUs", "Memory (GB)", "Network", "Total/hr", "Spot/hr",
        "Discount", "Interruption",
    ]);
    for instance in instances {
        table.add_row(vec![
            Cell::new(instance.rank),
            Cell::new(&instance.type_name),
            Cell::new(&instance.region),
            Cell::new(&instance.cpu),
            Cell::new(&instance.memory),
            Cell::new(&instance.network),
            Cell::new(format_price(instance.total_price)).fg(Color::Cyan),
            Cell::new(format_price(instance.spot_price)),
            discount_cell(instance.discount_badge.as_deref()),
            Cell::new(instance.interruption_frequency.as_deref().unwrap_or("-")),
        ]);
    }
    table.to_string()
}

pub fn interpreted_text(results: &Interpreted) -> String {
    match results {
        Interpreted::Fleet { configurations } => fleet_text(configurations),
        Interpreted::Single { instances } => single_text(instances),
    }
}

pub fn report_json(report: &Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Workload draft overview with 1-based indices, as the CLI addresses them
pub fn workload_text(form: &WorkloadForm) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "App", "Label", "Share", "#", "Component", "vCPUs", "Memory (GB)", "Network", "Behavior",
        "Interruption",
    ]);
    for (app_index, app) in form.apps().iter().enumerate() {
        for (comp_index, component) in app.components.iter().enumerate() {
            let name = if component.is_complete() {
                Cell::new(&component.name)
            } else {
                Cell::new(if component.name.is_empty() { "(incomplete)" } else { component.name.as_str() })
                    .fg(Color::Yellow)
            };
            table.add_row(vec![
                Cell::new(app_index + 1),
                Cell::new(&app.app),
                Cell::new(if app.share { "yes" } else { "no" }),
                Cell::new(comp_index + 1),
                name,
                Cell::new(component.vcpus),
                Cell::new(component.memory),
                Cell::new(component.network),
                Cell::new(component.effective_behavior().as_str()),
                Cell::new(component.effective_frequency().label()),
            ]);
        }
    }
    table.to_string()
}
