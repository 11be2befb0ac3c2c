//! Command handlers for the costctl CLI

use crate::client::OptimizerClient;
use crate::config::Config;
use crate::error::{CostctlError, Result};
use crate::interpret::{checked_limit, Interpreted};
use crate::model::{
    Component, InterruptionBehavior, InterruptionFrequency, OperatingSystem, PaymentOption, Region,
};
use crate::provider::{endpoint, Operation, Provider};
use crate::render::{self, OutputFormat, Report};
use crate::submit::Submitter;
use crate::validation::{build_fleet_request_with, build_single_request, FleetOptions, SingleInstanceHints};
use crate::workload::WorkloadForm;
use chrono::Utc;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub api_url: String,
    pub output: OutputFormat,
}

#[derive(Args, Clone, Debug)]
pub struct FleetArgs {
    /// Workload draft file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    pub workload: PathBuf,
    /// Cloud provider
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,
    /// Operating system
    #[arg(long, value_enum)]
    pub os: Option<OperatingSystem>,
    /// Pricing model
    #[arg(long, value_enum)]
    pub payment: Option<PaymentOption>,
    /// Region code, comma-separated list, or "all"
    #[arg(long)]
    pub region: Option<String>,
    /// Only consider these instance types
    #[arg(long, value_delimiter = ',')]
    pub filter_instances: Vec<String>,
    /// CPU architecture hint (e.g. x86_64, arm64)
    #[arg(long)]
    pub architecture: Option<String>,
    /// Only consider these instance families
    #[arg(long, value_delimiter = ',')]
    pub type_major: Vec<String>,
    /// Configurations to show (default from config, 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Clone, Debug)]
pub struct SingleArgs {
    /// Required vCPUs
    #[arg(long)]
    pub vcpus: u32,
    /// Required memory in GB
    #[arg(long)]
    pub memory: u32,
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,
    #[arg(long, value_enum)]
    pub os: Option<OperatingSystem>,
    #[arg(long, value_enum)]
    pub payment: Option<PaymentOption>,
    /// Region code or "all"
    #[arg(long)]
    pub region: Option<String>,
    /// Storage size in GB
    #[arg(long)]
    pub size: Option<u32>,
    #[arg(long)]
    pub iops: Option<u32>,
    /// Storage throughput in MB/s
    #[arg(long)]
    pub throughput: Option<u32>,
    /// Network bandwidth in Gbps
    #[arg(long)]
    pub network: Option<u32>,
    #[arg(long, value_enum)]
    pub behavior: Option<InterruptionBehavior>,
    /// Interruption band 0 (<5%) to 4 (>20%)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub frequency: Option<u8>,
    #[arg(long)]
    pub storage_type: Option<String>,
    #[arg(long, action = clap::ArgAction::Set)]
    pub burstable: Option<bool>,
    /// Instances to show (default from config, 20)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum WorkloadCommands {
    /// Create a draft with one blank app
    New {
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the draft and whether it is ready to submit
    Show { file: PathBuf },
    /// Append an app with one blank component
    AddApp { file: PathBuf },
    /// Remove an app (the last app cannot be removed)
    RemoveApp { file: PathBuf, app: usize },
    /// Change an app's label or sharing
    SetApp {
        file: PathBuf,
        app: usize,
        #[arg(long)]
        label: Option<String>,
        /// Whether the app may share instances with other apps
        #[arg(long, action = clap::ArgAction::Set)]
        share: Option<bool>,
    },
    /// Append a blank component to an app
    AddComponent { file: PathBuf, app: usize },
    /// Remove a component (an app keeps at least one)
    RemoveComponent {
        file: PathBuf,
        app: usize,
        component: usize,
    },
    /// Edit a component's fields
    SetComponent {
        file: PathBuf,
        app: usize,
        component: usize,
        #[command(flatten)]
        fields: ComponentFields,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct ComponentFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub vcpus: Option<u32>,
    /// Memory in GB
    #[arg(long)]
    pub memory: Option<u32>,
    /// Network bandwidth in Gbps
    #[arg(long)]
    pub network: Option<u32>,
    #[arg(long, value_enum)]
    pub behavior: Option<InterruptionBehavior>,
    /// Interruption band 0 (<5%) to 4 (>20%)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub frequency: Option<u8>,
    #[arg(long)]
    pub storage_type: Option<String>,
    #[arg(long)]
    pub affinity: Option<String>,
    #[arg(long)]
    pub anti_affinity: Option<String>,
    #[arg(long, action = clap::ArgAction::Set)]
    pub burstable: Option<bool>,
}

impl ComponentFields {
    /// Overlay the provided fields onto an existing component.
    pub fn apply(&self, mut component: Component) -> Component {
        if let Some(name) = &self.name {
            component.name = name.trim().to_string();
        }
        if let Some(vcpus) = self.vcpus {
            component.vcpus = vcpus;
        }
        if let Some(memory) = self.memory {
            component.memory = memory;
        }
        if let Some(network) = self.network {
            component.network = network;
        }
        if let Some(behavior) = self.behavior {
            component.behavior = Some(behavior);
        }
        if let Some(band) = self.frequency {
            component.frequency = InterruptionFrequency::new(band);
        }
        if let Some(storage_type) = &self.storage_type {
            component.storage_type = Some(storage_type.clone());
        }
        if let Some(affinity) = &self.affinity {
            component.affinity = Some(affinity.clone());
        }
        if let Some(anti_affinity) = &self.anti_affinity {
            component.anti_affinity = Some(anti_affinity.clone());
        }
        if let Some(burstable) = self.burstable {
            component.burstable = Some(burstable);
        }
        component
    }
}

fn fleet_options(args: &FleetArgs, config: &Config) -> FleetOptions {
    FleetOptions {
        os: args.os.unwrap_or(config.defaults.os),
        payment: args.payment.unwrap_or(config.defaults.payment),
        region: Region::parse(args.region.as_deref().unwrap_or(&config.defaults.region)),
        filter_instances: (!args.filter_instances.is_empty()).then(|| args.filter_instances.clone()),
        architecture: args.architecture.clone(),
        type_major: (!args.type_major.is_empty()).then(|| args.type_major.clone()),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_results(ctx: &CommandContext, provider: Provider, path: &str, results: &Interpreted) -> Result<()> {
    match ctx.output {
        OutputFormat::Json => {
            let report = Report {
                provider,
                endpoint: path,
                results,
                generated_at: Utc::now(),
            };
            println!("{}", render::report_json(&report)?);
        }
        OutputFormat::Text => println!("{}", render::interpreted_text(results)),
    }
    Ok(())
}

pub async fn handle_fleet(args: FleetArgs, ctx: &CommandContext) -> Result<()> {
    let form = WorkloadForm::load(&args.workload)?;
    let provider = args.provider.unwrap_or(ctx.config.defaults.provider);
    let options = fleet_options(&args, &ctx.config);
    let limit = checked_limit(args.limit.unwrap_or(ctx.config.display.fleet_limit), "limit")?;
    let path = endpoint(provider, Operation::Fleet);

    if args.dry_run {
        let request = build_fleet_request_with(&options, form.apps())?;
        println!("POST {}{}", ctx.api_url, path);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let submitter = Submitter::new(OptimizerClient::new(&ctx.api_url)?);
    let pb = spinner("Optimizing fleet...");
    let outcome = submitter.submit_fleet(provider, &options, &form, limit).await;
    pb.finish_and_clear();

    print_results(ctx, provider, path, &outcome?)
}

pub async fn handle_single(args: SingleArgs, ctx: &CommandContext) -> Result<()> {
    let provider = args.provider.unwrap_or(ctx.config.defaults.provider);
    let limit = checked_limit(args.limit.unwrap_or(ctx.config.display.single_limit), "limit")?;
    let region = args.region.clone().unwrap_or_else(|| ctx.config.defaults.region.clone());
    let request = build_single_request(
        args.os.unwrap_or(ctx.config.defaults.os),
        args.payment.unwrap_or(ctx.config.defaults.payment),
        &region,
        args.vcpus,
        args.memory,
        SingleInstanceHints {
            size: args.size,
            iops: args.iops,
            throughput: args.throughput,
            network: args.network,
            behavior: args.behavior,
            frequency: args.frequency.and_then(InterruptionFrequency::new),
            storage_type: args.storage_type.clone(),
            burstable: args.burstable,
        },
    )?;
    let path = endpoint(provider, Operation::Single);

    if args.dry_run {
        println!("POST {}{}", ctx.api_url, path);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let submitter = Submitter::new(OptimizerClient::new(&ctx.api_url)?);
    let pb = spinner("Searching instances...");
    let outcome = submitter.submit_single(provider, request, limit).await;
    pb.finish_and_clear();

    print_results(ctx, provider, path, &outcome?)
}

/// Convert a 1-based CLI app index, checking it exists.
fn app_index(form: &WorkloadForm, app: usize) -> Result<usize> {
    if app == 0 || app > form.len() {
        return Err(CostctlError::Validation {
            field: "app".to_string(),
            reason: format!("App {} does not exist (workload has {} app(s); indices start at 1)", app, form.len()),
        });
    }
    Ok(app - 1)
}

/// Convert 1-based CLI app and component indices, checking both exist.
fn component_index(form: &WorkloadForm, app: usize, component: usize) -> Result<(usize, usize)> {
    let a = app_index(form, app)?;
    let count = form.app(a).map(|app| app.components.len()).unwrap_or(0);
    if component == 0 || component > count {
        return Err(CostctlError::Validation {
            field: "component".to_string(),
            reason: format!("Component {} does not exist in app {} ({} component(s))", component, app, count),
        });
    }
    Ok((a, component - 1))
}

fn save_and_show(form: &WorkloadForm, file: &Path) -> Result<()> {
    form.save(file)?;
    info!("Saved workload draft to {}", file.display());
    println!("{}", render::workload_text(form));
    Ok(())
}

pub fn handle_workload(cmd: WorkloadCommands) -> Result<()> {
    match cmd {
        WorkloadCommands::New { file, force } => {
            if file.exists() && !force {
                return Err(CostctlError::Validation {
                    field: "file".to_string(),
                    reason: format!("{} already exists (use --force to overwrite)", file.display()),
                });
            }
            save_and_show(&WorkloadForm::default(), &file)
        }
        WorkloadCommands::Show { file } => {
            let form = WorkloadForm::load(&file)?;
            println!("{}", render::workload_text(&form));
            match crate::validation::validate_apps(form.apps()) {
                Ok(()) => println!("Ready to submit."),
                Err(e) => println!("Not ready: {}", e.user_message()),
            }
            Ok(())
        }
        WorkloadCommands::AddApp { file } => {
            let form = WorkloadForm::load(&file)?.add_app();
            save_and_show(&form, &file)
        }
        WorkloadCommands::RemoveApp { file, app } => {
            let form = WorkloadForm::load(&file)?;
            let index = app_index(&form, app)?;
            if form.len() == 1 {
                println!("A workload needs at least one app; nothing removed.");
                return Ok(());
            }
            save_and_show(&form.remove_app(index), &file)
        }
        WorkloadCommands::SetApp {
            file,
            app,
            label,
            share,
        } => {
            let form = WorkloadForm::load(&file)?;
            let index = app_index(&form, app)?;
            let mut updated = form.app(index).cloned().unwrap_or_else(|| crate::model::App::blank(""));
            if let Some(label) = label {
                updated.app = label;
            }
            if let Some(share) = share {
                updated.share = share;
            }
            save_and_show(&form.update_app(index, updated), &file)
        }
        WorkloadCommands::AddComponent { file, app } => {
            let form = WorkloadForm::load(&file)?;
            let index = app_index(&form, app)?;
            save_and_show(&form.add_component(index), &file)
        }
        WorkloadCommands::RemoveComponent {
            file,
            app,
            component,
        } => {
            let form = WorkloadForm::load(&file)?;
            let (a, c) = component_index(&form, app, component)?;
            if form.app(a).map(|app| app.components.len()) == Some(1) {
                println!("An app needs at least one component; nothing removed.");
                return Ok(());
            }
            save_and_show(&form.remove_component(a, c), &file)
        }
        WorkloadCommands::SetComponent {
            file,
            app,
            component,
            fields,
        } => {
            let form = WorkloadForm::load(&file)?;
            let (a, c) = component_index(&form, app, component)?;
            let current = form.component(a, c).cloned().unwrap_or_default();
            save_and_show(&form.update_component(a, c, fields.apply(current)), &file)
        }
    }
}
