//! # rhsm-register CLI
//!
//! Validates `rhsm_register` manifests and plans reconciliation against
//! recorded observations without touching the registration server.

use clap::{Parser, Subcommand};
use rhsm_register::logging::{self, codes, LogLevel, LoggingPreferences};
use rhsm_register::manifest::{load_manifest, load_observations};
use rhsm_register::prelude::*;
use rhsm_register::resource::parameter_specs;
use rhsm_register::{log_error, log_info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
/// `plan --detailed-exitcode` with pending changes
const EXIT_CHANGES: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "rhsm-register", version, about = "Validate and plan rhsm_register resources")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    structured_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate every resource in a manifest
    Validate {
        manifest: PathBuf,

        /// Print validated resources as JSON (secrets redacted)
        #[arg(long)]
        json: bool,
    },

    /// Show the resource documentation and its parameters
    Describe {
        #[arg(long)]
        json: bool,
    },

    /// Show what a reconciliation pass would do
    Plan {
        manifest: PathBuf,

        /// State assumed for servers without a recorded observation
        #[arg(long, default_value = "absent")]
        observed: EnsureState,

        /// TOML file with an [observed] table of hostname = state
        #[arg(long)]
        observations: Option<PathBuf>,

        #[arg(long)]
        json: bool,

        /// Exit 2 when the plan contains changes
        #[arg(long)]
        detailed_exitcode: bool,

        /// Plan as if no resource set `force`
        #[arg(long)]
        ignore_force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let preferences = logging_preferences(&cli);

    if let Err(e) = init_logging(&preferences) {
        eprintln!(
            "Error [{}]: failed to initialize logging: {}",
            codes::system::INITIALIZATION_FAILURE,
            e
        );
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Validate { manifest, json } => validate(&manifest, json),
        Command::Describe { json } => describe(json),
        Command::Plan {
            manifest,
            observed,
            observations,
            json,
            detailed_exitcode,
            ignore_force,
        } => plan(
            &manifest,
            observed,
            observations.as_deref(),
            PlanOutput {
                json,
                detailed_exitcode,
            },
            ReconcilerConfig::new()
                .with_dry_run(true)
                .with_honor_force(!ignore_force),
        ),
    };

    match result {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            log_error!(codes::system::INTERNAL_ERROR, "Command failed", "error" => &e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Environment preferences with command line overrides applied
fn logging_preferences(cli: &Cli) -> LoggingPreferences {
    let mut preferences = LoggingPreferences::default();
    if cli.verbose {
        preferences = preferences.with_min_level(LogLevel::Debug);
    }
    if cli.structured_logs {
        preferences = preferences.with_structured(true);
    }
    preferences
}

/// `log` facade filter matching the service's minimum level
fn facade_filter(preferences: &LoggingPreferences) -> log::LevelFilter {
    preferences.min_log_level.to_facade_level().to_level_filter()
}

fn init_logging(preferences: &LoggingPreferences) -> Result<(), String> {
    // RUST_LOG, when set, still overrides the derived filter
    env_logger::Builder::new()
        .filter_level(facade_filter(preferences))
        .parse_env(env_logger::Env::default())
        .format_timestamp(None)
        .try_init()
        .map_err(|e| e.to_string())?;

    logging::init_global_logging_with_preferences(preferences)?;
    log::debug!(
        target: "rhsm_register_cli",
        "Logging ready at {:?}",
        preferences.min_log_level
    );
    Ok(())
}

fn validate(manifest: &Path, json: bool) -> Result<u8, Box<dyn std::error::Error>> {
    log_info!("Validating manifest", "path" => manifest.display());

    let resources = match load_manifest(manifest) {
        Ok(resources) => resources,
        Err(e) => {
            eprintln!("[FAIL] {}: {}", manifest.display(), e);
            return Ok(EXIT_FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(EXIT_SUCCESS);
    }

    for resource in &resources {
        let credentials = resource.credentials();
        let note = if credentials.is_usable() {
            String::new()
        } else {
            format!("  (warning: credentials {:?})", credentials)
        };
        println!(
            "  {} ensure={} force={}{}",
            resource.identifier(),
            resource.ensure(),
            resource.force(),
            note
        );
    }
    println!(
        "\n[OK] {}: {} resource(s) valid",
        manifest.display(),
        resources.len()
    );

    Ok(EXIT_SUCCESS)
}

fn describe(json: bool) -> Result<u8, Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(parameter_specs())?);
        return Ok(EXIT_SUCCESS);
    }

    println!("rhsm_register\n");
    println!("{}\n", RegistrationResource::DOC);
    println!("PARAMETERS:");
    for spec in parameter_specs() {
        let mut flags = Vec::new();
        if spec.namevar {
            flags.push("namevar".to_string());
        }
        if let Some(default) = spec.default {
            flags.push(format!("default: {}", default));
        }
        if let Some(rule) = spec.rule {
            flags.push(format!("rule: {}", rule));
        }

        println!("    {:<16} {}", spec.name, spec.description);
        if !flags.is_empty() {
            println!("    {:<16} [{}]", "", flags.join(", "));
        }
    }

    Ok(EXIT_SUCCESS)
}

#[derive(Debug, Clone, Copy, Default)]
struct PlanOutput {
    json: bool,
    detailed_exitcode: bool,
}

fn plan(
    manifest: &Path,
    observed: EnsureState,
    observations: Option<&Path>,
    output: PlanOutput,
    config: ReconcilerConfig,
) -> Result<u8, Box<dyn std::error::Error>> {
    let resources = match load_manifest(manifest) {
        Ok(resources) => resources,
        Err(e) => {
            eprintln!("[FAIL] {}: {}", manifest.display(), e);
            return Ok(EXIT_FAILURE);
        }
    };

    let mut provider = MemoryProvider::with_default_state(observed);
    if let Some(path) = observations {
        for (identifier, state) in load_observations(path)? {
            provider = provider.with_state(identifier, state);
        }
    }

    let reconciler = Reconciler::with_config(provider, config);
    let report = reconciler.reconcile_all(&resources);

    if output.json {
        println!("{}", report.to_json()?);
    } else {
        println!("Plan for {}:\n", manifest.display());
        println!("{}", report.format_text());
    }

    Ok(plan_exit_status(&report, output.detailed_exitcode))
}

/// Failures win over changes; changes only count with `--detailed-exitcode`
fn plan_exit_status(report: &ReconcileReport, detailed_exitcode: bool) -> u8 {
    if !report.is_success() {
        EXIT_FAILURE
    } else if detailed_exitcode && report.has_changes() {
        EXIT_CHANGES
    } else {
        EXIT_SUCCESS
    }
}
