use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use loadspread_config::{ConfigLoader, LoadspreadConfig, ResponseEncoding};
use loadspread_core::{
    CapacityCommand, CapacityController, Measurement, ProbeError, RoundRunner, ScalingExperiment,
    ScalingPlan,
};
use loadspread_http::HttpManager;
use loadspread_logging::{init_logging_from_config, init_simple_tracing};
use loadspread_output::FilesystemSink;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

mod cli;
mod render;

use cli::{Cli, Commands, ConfigCommands};
use render::{format_aborted_run, format_distribution, format_empty_round, format_replicas, format_series};

/// Warning for a `--config` path that does not exist
fn config_fallback_warning(path: &Path) -> Option<String> {
    if path.exists() {
        None
    } else {
        Some(format!("Configuration file not found: {:?}. Using defaults.", path))
    }
}

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<LoadspreadConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => match config_fallback_warning(path) {
            None => {
                info!("Loading configuration from: {:?}", path);
                loader
                    .from_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))
            }
            Some(warning) => {
                // Tracing may not be installed yet
                eprintln!("{} {}", "warning:".yellow().bold(), warning);
                warn!("{}", warning);
                loader
                    .from_env()
                    .context("Failed to load configuration from environment")
            }
        },
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

fn http_client(config: &LoadspreadConfig) -> Result<Arc<HttpManager>> {
    let manager =
        HttpManager::with_config(config.http.clone().into()).context("Failed to build HTTP client")?;
    Ok(Arc::new(manager))
}

struct MeasureOverrides {
    target: Option<String>,
    requests: Option<usize>,
    encoding: Option<ResponseEncoding>,
    concurrency: Option<usize>,
    timeout_ms: Option<u64>,
    output: Option<String>,
}

async fn measure_command(mut config: LoadspreadConfig, overrides: MeasureOverrides) -> Result<()> {
    if let Some(target) = overrides.target {
        config.probe.target_url = target;
    }
    if let Some(requests) = overrides.requests {
        config.probe.batch_size = requests;
    }
    if let Some(encoding) = overrides.encoding {
        config.probe.encoding = encoding;
    }
    if overrides.concurrency.is_some() {
        config.probe.concurrency_limit = overrides.concurrency;
    }
    if let Some(ms) = overrides.timeout_ms {
        config.probe.request_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(output) = overrides.output {
        config.report.directory = output;
    }
    config.validate_all().context("Invalid measurement settings")?;

    let runner = RoundRunner::from_config(http_client(&config)?, &config.probe, config.http.timeout);
    let measurement = Measurement::new(
        runner,
        config.probe.target_url.clone(),
        config.probe.batch_size,
        Box::new(FilesystemSink::distribution(&config.report)),
    );

    info!(
        "Sending {} requests to {}",
        config.probe.batch_size, config.probe.target_url
    );
    let summary = match measurement.measure().await {
        Ok(summary) => summary,
        Err(ProbeError::EmptyResultSet {
            attempted,
            failed,
            unparsed,
        }) => {
            println!("{}", format_empty_round(attempted, failed, unparsed));
            return Err(ProbeError::EmptyResultSet {
                attempted,
                failed,
                unparsed,
            })
            .context("Measurement failed");
        }
        Err(e) => return Err(e).context("Measurement failed"),
    };

    println!("{}", format_distribution(&summary));

    let receipt = measurement
        .report(&summary)
        .await
        .context("Failed to write distribution chart")?;
    println!("📊 Chart written to {}", receipt.path.display());
    Ok(())
}

struct ScaleOverrides {
    control: Option<String>,
    target: Option<String>,
    min: Option<u32>,
    max: Option<u32>,
    requests: Option<usize>,
    output: Option<String>,
}

async fn scale_command(mut config: LoadspreadConfig, overrides: ScaleOverrides) -> Result<()> {
    if let Some(control) = overrides.control {
        config.scaling.control_url = control;
    }
    if let Some(target) = overrides.target {
        config.probe.target_url = target;
    }
    if let Some(min) = overrides.min {
        config.scaling.min_servers = min;
    }
    if let Some(max) = overrides.max {
        config.scaling.max_servers = max;
    }
    if overrides.requests.is_some() {
        config.scaling.batch_size = overrides.requests;
    }
    if let Some(output) = overrides.output {
        config.report.directory = output;
    }
    config.validate_all().context("Invalid scaling settings")?;

    let http = http_client(&config)?;
    let plan = ScalingPlan::from_config(&config.scaling, &config.probe)?;
    info!(
        "Scaling from {} to {} servers with {} requests per round",
        config.scaling.min_servers,
        config.scaling.max_servers,
        plan.requests()
    );

    let experiment = ScalingExperiment::new(
        CapacityController::new(Arc::clone(&http), &config.scaling),
        RoundRunner::from_config(http, &config.probe, config.http.timeout),
        config.probe.target_url.clone(),
        plan,
        Box::new(FilesystemSink::series(&config.report)),
    );

    match experiment.run().await {
        Ok(series) => {
            println!("{}", "Scaling run complete".green().bold());
            println!("{}", format_series(&series));
            Ok(())
        }
        Err(e) => {
            println!("{}", format_aborted_run(&e));
            Err(e).context("Scaling experiment failed")
        }
    }
}

async fn capacity_command(config: &LoadspreadConfig, command: CapacityCommand, add: bool) -> Result<()> {
    let controller = CapacityController::new(http_client(config)?, &config.scaling);
    let status = if add {
        controller.add_servers(&command).await
    } else {
        controller.remove_servers(&command).await
    }
    .context("Capacity change was not acknowledged")?;

    println!(
        "✅ {} {} server(s)",
        if add { "Added" } else { "Removed" },
        command.unit_count
    );
    if let Some(status) = status {
        println!("{}", format_replicas(&status));
    }
    Ok(())
}

/// Handle configuration validation
fn handle_config_validate(config_file: &PathBuf) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match load_config(Some(config_file)) {
        Ok(_config) => {
            println!("✅ Configuration file is valid");
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Handle configuration generation
fn handle_config_generate(output: &PathBuf, force: bool) -> Result<()> {
    info!("Generating sample configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, LoadspreadConfig::generate_sample())
        .context("Failed to write configuration file")?;

    println!("✅ Sample configuration generated at: {:?}", output);
    println!(
        "🔧 Validate with: loadspread config validate --config-file {:?}",
        output
    );
    Ok(())
}

/// Handle configuration display
fn handle_config_show(config: &LoadspreadConfig, format: &str) -> Result<()> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => {
            let yaml = serde_yaml::to_string(config).context("Failed to serialize to YAML")?;
            println!("{}", yaml);
        }
        "json" => {
            let json =
                serde_json::to_string_pretty(config).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown output format: {}. Valid formats: yaml, json",
                format
            ));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit level can be installed before the configuration is read
    if let Some(level) = cli.log_level.as_deref() {
        init_simple_tracing(level)?;
    }
    let config = load_config(cli.config.as_ref())?;
    if cli.log_level.is_none() {
        init_logging_from_config(&config.logging)?;
    }
    debug!("loadspread starting");

    match cli.command {
        Commands::Measure {
            target,
            requests,
            encoding,
            concurrency,
            timeout_ms,
            output,
        } => {
            measure_command(
                config,
                MeasureOverrides {
                    target,
                    requests,
                    encoding,
                    concurrency,
                    timeout_ms,
                    output,
                },
            )
            .await
        }
        Commands::Scale {
            control,
            target,
            min,
            max,
            requests,
            output,
        } => {
            scale_command(
                config,
                ScaleOverrides {
                    control,
                    target,
                    min,
                    max,
                    requests,
                    output,
                },
            )
            .await
        }
        Commands::Replicas => {
            let controller = CapacityController::new(http_client(&config)?, &config.scaling);
            let status = controller
                .replicas()
                .await
                .context("Failed to read replica set")?;
            println!("{}", format_replicas(&status));
            Ok(())
        }
        Commands::Add { count, hostnames } => {
            capacity_command(&config, CapacityCommand::new(count, hostnames), true).await
        }
        Commands::Remove { count, hostnames } => {
            capacity_command(&config, CapacityCommand::new(count, hostnames), false).await
        }
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Validate { config_file } => handle_config_validate(&config_file),
            ConfigCommands::Generate { output, force } => handle_config_generate(&output, force),
            ConfigCommands::Show { format } => handle_config_show(&config, &format),
        },
    }
}
