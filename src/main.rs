use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

use outreach::Pipeline;
use outreach::config::Config;
use outreach::domain::{PipelineResult, RunFailure, TraceEvent};
use outreach::pipeline::{build_llm_client, build_sendgrid_transport};

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("outreach")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("outreach.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Commands::Send {
            brief,
            dry_run,
            json,
        }) => handle_send_command(brief, *dry_run, *json, config),
        Some(Commands::Agents) => handle_agents_command(config),
        Some(Commands::Check) => handle_check_command(config),
    }
}

fn handle_send_command(brief: &str, dry_run: bool, json: bool, config: &Config) -> Result<()> {
    info!("Sending outreach (dry_run: {})", dry_run);
    let pipeline = Pipeline::from_config(config, dry_run).context("Failed to build pipeline")?;

    if !json {
        println!("{} {}", "Brief:".cyan(), brief);
        if dry_run {
            println!("{}", "Dry run: nothing will be sent".yellow());
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let outcome = runtime.block_on(async {
        tokio::select! {
            result = pipeline.run(brief) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    });

    match outcome {
        None => {
            println!("{}", "Interrupted, run cancelled".yellow());
            Err(eyre!("Run interrupted"))
        }
        Some(Ok(result)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
                let usage = pipeline.total_usage();
                println!(
                    "{} {} input / {} output",
                    "Tokens:".cyan(),
                    usage.input_tokens,
                    usage.output_tokens
                );
            }
            if result.is_delivered() {
                Ok(())
            } else {
                Err(eyre!("Delivery failed: {}", result.delivery.detail))
            }
        }
        Some(Err(failure)) => {
            if json {
                let report = serde_json::json!({
                    "run_id": failure.run_id,
                    "stage": failure.stage(),
                    "error": failure.error.to_string(),
                    "trace": failure.trace,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_failure(&failure);
            }
            Err(eyre::Report::new(failure)).context("Outreach run failed")
        }
    }
}

fn print_result(result: &PipelineResult) {
    println!("{} {}", "Run:".cyan(), result.run_id);
    println!();
    println!("{}", "Drafts".bold());
    for draft in &result.drafts {
        let preview = draft
            .body
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        println!("  {:<13} {}", draft.author_style.to_string().green(), preview);
    }
    println!();
    println!("{} {}", "Selected:".cyan(), result.selected.author_style.to_string().green());
    println!("{} {}", "Why:".cyan(), result.rationale);
    println!("{} {}", "Subject:".cyan(), result.formatted.subject);
    println!();

    if result.is_delivered() {
        println!("{} {}", "Delivered:".green().bold(), result.delivery.detail);
    } else {
        println!("{} {}", "Not delivered:".red().bold(), result.delivery.detail);
    }
    print_trace(result.trace.events());
}

fn print_failure(failure: &RunFailure) {
    println!("{} {}", "Run:".cyan(), failure.run_id);
    println!("{} [{}] {}", "Failed:".red().bold(), failure.stage(), failure.error);
    print_trace(failure.trace.events());
}

fn print_trace(events: &[TraceEvent]) {
    if events.is_empty() {
        return;
    }
    println!();
    println!("{}", "Trace".bold());
    for event in events {
        let mark = if event.ok { "ok".green() } else { "failed".red() };
        println!(
            "  {:>2} {:<9} {:<16} {:>6}ms {}",
            event.seq,
            format!("{:?}", event.kind).to_lowercase(),
            event.name,
            event.duration_ms,
            mark
        );
    }
}

fn handle_agents_command(config: &Config) -> Result<()> {
    info!("Listing agents");
    // Offline roster: mock client and dry-run transport, nothing is called
    let pipeline = Pipeline::from_parts(
        config,
        std::sync::Arc::new(outreach::llm::MockLlmClient::fixed("")),
        std::sync::Arc::new(outreach::delivery::DryRunTransport),
    )
    .context("Failed to build pipeline")?;

    let sales = pipeline.sales_manager();
    println!("{} ({})", "Sales Manager".bold(), config.company.name);
    println!("  selection policy: {}", sales.policy_name().green());
    for def in sales.drafters().definitions() {
        println!("  {:<16} {}", def.name.cyan(), def.description);
    }
    println!("{}", "Email Manager".bold());
    for def in sales.email_manager().tools().definitions() {
        println!("  {:<16} {}", def.name.cyan(), def.description);
    }
    Ok(())
}

fn handle_check_command(config: &Config) -> Result<()> {
    info!("Checking configuration");
    let key_status = |env_var: &str| match std::env::var(env_var) {
        Ok(v) if !v.trim().is_empty() => "set".green(),
        _ => "missing".red(),
    };

    println!("{}", "LLM".bold());
    println!("  provider: {:?}", config.llm.provider);
    println!("  model:    {}", config.llm.effective_model());
    let llm_env = config.llm.provider.api_key_env();
    println!("  {}: {}", llm_env, key_status(llm_env));

    println!("{}", "Email".bold());
    println!("  from:     {}", config.email.from);
    println!("  to:       {}", config.email.to);
    println!("  endpoint: {}", config.email.endpoint);
    println!("  {}: {}", config.email.api_key_env, key_status(&config.email.api_key_env));

    println!("{}", "Pipeline".bold());
    println!("  selection:  {:?}", config.selection.policy);
    println!("  html mode:  {:?}", config.formatting.html_mode);

    let llm_ready = build_llm_client(&config.llm).map(|c| c.is_ready()).unwrap_or(false);
    let email_ready = build_sendgrid_transport(config)
        .map(|t| outreach::delivery::EmailTransport::is_configured(&t))
        .unwrap_or(false);

    if llm_ready && email_ready {
        println!("{}", "Ready to send".green().bold());
        Ok(())
    } else {
        println!("{}", "Not ready: see missing keys above".yellow().bold());
        Err(eyre!("Configuration incomplete"))
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging before anything else logs
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
