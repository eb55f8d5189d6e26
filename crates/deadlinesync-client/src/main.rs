//! deadlinesync CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use deadlinesync_core::{TracingConfig, TracingOutputFormat, init_tracing};

use deadlinesync_client::cli::{Cli, Command, ConfigAction};
use deadlinesync_client::commands;
use deadlinesync_client::config::ClientConfig;
use deadlinesync_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(debug: bool, json: bool) {
    let mut tracing = if debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if json {
        tracing = tracing.with_format(TracingOutputFormat::Json);
    }
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)?
    } else {
        ClientConfig::load()?
    };

    setup_tracing(cli.debug || config.debug, cli.log_json);

    let now = chrono::Local::now().naive_local();

    match cli.command {
        Command::ScanFile {
            path,
            course,
            raw,
            json,
        } => commands::scan::run(&path, &course, raw, json, now),
        Command::Courses { json } => commands::canvas::courses(&config, json).await,
        Command::Deadlines { collect, json } => {
            commands::canvas::deadlines(&config, &collect, json, now).await
        }
        Command::Sync {
            collect,
            ics,
            dry_run,
        } => commands::sync::run(&config, &collect, ics, dry_run, now).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config, &config_path),
        },
    }
}
