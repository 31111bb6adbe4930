pub mod assistant;
pub mod commands;
pub mod config;
pub mod doc_processor;
pub mod llm;
pub mod session;
pub mod shell;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use shell::{Cli, Command};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let secrets = match config::load_secrets(&cli.config.secrets) {
        Ok(secrets) => secrets,
        Err(e) => {
            warn!(error = %e, "ignoring secrets file");
            None
        }
    };
    let settings = config::Settings::resolve(&cli.config, secrets);
    debug!(base_url = %settings.base_url, model = %settings.model, "settings resolved");

    let assistant = match settings.build_assistant() {
        Ok(assistant) => assistant,
        Err(e) => {
            eprintln!("error: failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async {
        match cli.command {
            None => shell::interactive(&settings, &assistant, None).await,
            Some(Command::Chat { pdf }) => {
                shell::interactive(&settings, &assistant, pdf.as_deref()).await
            }
            Some(Command::Analyze { pdf }) => shell::analyze_once(&assistant, &pdf).await,
            Some(Command::Ask { pdf, question }) => {
                shell::ask_once(&assistant, &pdf, &question).await
            }
        }
    })
}
