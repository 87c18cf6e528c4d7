use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use greenlight_lib::api::{server, ApiContext};
use greenlight_lib::config::{self, AuditConfig};
use greenlight_lib::pipeline::audit::{audit_document, AuditOutcome};
use greenlight_lib::pipeline::extraction::ReportExtractor;
use greenlight_lib::pipeline::setup::build_capabilities;

const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[derive(Parser, Debug)]
#[command(name = "greenlight", version, about = "ESG report compliance auditor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit one report (PDF or plain text) and print the findings.
    Audit {
        path: PathBuf,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Serve the HTTP API.
    Serve {
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
}

fn main() -> ExitCode {
    greenlight_lib::init_tracing();
    let cli = Cli::parse();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = match AuditConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Blocking HTTP clients are built here, outside any async runtime.
    let auditor = match build_capabilities(&config) {
        Ok(auditor) => auditor,
        Err(e) => {
            eprintln!("Setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Audit { path, json } => {
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("Could not read {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            };
            let outcome = audit_document(&ReportExtractor::new(), &auditor, &bytes);
            print_outcome(&outcome, json);
            ExitCode::SUCCESS
        }
        Commands::Serve { addr } => {
            let ctx = ApiContext::new(auditor);
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Could not start async runtime: {e}");
                    return ExitCode::FAILURE;
                }
            };
            // `ctx` outlives the runtime so the blocking clients drop on this thread.
            let result = runtime.block_on(server::run_until_ctrl_c(addr, ctx.clone()));
            drop(runtime);
            match result {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn print_outcome(outcome: &AuditOutcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Could not serialize outcome: {e}"),
        }
        return;
    }

    if let Some(error) = &outcome.error {
        println!("An error occurred during the audit: {error}");
        return;
    }

    if outcome.findings.is_empty() {
        println!("Warning: the audit completed but produced no findings.");
        return;
    }

    println!("## Audit Report\n");
    for line in outcome.finding_lines() {
        println!("- {line}\n");
    }

    let errors = outcome.error_finding_count();
    if errors > 0 {
        println!(
            "{errors} of {} topics could not be assessed.",
            outcome.findings.len()
        );
    }
}
