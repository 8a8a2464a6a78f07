use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use ledger_admin::{execute, AdminConfig, Cli, Outcome};
use ledger_telemetry::{init_logging, TelemetryConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&TelemetryConfig::from_env()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::IntegrityViolated) => ExitCode::from(2),
        Err(e) => {
            error!("[admin] ❌ {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let mut config = AdminConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &config, cli.json, &mut out)
}
