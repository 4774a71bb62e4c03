//! Stockroom command line client.

mod cli;
mod commands;
mod logging;
mod runtime;
#[cfg(test)]
mod test_backend;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use stockroom_infrastructure::ClientConfig;

use crate::cli::Cli;
use crate::runtime::Runtime;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }

    let runtime = Runtime::connect(config).await?;
    let mut events = runtime.session_events();
    let result = commands::execute(&runtime, cli.command).await;

    if runtime::session_was_forced_out(&mut events) {
        eprintln!("session expired, please log in");
    }

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
