//! doccache - A local disk-backed documentation cache
//!
//! CLI entry point. Store commands run synchronously; `serve` starts a tokio
//! runtime for the HTTP surface.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doccache::cli::{Cli, Command};
use doccache::commands;
use doccache::config::Config;
use doccache::server;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only status lines.
    // Defaults can be overridden with the RUST_LOG env var
    let default_filter = match cli.command {
        Command::Serve { .. } => "doccache=info,tower_http=info",
        _ => "doccache=warn",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    let result = match &cli.command {
        Command::Serve { .. } => run_server(config).map(|()| ExitCode::SUCCESS),
        command => commands::execute(
            command,
            cli.mode,
            &config,
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
        )
        .map(ExitCode::from),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_server(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config))
}
