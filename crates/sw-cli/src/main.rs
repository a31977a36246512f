//! Stepwise CLI - numbered SQL migrations with a transactional changelog

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{down, generate, init, status, up};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => std::process::ExitCode::from(*code as u8),
            None => {
                eprintln!("Error: {err:?}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Init => init::execute(&cli.global).await,
        cli::Commands::Generate(args) => generate::execute(args, &cli.global).await,
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Down(args) => down::execute(args, &cli.global).await,
    }
}

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise.
///
/// `--verbose` only echoes executed SQL on stdout; it does not change the
/// log level.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}
