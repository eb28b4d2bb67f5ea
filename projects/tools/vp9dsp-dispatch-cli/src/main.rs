#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(FromArgs, Debug)]
/// Inspect VP9 DSP kernel selection for RISC-V processors
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Detect(commands::detect::DetectCmd),
    Dump(commands::dump::DumpCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    // Selection events are logged at debug level; RUST_LOG=debug shows them.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Detect(cmd) => {
            commands::detect::handle_detect_command(cmd)?;
        }
        Commands::Dump(cmd) => {
            commands::dump::handle_dump_command(cmd)?;
        }
    }

    Ok(())
}
