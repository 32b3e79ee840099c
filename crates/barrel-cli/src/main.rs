use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "barrel", version, about = "Partner volume allocation against a terminal measurement")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate a period's terminal volume and print the hash-stamped report
    Allocate {
        /// Period file: {"entries": [...], "terminal": {...}}
        #[arg(long)]
        input: PathBuf,
        /// TOML engine configuration (defaults to $BARREL_CONFIG_PATH or barrel.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Preview the correction chain for every entry in a period file
    NetVolume {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the canonical SHA-256 of a JSON document
    Hash {
        #[arg(long)]
        input: PathBuf,
    },
    /// Check a JSON document against an expected SHA-256
    Verify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        hash: String,
    },
}

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("barrel=info"));
    let builder =
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting barrel");

    match cli.command {
        Command::Allocate { input, config, pretty } => {
            commands::allocate(&input, config.as_deref(), pretty)
        }
        Command::NetVolume { input, config } => commands::net_volume(&input, config.as_deref()),
        Command::Hash { input } => commands::hash(&input),
        Command::Verify { input, hash } => commands::verify(&input, &hash),
    }
}
