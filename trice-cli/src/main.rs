//! trice — trace ID list maintenance CLI.
//!
//! # Usage
//!
//! ```text
//! trice update [--src <dir>] [--list <file>] [--dry-run] [--reuse-removed]
//! trice check [--list <file>] [--active] [--json]
//! trice lookup <ID>... [--list <file>]
//! trice zero --src <dir> [--dry-run]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, lookup::LookupArgs, update::UpdateArgs, zero::ZeroArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "trice",
    version,
    about = "Assign trace IDs in C sources and maintain the ID list",
    long_about = None,
)]
struct Cli {
    /// Log progress to stderr (same as RUST_LOG=info).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile source tree call sites with the ID list and write IDs back.
    #[command(visible_aliases = ["upd", "u"])]
    Update(UpdateArgs),

    /// Print the ID list.
    Check(CheckArgs),

    /// Resolve IDs against the ID list.
    #[command(visible_alias = "l")]
    Lookup(LookupArgs),

    /// Reset every call site ID in a source tree to Id(0).
    #[command(alias = "zeroSourceTreeIds")]
    Zero(ZeroArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Update(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Lookup(args) => args.run(),
        Commands::Zero(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
