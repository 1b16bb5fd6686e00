mod cli;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "boostc",
    version,
    about = "boostc: compiles XGBoost tree ensembles into standalone Rust"
)]
struct Cli {
    /// Debug logging for boostc (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an XGBoost JSON model to a Rust scoring module
    Build(cli::build::BuildArgs),
    /// Syntax-check a Rust source file
    Check(cli::check::CheckArgs),
    /// Summarize a model as it would be compiled
    Inspect(cli::inspect::InspectArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = boostc::logging::init(cli.verbose) {
        eprintln!("warning: {}", err);
    }

    match cli.command {
        Command::Build(args) => cli::build::cmd_build(args),
        Command::Check(args) => cli::check::cmd_check(args),
        Command::Inspect(args) => cli::inspect::cmd_inspect(args),
    }
}
