use std::path::PathBuf;

use clap::Args;

use boostc::diagnostic::render_diagnostics;

use super::{exit_with, read_input, CliError};

#[derive(Args)]
pub struct CheckArgs {
    /// Rust source file to check
    pub input: PathBuf,
}

pub fn cmd_check(args: CheckArgs) {
    match check(&args) {
        Ok(()) => eprintln!("OK: {}", args.input.display()),
        Err(err) => exit_with(err),
    }
}

/// Syntax-check a source file, rendering any diagnostics.
pub fn check(args: &CheckArgs) -> Result<(), CliError> {
    let source = read_input(&args.input)?;
    if let Err(diagnostics) = boostc::syntax::check(&source) {
        let filename = args.input.display().to_string();
        render_diagnostics(&diagnostics, &filename, &source);
        return Err(CliError::Syntax {
            path: args.input.clone(),
            count: diagnostics.len(),
        });
    }
    Ok(())
}
