pub mod build;
pub mod check;
pub mod inspect;

use std::path::{Path, PathBuf};
use std::process;

use boostc::diagnostic::render_diagnostics;
use boostc::CompileError;

/// Failure of a `boostc` subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{count} syntax error(s) in '{}'", .path.display())]
    Syntax { path: PathBuf, count: usize },
    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Report `err` on stderr and exit with status 1.
///
/// Generated-source diagnostics are rendered against the rejected text so the
/// defect can be located.
pub fn exit_with(err: CliError) -> ! {
    if let CliError::Compile(CompileError::Integrity {
        diagnostics,
        source_text,
    }) = &err
    {
        render_diagnostics(diagnostics, "<generated>", source_text);
    }
    eprintln!("error: {}", err);
    process::exit(1);
}
