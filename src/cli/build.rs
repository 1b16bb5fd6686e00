use std::path::PathBuf;

use clap::Args;

use boostc::{CompileOptions, MissingValues, Precision};

use super::{exit_with, read_input, CliError};

#[derive(Args)]
pub struct BuildArgs {
    /// XGBoost model saved as JSON
    pub input: PathBuf,
    /// Output .rs file (default: <input>.rs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Name of the generated module
    #[arg(long, default_value = "model")]
    pub namespace: String,
    /// Name of the generated scoring function
    #[arg(long = "function", default_value = "predict")]
    pub function_name: String,
    /// Float type of the generated code (f32 or f64)
    #[arg(long, default_value = "f32")]
    pub precision: Precision,
    /// How callers mark missing features (nan or option)
    #[arg(long, default_value = "nan")]
    pub missing: MissingValues,
}

impl BuildArgs {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            namespace: self.namespace.clone(),
            function_name: self.function_name.clone(),
            precision: self.precision,
            missing: self.missing,
        }
    }
}

pub fn cmd_build(args: BuildArgs) {
    match build(&args) {
        Ok(out_path) => eprintln!("Compiled -> {}", out_path.display()),
        Err(err) => exit_with(err),
    }
}

/// Compile the model and write the source; returns the output path.
pub fn build(args: &BuildArgs) -> Result<PathBuf, CliError> {
    let document = read_input(&args.input)?;
    let source = boostc::compile(&document, &args.options())?;

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("rs"));
    std::fs::write(&out_path, source).map_err(|source| CliError::Write {
        path: out_path.clone(),
        source,
    })?;
    Ok(out_path)
}
