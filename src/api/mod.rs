//! Public entry points: a model document in, checked Rust source out.
//!
//! Every entry point runs the same pipeline (decode, truncate and assemble,
//! emit, syntax check) and either returns the complete source text or an
//! error. Partial output is never returned.

use tracing::{debug, info};

use crate::codegen::{Emitter, RESERVED_NAMES};
use crate::error::CompileError;
use crate::model::{decode_document, Ensemble, RawEnsemble};
use crate::syntax;

pub use crate::codegen::{MissingValues, Precision};


/// Options controlling the shape of the generated module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name of the generated `pub mod`.
    pub namespace: String,
    /// Name of the public scoring function; tree functions are `{name}_tree_{i}`.
    pub function_name: String,
    pub precision: Precision,
    pub missing: MissingValues,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            namespace: "model".to_string(),
            function_name: "predict".to_string(),
            precision: Precision::default(),
            missing: MissingValues::default(),
        }
    }
}

impl CompileOptions {
    /// Names must be plain Rust identifiers that the generated module does not
    /// already define.
    pub fn validate(&self) -> Result<(), CompileError> {
        check_identifier("namespace", &self.namespace)?;
        check_identifier("function_name", &self.function_name)
    }

    fn emitter(&self, fingerprint: Option<String>) -> Emitter {
        Emitter::new(self.namespace.as_str(), self.function_name.as_str())
            .with_precision(self.precision)
            .with_missing(self.missing)
            .with_fingerprint(fingerprint)
    }
}

fn check_identifier(option: &'static str, name: &str) -> Result<(), CompileError> {
    if !syntax::is_identifier(name) {
        return Err(CompileError::InvalidOption {
            option,
            message: format!("`{name}` is not a valid Rust identifier"),
        });
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(CompileError::InvalidOption {
            option,
            message: format!("`{name}` clashes with a name the generated module defines"),
        });
    }
    Ok(())
}

/// Compile an XGBoost JSON model document to Rust source.
///
/// The header of the generated file records a BLAKE3 fingerprint of
/// `document`.
pub fn compile(document: &str, options: &CompileOptions) -> Result<String, CompileError> {
    options.validate()?;
    let ensemble = load_ensemble(document)?;
    emit_checked(&ensemble, options, Some(fingerprint(document)))
}

/// Compile an already decoded model.
pub fn compile_model(raw: &RawEnsemble, options: &CompileOptions) -> Result<String, CompileError> {
    options.validate()?;
    let ensemble = Ensemble::from_raw(raw)?;
    emit_checked(&ensemble, options, None)
}

/// Compile an assembled ensemble.
pub fn compile_ensemble(
    ensemble: &Ensemble,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    options.validate()?;
    emit_checked(ensemble, options, None)
}

/// Decode a model document and assemble its trees, truncated to the best
/// iteration.
pub fn load_ensemble(document: &str) -> Result<Ensemble, CompileError> {
    let raw = decode_document(document)?;
    info!(
        trees = raw.trees.len(),
        classes = raw.num_classes,
        best_iteration = ?raw.best_iteration,
        "decoded model document"
    );
    Ensemble::from_raw(&raw)
}

/// Hex BLAKE3 digest of the model document.
pub fn fingerprint(document: &str) -> String {
    blake3::hash(document.as_bytes()).to_hex().to_string()
}

/// Run the syntax check over generated text; the text is returned unchanged
/// when it parses.
pub fn check_generated(source: String) -> Result<String, CompileError> {
    match syntax::check(&source) {
        Ok(()) => Ok(source),
        Err(diagnostics) => Err(CompileError::Integrity {
            diagnostics,
            source_text: source,
        }),
    }
}

fn emit_checked(
    ensemble: &Ensemble,
    options: &CompileOptions,
    fingerprint: Option<String>,
) -> Result<String, CompileError> {
    emit_checked_with(ensemble, options, fingerprint, Emitter::emit_ensemble)
}

/// Emit with `emit` and gate the text on the syntax check. Nothing is
/// returned unless the text parses.
fn emit_checked_with<F>(
    ensemble: &Ensemble,
    options: &CompileOptions,
    fingerprint: Option<String>,
    emit: F,
) -> Result<String, CompileError>
where
    F: FnOnce(&Emitter, &Ensemble) -> String,
{
    let source = emit(&options.emitter(fingerprint), ensemble);
    debug!(bytes = source.len(), "emitted source");
    let source = check_generated(source)?;
    info!(
        trees = ensemble.trees().len(),
        classes = ensemble.num_classes(),
        namespace = %options.namespace,
        "generated scoring module"
    );
    Ok(source)
}
