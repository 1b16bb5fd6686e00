//! boostc compiles XGBoost tree ensembles into standalone Rust source.
//!
//! The pipeline decodes the JSON model document, rebuilds each tree from its
//! flat node arrays, truncates the ensemble at the best iteration, renders
//! every tree as nested conditionals, and finally parses the result to make
//! sure it is well-formed Rust before handing it back.

pub mod api;
pub mod codegen;
pub mod diagnostic;
pub mod error;
pub mod logging;
pub mod model;
pub mod span;
pub mod syntax;

pub use api::*;
pub use error::CompileError;
