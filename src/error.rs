//! Error taxonomy for a compile invocation.
//!
//! Errors are ordered by the stage that detects them: decoding the model
//! document, assembling trees, and finally checking the generated source.
//! Every variant carries enough context (field, tree, node) to locate the
//! problem without re-running the compile.

use thiserror::Error;

use crate::diagnostic::Diagnostic;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The model document is not valid JSON or does not have the expected shape.
    #[error("failed to decode model document: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    /// A field is missing, unparseable, or inconsistent with its siblings.
    #[error("invalid field `{field}`{}: {message}", tree_suffix(.tree))]
    Decode {
        field: &'static str,
        tree: Option<usize>,
        message: String,
    },
    /// A tree violates the binary-tree invariants.
    #[error("malformed tree {tree} at node {node}: {message}")]
    Structural {
        tree: usize,
        node: usize,
        message: String,
    },
    /// The emitted source failed the syntax check. This is a generator defect.
    #[error(
        "internal code generation error: generated source failed to parse ({} diagnostic(s), first: {})",
        .diagnostics.len(),
        first_message(.diagnostics)
    )]
    Integrity {
        diagnostics: Vec<Diagnostic>,
        source_text: String,
    },
    /// A compile option has an unusable value.
    #[error("invalid option `{option}`: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },
}

impl CompileError {
    pub(crate) fn decode(field: &'static str, message: impl Into<String>) -> Self {
        CompileError::Decode {
            field,
            tree: None,
            message: message.into(),
        }
    }

    pub(crate) fn decode_in_tree(
        field: &'static str,
        tree: usize,
        message: impl Into<String>,
    ) -> Self {
        CompileError::Decode {
            field,
            tree: Some(tree),
            message: message.into(),
        }
    }

    pub(crate) fn structural(tree: usize, node: usize, message: impl Into<String>) -> Self {
        CompileError::Structural {
            tree,
            node,
            message: message.into(),
        }
    }

    /// True for errors caused by the input model rather than by the generator.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CompileError::Json { .. } | CompileError::Decode { .. } | CompileError::Structural { .. }
        )
    }
}

fn tree_suffix(tree: &Option<usize>) -> String {
    match tree {
        Some(index) => format!(" in tree {index}"),
        None => String::new(),
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none".to_string())
}
