//! The model side of the compiler: decoding the serialized document,
//! rebuilding trees from their flat arrays, and truncating the ensemble.

mod decode;
mod ensemble;
mod tree;

pub use decode::decode_document;
pub use ensemble::{kept_tree_count, Ensemble, RawEnsemble};
pub use tree::{assemble, Decision, Node, NodeKind, RawTree, Tree, NO_CHILD};
