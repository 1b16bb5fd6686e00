use tracing::debug;

use super::tree::{assemble, RawTree, Tree};
use crate::error::CompileError;

/// Decoded model before assembly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEnsemble {
    pub trees: Vec<RawTree>,
    /// Output class of each tree, aligned with `trees`.
    pub tree_info: Vec<i64>,
    /// Zero-based index of the last boosting round to keep.
    pub best_iteration: Option<i64>,
    pub base_score: f64,
    pub num_classes: usize,
    pub num_features: Option<usize>,
}

/// Assembled, truncated trees plus the model-level constants emitted with them.
#[derive(Clone, Debug, PartialEq)]
pub struct Ensemble {
    trees: Vec<Tree>,
    base_score: f64,
    num_classes: usize,
    num_features: Option<usize>,
}

impl Ensemble {
    /// Every tree must target a class below `num_classes`.
    pub fn new(
        trees: Vec<Tree>,
        base_score: f64,
        num_classes: usize,
        num_features: Option<usize>,
    ) -> Result<Self, CompileError> {
        if num_classes == 0 {
            return Err(CompileError::decode(
                "num_class",
                "an ensemble needs at least one output class",
            ));
        }
        if let Some(tree) = trees.iter().find(|t| t.class_index >= num_classes) {
            return Err(CompileError::structural(
                tree.position,
                tree.root.id,
                format!(
                    "class index {} is out of range for {} output class(es)",
                    tree.class_index, num_classes
                ),
            ));
        }
        Ok(Ensemble {
            trees,
            base_score,
            num_classes,
            num_features,
        })
    }

    /// Truncate to the best iteration, then assemble each remaining tree.
    pub fn from_raw(raw: &RawEnsemble) -> Result<Self, CompileError> {
        if raw.tree_info.len() < raw.trees.len() {
            return Err(CompileError::decode(
                "tree_info",
                format!(
                    "expected a class for each of {} trees, found {}",
                    raw.trees.len(),
                    raw.tree_info.len()
                ),
            ));
        }

        let kept = kept_tree_count(raw.best_iteration, raw.trees.len())?;
        if kept < raw.trees.len() {
            debug!(
                kept,
                dropped = raw.trees.len() - kept,
                "truncating ensemble at best iteration"
            );
        }

        let mut trees = Vec::with_capacity(kept);
        for (position, raw_tree) in raw.trees[..kept].iter().enumerate() {
            let class_index = usize::try_from(raw.tree_info[position]).map_err(|_| {
                CompileError::structural(
                    position,
                    0,
                    format!("negative class index {}", raw.tree_info[position]),
                )
            })?;
            let root = assemble(raw_tree, position)?;
            debug!(
                tree = position,
                class = class_index,
                depth = root.depth(),
                leaves = root.leaf_count(),
                "assembled tree"
            );
            trees.push(Tree {
                position,
                class_index,
                root,
            });
        }

        Ensemble::new(trees, raw.base_score, raw.num_classes, raw.num_features)
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn num_features(&self) -> Option<usize> {
        self.num_features
    }

    pub fn is_multiclass(&self) -> bool {
        self.num_classes > 1
    }

    /// Number of trees contributing to `class`.
    pub fn trees_for_class(&self, class: usize) -> usize {
        self.trees.iter().filter(|t| t.class_index == class).count()
    }
}

/// Trees kept for a best-iteration marker: `k + 1` for `Some(k)`, all otherwise.
pub fn kept_tree_count(best_iteration: Option<i64>, available: usize) -> Result<usize, CompileError> {
    let Some(k) = best_iteration else {
        return Ok(available);
    };
    let kept = usize::try_from(k)
        .ok()
        .and_then(|k| k.checked_add(1))
        .ok_or_else(|| {
            CompileError::decode("best_iteration", format!("must not be negative, found {k}"))
        })?;
    if kept > available {
        return Err(CompileError::decode(
            "best_iteration",
            format!("best iteration {k} needs {kept} trees but the model has {available}"),
        ));
    }
    Ok(kept)
}
