//! Binary decision trees rebuilt from XGBoost's flat node arrays.

use tracing::debug;

use crate::error::CompileError;

/// Child index marking "no child" in the flat arrays.
pub const NO_CHILD: i64 = -1;

/// One tree as serialized: parallel arrays indexed by node id, node 0 is the root.
///
/// `split_conditions` holds the threshold on decision nodes and the leaf
/// weight on leaves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTree {
    pub left_children: Vec<i64>,
    pub right_children: Vec<i64>,
    pub split_indices: Vec<i64>,
    pub split_conditions: Vec<f64>,
    pub default_left: Vec<bool>,
}

impl RawTree {
    pub fn num_nodes(&self) -> usize {
        self.left_children.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Index of the node in the serialized arrays.
    pub id: usize,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Leaf { weight: f64 },
    Decision(Decision),
}

/// Go left when `features[feature] < threshold`, or when the feature is
/// missing and `default_left` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub feature: usize,
    pub threshold: f64,
    pub default_left: bool,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Node {
    pub fn leaf(id: usize, weight: f64) -> Self {
        Node {
            id,
            kind: NodeKind::Leaf { weight },
        }
    }

    pub fn decision(
        id: usize,
        feature: usize,
        threshold: f64,
        default_left: bool,
        left: Node,
        right: Node,
    ) -> Self {
        Node {
            id,
            kind: NodeKind::Decision(Decision {
                feature,
                threshold,
                default_left,
                left: Box::new(left),
                right: Box::new(right),
            }),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Number of decision nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match &node.kind {
                NodeKind::Leaf { .. } => deepest = deepest.max(depth),
                NodeKind::Decision(d) => {
                    stack.push((&d.left, depth + 1));
                    stack.push((&d.right, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.kind {
                NodeKind::Leaf { .. } => leaves += 1,
                NodeKind::Decision(d) => {
                    stack.push(&d.left);
                    stack.push(&d.right);
                }
            }
        }
        leaves
    }
}

// The derived drop would recurse once per level; unlink children onto a heap
// stack instead.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        detach_children(&mut self.kind, &mut stack);
        while let Some(mut node) = stack.pop() {
            detach_children(&mut node.kind, &mut stack);
        }
    }
}

fn detach_children(kind: &mut NodeKind, stack: &mut Vec<Node>) {
    if let NodeKind::Decision(decision) = std::mem::replace(kind, NodeKind::Leaf { weight: 0.0 }) {
        stack.push(*decision.left);
        stack.push(*decision.right);
    }
}

/// An assembled ensemble member.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    /// Position in the ensemble (boosting order).
    pub position: usize,
    /// Output slot this tree contributes to; 0 for single-output models.
    pub class_index: usize,
    pub root: Node,
}

/// Rebuild the tree rooted at node 0 of `raw`.
///
/// `position` only labels errors. Every node reachable from the root must be
/// claimed by exactly one parent; nodes the root cannot reach are dropped.
pub fn assemble(raw: &RawTree, position: usize) -> Result<Node, CompileError> {
    let n = raw.num_nodes();
    if n == 0 {
        return Err(CompileError::decode_in_tree(
            "num_nodes",
            position,
            "tree has no nodes",
        ));
    }
    check_len("right_children", raw.right_children.len(), n, position)?;
    check_len("split_indices", raw.split_indices.len(), n, position)?;
    check_len("split_conditions", raw.split_conditions.len(), n, position)?;
    check_len("default_left", raw.default_left.len(), n, position)?;

    // Walk down from the root, giving every child a single owner. A second
    // claim means a shared subtree or a cycle.
    let mut claimed = vec![false; n];
    claimed[0] = true;
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![0usize];
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some((left, right)) = children(raw, position, id)? {
            for child in [left, right] {
                if claimed[child] {
                    return Err(CompileError::structural(
                        position,
                        id,
                        format!("node {child} is already reachable through another parent"),
                    ));
                }
                claimed[child] = true;
                stack.push(child);
            }
        }
    }

    if order.len() < n {
        debug!(
            tree = position,
            skipped = n - order.len(),
            "skipping nodes unreachable from the root"
        );
    }

    // Parents precede their children in `order`, so walking it backwards
    // builds every subtree before the node that owns it.
    let mut built: Vec<Option<Node>> = (0..n).map(|_| None).collect();
    for &id in order.iter().rev() {
        let node = match children(raw, position, id)? {
            None => Node::leaf(id, raw.split_conditions[id]),
            Some((left, right)) => {
                let feature = usize::try_from(raw.split_indices[id]).map_err(|_| {
                    CompileError::structural(
                        position,
                        id,
                        format!("negative split feature index {}", raw.split_indices[id]),
                    )
                })?;
                let left = take_built(&mut built, left, position, id)?;
                let right = take_built(&mut built, right, position, id)?;
                Node::decision(
                    id,
                    feature,
                    raw.split_conditions[id],
                    raw.default_left[id],
                    left,
                    right,
                )
            }
        };
        built[id] = Some(node);
    }

    take_built(&mut built, 0, position, 0)
}

fn check_len(field: &'static str, len: usize, expected: usize, tree: usize) -> Result<(), CompileError> {
    if len == expected {
        Ok(())
    } else {
        Err(CompileError::decode_in_tree(
            field,
            tree,
            format!("expected {expected} entries, found {len}"),
        ))
    }
}

/// `None` for a leaf, both child indices for a decision node.
fn children(raw: &RawTree, tree: usize, id: usize) -> Result<Option<(usize, usize)>, CompileError> {
    let left = raw.left_children[id];
    let right = raw.right_children[id];
    match (left == NO_CHILD, right == NO_CHILD) {
        (true, true) => Ok(None),
        (true, false) => Err(CompileError::structural(
            tree,
            id,
            format!("left child is missing but right child is {right}"),
        )),
        (false, true) => Err(CompileError::structural(
            tree,
            id,
            format!("right child is missing but left child is {left}"),
        )),
        (false, false) => {
            let n = raw.num_nodes();
            let resolve = |child: i64| {
                usize::try_from(child)
                    .ok()
                    .filter(|&c| c < n)
                    .ok_or_else(|| {
                        CompileError::structural(
                            tree,
                            id,
                            format!("child index {child} is out of range for {n} nodes"),
                        )
                    })
            };
            Ok(Some((resolve(left)?, resolve(right)?)))
        }
    }
}

fn take_built(
    built: &mut [Option<Node>],
    id: usize,
    tree: usize,
    parent: usize,
) -> Result<Node, CompileError> {
    built[id].take().ok_or_else(|| {
        CompileError::structural(tree, parent, format!("node {id} was not assembled"))
    })
}
