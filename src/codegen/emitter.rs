use super::{float_literal, MissingValues, Precision};
use crate::model::{Decision, Ensemble, Node, NodeKind, Tree};

const INDENT: &str = "    ";
/// Deepest indentation written inside a tree function.
const MAX_INDENT_LEVEL: usize = 32;

fn indent(level: usize) -> String {
    INDENT.repeat(level.min(MAX_INDENT_LEVEL))
}

/// Renders an ensemble as a self-contained Rust module.
///
/// Each tree becomes one private function of nested `if`/`else` expressions;
/// a public wrapper sums the trees per output class and adds the base score.
#[derive(Clone, Debug)]
pub struct Emitter {
    namespace: String,
    function_name: String,
    precision: Precision,
    missing: MissingValues,
    /// Model document fingerprint recorded in the header.
    fingerprint: Option<String>,
}

impl Emitter {
    pub fn new(namespace: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            function_name: function_name.into(),
            precision: Precision::default(),
            missing: MissingValues::default(),
            fingerprint: None,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_missing(mut self, missing: MissingValues) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn tree_function_name(&self, position: usize) -> String {
        format!("{}_tree_{}", self.function_name, position)
    }

    pub fn emit_ensemble(&self, ensemble: &Ensemble) -> String {
        let ty = self.precision.rust_type();
        let mut output = Vec::new();

        output.push("// Code generated by boostc from an XGBoost model. DO NOT EDIT.".to_string());
        if let Some(fingerprint) = &self.fingerprint {
            output.push(format!("// model fingerprint: blake3:{fingerprint}"));
        }
        output.push(String::new());
        output.push(format!("pub mod {} {{", self.namespace));
        output.push(format!(
            "{INDENT}pub const NUM_CLASSES: usize = {};",
            ensemble.num_classes()
        ));
        if let Some(num_features) = ensemble.num_features() {
            output.push(format!("{INDENT}pub const NUM_FEATURES: usize = {num_features};"));
        }
        output.push(format!(
            "{INDENT}pub const BASE_SCORE: {ty} = {};",
            self.literal(ensemble.base_score())
        ));
        output.push(String::new());
        output.push(self.emit_wrapper(ensemble));

        let has_splits = ensemble.trees().iter().any(|t| !t.root.is_leaf());
        if has_splits {
            output.push(String::new());
            output.push(self.emit_feature_lookup());
        }
        for tree in ensemble.trees() {
            output.push(String::new());
            output.push(self.emit_tree(tree));
        }

        output.push("}".to_string());
        let mut source = output.join("\n");
        source.push('\n');
        source
    }

    /// The public scoring function.
    fn emit_wrapper(&self, ensemble: &Ensemble) -> String {
        let ty = self.precision.rust_type();
        let input = self.missing.element_type(self.precision);
        let trees = ensemble.trees();
        let param = if trees.is_empty() { "_features" } else { "features" };
        let body = INDENT.repeat(2);
        let mut lines = Vec::new();

        match self.missing {
            MissingValues::Nan => lines.push(format!(
                "{INDENT}/// Scores one feature vector. NaN marks a missing feature."
            )),
            MissingValues::Option => lines.push(format!(
                "{INDENT}/// Scores one feature vector. `None` marks a missing feature."
            )),
        }

        if ensemble.is_multiclass() {
            lines.push(format!(
                "{INDENT}pub fn {}({param}: &[{input}]) -> [{ty}; NUM_CLASSES] {{",
                self.function_name
            ));
            if trees.is_empty() {
                lines.push(format!("{body}[BASE_SCORE; NUM_CLASSES]"));
            } else {
                lines.push(format!(
                    "{body}let mut scores = [{}; NUM_CLASSES];",
                    self.literal(0.0)
                ));
                for tree in trees {
                    lines.push(format!(
                        "{body}scores[{}] += {}(features);",
                        tree.class_index,
                        self.tree_function_name(tree.position)
                    ));
                }
                let slots: Vec<String> = (0..ensemble.num_classes())
                    .map(|class| format!("scores[{class}] + BASE_SCORE"))
                    .collect();
                lines.push(format!("{body}[{}]", slots.join(", ")));
            }
        } else {
            lines.push(format!(
                "{INDENT}pub fn {}({param}: &[{input}]) -> {ty} {{",
                self.function_name
            ));
            if trees.is_empty() {
                lines.push(format!("{body}BASE_SCORE"));
            } else {
                lines.push(format!("{body}let mut score = {};", self.literal(0.0)));
                for tree in trees {
                    lines.push(format!(
                        "{body}score += {}(features);",
                        self.tree_function_name(tree.position)
                    ));
                }
                lines.push(format!("{body}score + BASE_SCORE"));
            }
        }

        lines.push(format!("{INDENT}}}"));
        lines.join("\n")
    }

    /// `Some(value)` for a present feature; out-of-range indices read as missing.
    fn emit_feature_lookup(&self) -> String {
        let ty = self.precision.rust_type();
        let input = self.missing.element_type(self.precision);
        let lookup = match self.missing {
            MissingValues::Nan => "features.get(index).copied()",
            MissingValues::Option => "features.get(index).copied().flatten()",
        };
        [
            format!("{INDENT}fn feature_value(features: &[{input}], index: usize) -> Option<{ty}> {{"),
            format!("{INDENT}{INDENT}{lookup}.filter(|value| !value.is_nan())"),
            format!("{INDENT}}}"),
        ]
        .join("\n")
    }

    /// One tree as a private function.
    pub fn emit_tree(&self, tree: &Tree) -> String {
        let ty = self.precision.rust_type();
        let input = self.missing.element_type(self.precision);
        let param = if tree.root.is_leaf() { "_features" } else { "features" };
        format!(
            "{INDENT}fn {}({param}: &[{input}]) -> {ty} {{\n{}\n{INDENT}}}",
            self.tree_function_name(tree.position),
            self.emit_node(&tree.root, 2)
        )
    }

    /// Text for the subtree at `node`, indented `level` steps. Walks an
    /// explicit stack, so tree depth never reaches the call stack.
    ///
    /// Indentation stops growing at `MAX_INDENT_LEVEL`; output size stays
    /// linear in the node count.
    fn emit_node(&self, node: &Node, level: usize) -> String {
        enum Step<'a> {
            Visit(&'a Node, usize),
            Close(usize, &'static str),
        }

        let mut lines = Vec::new();
        let mut stack = vec![Step::Visit(node, level)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(node, level) => match &node.kind {
                    NodeKind::Leaf { weight } => {
                        lines.push(format!("{}{}", indent(level), self.literal(*weight)));
                    }
                    NodeKind::Decision(decision) => {
                        lines.push(format!("{}if {} {{", indent(level), self.condition(decision)));
                        stack.push(Step::Close(level, "}"));
                        stack.push(Step::Visit(&decision.right, level + 1));
                        stack.push(Step::Close(level, "} else {"));
                        stack.push(Step::Visit(&decision.left, level + 1));
                    }
                },
                Step::Close(level, text) => lines.push(format!("{}{text}", indent(level))),
            }
        }
        lines.join("\n")
    }

    /// Missing features take `default_left`; present ones compare strictly,
    /// so a value equal to the threshold goes right.
    fn condition(&self, decision: &Decision) -> String {
        format!(
            "feature_value(features, {}).map_or({}, |value| value < {})",
            decision.feature,
            decision.default_left,
            self.literal(decision.threshold)
        )
    }

    fn literal(&self, value: f64) -> String {
        float_literal(value, self.precision)
    }
}
