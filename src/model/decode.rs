//! XGBoost JSON model document decoding.
//!
//! XGBoost writes most scalar parameters as strings (`"num_class": "0"`), and
//! newer releases wrap `base_score` in brackets (`"[5E-1]"`). Both forms and
//! plain JSON numbers are accepted; anything else is a decode error naming the
//! field. Nothing is defaulted.

use serde::Deserialize;

use super::ensemble::RawEnsemble;
use super::tree::RawTree;
use crate::error::CompileError;

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    attributes: Attributes,
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
}

#[derive(Debug, Default, Deserialize)]
struct Attributes {
    #[serde(default)]
    best_iteration: Option<NumberField>,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    model: Option<BoosterModel>,
}

#[derive(Debug, Deserialize)]
struct BoosterModel {
    tree_info: Vec<i64>,
    trees: Vec<TreeDocument>,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: NumberField,
    num_class: NumberField,
    #[serde(default)]
    num_feature: Option<NumberField>,
}

#[derive(Debug, Deserialize)]
struct TreeDocument {
    tree_param: TreeParam,
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Vec<Flag>,
}

#[derive(Debug, Deserialize)]
struct TreeParam {
    num_nodes: NumberField,
}

/// A scalar written either as a JSON number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberField {
    Number(serde_json::Number),
    Text(String),
}

/// `default_left` is a bool in some writers and 0/1 in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl NumberField {
    fn to_f64(&self) -> Result<f64, String> {
        match self {
            NumberField::Number(n) => n
                .as_f64()
                .ok_or_else(|| format!("expected a number, found {n}")),
            NumberField::Text(text) => {
                let trimmed = text.trim();
                let inner = trimmed
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .unwrap_or(trimmed)
                    .trim();
                inner
                    .parse::<f64>()
                    .map_err(|_| format!("expected a number, found {text:?}"))
            }
        }
    }

    fn to_i64(&self) -> Result<i64, String> {
        match self {
            NumberField::Number(n) => n
                .as_i64()
                .ok_or_else(|| format!("expected an integer, found {n}")),
            NumberField::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("expected an integer, found {text:?}")),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumberField::Text(text) if text.trim().is_empty())
    }
}

/// Decode an XGBoost JSON model document into raw per-tree records.
pub fn decode_document(document: &str) -> Result<RawEnsemble, CompileError> {
    let doc: ModelDocument = serde_json::from_str(document)?;
    let learner = doc.learner;

    let booster = learner.gradient_booster;
    if let Some(name) = booster.name.as_deref() {
        if name != "gbtree" {
            return Err(CompileError::decode(
                "gradient_booster",
                format!("unsupported booster `{name}`, only `gbtree` models can be compiled"),
            ));
        }
    }
    let model = booster
        .model
        .ok_or_else(|| CompileError::decode("gradient_booster", "missing `model` object"))?;

    let params = learner.learner_model_param;
    let base_score = params
        .base_score
        .to_f64()
        .map_err(|m| CompileError::decode("base_score", m))?;

    let num_class = params
        .num_class
        .to_i64()
        .map_err(|m| CompileError::decode("num_class", m))?;
    // XGBoost encodes single-output models as `num_class = 0`.
    let num_classes = match usize::try_from(num_class) {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => {
            return Err(CompileError::decode(
                "num_class",
                format!("must not be negative, found {num_class}"),
            ))
        }
    };

    let num_features = match params.num_feature {
        Some(field) => {
            let n = field
                .to_i64()
                .map_err(|m| CompileError::decode("num_feature", m))?;
            Some(usize::try_from(n).map_err(|_| {
                CompileError::decode("num_feature", format!("must not be negative, found {n}"))
            })?)
        }
        None => None,
    };

    let best_iteration = match learner.attributes.best_iteration {
        Some(field) if !field.is_blank() => Some(
            field
                .to_i64()
                .map_err(|m| CompileError::decode("best_iteration", m))?,
        ),
        _ => None,
    };

    if model.tree_info.len() < model.trees.len() {
        return Err(CompileError::decode(
            "tree_info",
            format!(
                "expected a class for each of {} trees, found {}",
                model.trees.len(),
                model.tree_info.len()
            ),
        ));
    }

    let trees = model
        .trees
        .into_iter()
        .enumerate()
        .map(|(position, tree)| decode_tree(position, tree))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawEnsemble {
        trees,
        tree_info: model.tree_info,
        best_iteration,
        base_score,
        num_classes,
        num_features,
    })
}

fn decode_tree(position: usize, tree: TreeDocument) -> Result<RawTree, CompileError> {
    let num_nodes = tree
        .tree_param
        .num_nodes
        .to_i64()
        .map_err(|m| CompileError::decode_in_tree("num_nodes", position, m))?;
    let num_nodes = usize::try_from(num_nodes).map_err(|_| {
        CompileError::decode_in_tree(
            "num_nodes",
            position,
            format!("must not be negative, found {num_nodes}"),
        )
    })?;

    let lengths = [
        ("left_children", tree.left_children.len()),
        ("right_children", tree.right_children.len()),
        ("split_indices", tree.split_indices.len()),
        ("split_conditions", tree.split_conditions.len()),
        ("default_left", tree.default_left.len()),
    ];
    for (field, len) in lengths {
        if len != num_nodes {
            return Err(CompileError::decode_in_tree(
                field,
                position,
                format!("expected {num_nodes} entries (num_nodes), found {len}"),
            ));
        }
    }

    let default_left = tree
        .default_left
        .iter()
        .enumerate()
        .map(|(node, flag)| match flag {
            Flag::Bool(b) => Ok(*b),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(CompileError::decode_in_tree(
                "default_left",
                position,
                format!("expected 0 or 1 at node {node}, found {other}"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawTree {
        left_children: tree.left_children,
        right_children: tree.right_children,
        split_indices: tree.split_indices,
        split_conditions: tree.split_conditions,
        default_left,
    })
}
