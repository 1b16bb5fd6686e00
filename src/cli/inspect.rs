use std::path::PathBuf;

use clap::Args;

use super::{exit_with, read_input, CliError};

#[derive(Args)]
pub struct InspectArgs {
    /// XGBoost model saved as JSON
    pub input: PathBuf,
    /// Also list every tree
    #[arg(long)]
    pub trees: bool,
}

pub fn cmd_inspect(args: InspectArgs) {
    match inspect(&args) {
        Ok(report) => print!("{}", report),
        Err(err) => exit_with(err),
    }
}

/// Summary of the ensemble as it will be compiled (after truncation).
pub fn inspect(args: &InspectArgs) -> Result<String, CliError> {
    let document = read_input(&args.input)?;
    let ensemble = boostc::load_ensemble(&document)?;
    let trees = ensemble.trees();

    let max_depth = trees.iter().map(|t| t.root.depth()).max().unwrap_or(0);
    let leaves: usize = trees.iter().map(|t| t.root.leaf_count()).sum();
    let features = ensemble
        .num_features()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut lines = vec![
        format!("model:       {}", args.input.display()),
        format!("fingerprint: blake3:{}", boostc::fingerprint(&document)),
        format!("trees:       {}", trees.len()),
        format!("classes:     {}", ensemble.num_classes()),
        format!("features:    {}", features),
        format!("base score:  {}", ensemble.base_score()),
        format!("max depth:   {}", max_depth),
        format!("leaves:      {}", leaves),
    ];
    if ensemble.is_multiclass() {
        for class in 0..ensemble.num_classes() {
            lines.push(format!(
                "  class {}: {} tree(s)",
                class,
                ensemble.trees_for_class(class)
            ));
        }
    }
    if args.trees {
        for tree in trees {
            lines.push(format!(
                "  tree {}: class {}, depth {}, {} leaves",
                tree.position,
                tree.class_index,
                tree.root.depth(),
                tree.root.leaf_count()
            ));
        }
    }

    let mut report = lines.join("\n");
    report.push('\n');
    Ok(report)
}
