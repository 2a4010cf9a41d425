use crate::program;
use colored::Colorize;
use siteflow_graph::DependencyGraph;
use std::path::PathBuf;

pub async fn handle(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = program::load_config(config)?;
    let program = program::build(config)?;

    let declarations = program.stack.declarations();
    let graph = DependencyGraph::build(&declarations)?;
    let order = graph.creation_order()?;
    tracing::debug!("Validated component {}", program.website.urn());

    println!(
        "{} Configuration valid: {} resources, creation order resolves",
        "✓".green(),
        order.len()
    );

    Ok(())
}
