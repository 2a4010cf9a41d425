use crate::program;
use colored::Colorize;
use siteflow_aws::PreviewEngine;
use siteflow_graph::Engine;
use std::path::PathBuf;

pub async fn handle(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = program::load_config(config)?;
    let region = config.region.clone();
    let program = program::build(config)?;

    println!(
        "{}",
        format!(
            "Stack: {}/{}",
            program.config.project, program.config.stack
        )
        .bold()
    );
    println!();

    let engine = PreviewEngine::with_region(region);
    tracing::debug!("Resolving stack with the {} engine", engine.name());
    let plan = engine.preview(&program.stack).await?;

    for resource in &plan.resources {
        let marker = if resource.component { "▸" } else { "+" };
        println!(
            "  {} {} {}",
            marker.green(),
            resource.resource_type.cyan(),
            resource.name
        );
    }

    println!();
    println!("{}", plan.summary());

    println!();
    println!("{}", "Outputs:".bold());
    for (name, output) in program.stack.exports() {
        match output.try_get() {
            Some(value) => println!("  {} = {}", name.cyan(), value),
            None => println!("  {} = {}", name.cyan(), "<unresolved>".dimmed()),
        }
    }

    Ok(())
}
