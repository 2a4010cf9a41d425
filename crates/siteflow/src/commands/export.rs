use crate::program;
use colored::Colorize;
use std::path::PathBuf;

pub async fn handle(config: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = program::load_config(config)?;
    let program = program::build(config)?;

    let snapshot = program.stack.snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &json).await?;
            println!(
                "{} Wrote {} resources to {}",
                "✓".green(),
                snapshot.resources.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
