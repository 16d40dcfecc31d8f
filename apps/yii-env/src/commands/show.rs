//! Full resolution, printed as the environment's debug dump.

use super::ResolveArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use yii_environment::MemoryMarker;

pub fn execute(args: &ResolveArgs, json_output: bool, no_marker: bool) -> Result<()> {
    let mut resolver = args.resolver()?;
    if no_marker {
        resolver = resolver.with_marker(MemoryMarker::default());
    }

    let env = resolver
        .resolve(args.mode.as_deref(), args.origin())
        .context("Failed to resolve environment")?;

    if json_output {
        println!("{}", serde_json::to_string(&env)?);
        return Ok(());
    }

    eprintln!(
        "{} Resolved {} mode",
        "OK".green(),
        env.mode().to_string().cyan()
    );
    if env.has_console() {
        if no_marker {
            eprintln!("{} --no-marker given; mode marker not written", "INFO".blue());
        }
    } else {
        eprintln!("{} No console config; mode marker not written", "INFO".blue());
    }
    println!("{}", env.debug_dump()?);

    Ok(())
}
