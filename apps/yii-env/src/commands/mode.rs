use super::ResolveArgs;
use anyhow::{Context, Result};

pub fn execute(args: &ResolveArgs) -> Result<()> {
    let resolver = args.resolver()?;
    let mode = resolver
        .mode_resolver()
        .resolve(args.mode.as_deref(), args.origin())
        .context("Failed to determine environment mode")?;

    println!("{}", mode.to_lowercase());
    Ok(())
}
