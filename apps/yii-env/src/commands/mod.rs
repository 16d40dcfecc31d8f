pub mod mode;
pub mod show;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use yii_environment::{EnvironmentResolver, EnvironmentSettings, ModeOrigin};

/// Options shared by every command that resolves a mode.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Directory holding main, mode_<mode> and local config files
    /// (defaults to current dir)
    #[arg(long, env = "YII_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Use this mode instead of reading YII_ENVIRONMENT or the marker
    #[arg(long)]
    pub mode: Option<String>,

    /// Read the mode from the marker file, as console entry points do
    #[arg(long, conflicts_with = "mode")]
    pub from_marker: bool,
}

impl ResolveArgs {
    pub fn resolver(&self) -> Result<EnvironmentResolver> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        tracing::debug!(dir = %dir.display(), "Using config directory");
        Ok(EnvironmentResolver::from_settings(EnvironmentSettings::new(dir)))
    }

    pub fn origin(&self) -> ModeOrigin {
        if self.from_marker {
            ModeOrigin::Marker
        } else {
            ModeOrigin::Signal
        }
    }
}
