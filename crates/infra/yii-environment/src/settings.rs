//! Construction-time settings for an [`crate::EnvironmentResolver`].

use crate::inherit::InheritPolicy;
use crate::mode::ModeSet;
use std::path::PathBuf;

/// Environment variable carrying the mode for web entry points.
pub const SIGNAL_VAR: &str = "YII_ENVIRONMENT";

/// File name of the mode marker inside the config directory.
pub const MODE_FILE: &str = "mode";

/// Everything an application may customize about resolution.
#[derive(Debug, Clone)]
pub struct EnvironmentSettings {
    /// Directory holding `main`, `mode_<mode>` and `local` sources.
    pub config_dir: PathBuf,

    /// Location of the side-channel mode marker.
    pub mode_file: PathBuf,

    /// Environment variable read for the mode.
    pub signal_var: String,

    /// Accepted modes.
    pub modes: ModeSet,

    /// Behavior when an inherited console value is missing from the web config.
    pub inherit_policy: InheritPolicy,
}

impl EnvironmentSettings {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            mode_file: config_dir.join(MODE_FILE),
            config_dir,
            signal_var: SIGNAL_VAR.to_string(),
            modes: ModeSet::default(),
            inherit_policy: InheritPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_mode_file(mut self, mode_file: impl Into<PathBuf>) -> Self {
        self.mode_file = mode_file.into();
        self
    }

    #[must_use]
    pub fn with_signal_var(mut self, signal_var: impl Into<String>) -> Self {
        self.signal_var = signal_var.into();
        self
    }

    #[must_use]
    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.modes = modes;
        self
    }

    #[must_use]
    pub fn with_inherit_policy(mut self, policy: InheritPolicy) -> Self {
        self.inherit_policy = policy;
        self
    }
}
