//! Mode-aware layered configuration for Yii web and console applications.
//!
//! This crate provides:
//! - [`Environment`]: The resolved bootstrap values plus web and console config
//! - [`EnvironmentResolver`]: Resolution with pluggable sources, marker and signal
//! - [`merge`]: The PHP-style recursive merge used to layer config sources
//! - [`inherit`]: Console values copied from the web config
//!
//! # Configuration Precedence (lowest to highest)
//! 1. `main` (`<config_dir>/main.json` or `main.toml`)
//! 2. `mode_<mode>` (e.g. `<config_dir>/mode_production.json`)
//! 3. `local` (optional, machine-specific)
//!
//! # Example
//! ```no_run
//! use yii_environment::{Environment, EnvironmentSettings, ModeOrigin};
//!
//! let settings = EnvironmentSettings::new("protected/config");
//! let env = Environment::resolve(settings, None, ModeOrigin::Signal).unwrap();
//!
//! println!("Running in {} mode", env.mode());
//! for (alias, path) in env.path_aliases() {
//!     println!("{alias} => {}", path.display());
//! }
//! ```
//!
//! # Environment Variables
//! - `YII_ENVIRONMENT`: Mode for web entry points (configurable via
//!   [`EnvironmentSettings::with_signal_var`])

pub mod environment;
pub mod error;
pub mod inherit;
pub mod marker;
pub mod merge;
pub mod mode;
pub mod path;
pub mod settings;
pub mod source;
mod writer;

// Re-exports for convenient access
pub use environment::{Environment, EnvironmentResolver, PathAlias};
pub use error::{EnvironmentError, Result};
pub use inherit::{Inherit, InheritPolicy};
pub use marker::{FileMarker, MarkerStore, MemoryMarker};
pub use merge::{ConfigMap, deep_merge, merge_layers};
pub use mode::{EnvVar, FixedSignal, Mode, ModeOrigin, ModeResolver, ModeSet, ModeSignal};
pub use settings::EnvironmentSettings;
pub use source::{DirSource, MemorySource, SourceLoader, SourceName};
