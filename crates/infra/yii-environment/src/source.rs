//! Configuration sources.
//!
//! A resolution reads up to three sources by logical name:
//! - `main` (required)
//! - `mode_<mode>` (required, e.g. `mode_production`)
//! - `local` (optional, machine-specific; keep it out of version control)

use crate::error::{EnvironmentError, Result};
use crate::merge::ConfigMap;
use crate::mode::Mode;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Logical name of a configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceName {
    Main,
    Mode(Mode),
    Local,
}

impl SourceName {
    /// File stem / lookup key, e.g. `mode_staging`.
    pub fn stem(&self) -> String {
        match self {
            Self::Main => "main".into(),
            Self::Mode(mode) => format!("mode_{}", mode.to_lowercase()),
            Self::Local => "local".into(),
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// Loads configuration mappings by logical name.
pub trait SourceLoader {
    /// The mapping for `name`, or `None` if the source does not exist.
    fn load(&self, name: &SourceName) -> Result<Option<ConfigMap>>;

    /// Where `name` is looked up, for error messages.
    fn describe(&self, name: &SourceName) -> String {
        name.to_string()
    }
}

/// File formats recognized by [`DirSource`], in lookup order.
const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Reads `<stem>.json` or `<stem>.toml` from a config directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The first existing file for `name`, if any.
    pub fn find(&self, name: &SourceName) -> Option<PathBuf> {
        let stem = name.stem();
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl SourceLoader for DirSource {
    fn load(&self, name: &SourceName) -> Result<Option<ConfigMap>> {
        let Some(path) = self.find(name) else {
            tracing::debug!(source = %name, dir = %self.dir.display(), "Config source not found");
            return Ok(None);
        };

        tracing::debug!(source = %name, path = %path.display(), "Loading config source");
        let raw = std::fs::read_to_string(&path)?;
        let value = parse(&path, &raw).map_err(|message| EnvironmentError::Parse {
            source_name: path.display().to_string(),
            message,
        })?;

        into_mapping(value, &path.display().to_string()).map(Some)
    }

    fn describe(&self, name: &SourceName) -> String {
        format!(
            "config file {} (.{})",
            self.dir.join(name.stem()).display(),
            EXTENSIONS.join(" or .")
        )
    }
}

fn parse(path: &Path, raw: &str) -> std::result::Result<Value, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(raw).map_err(|e| e.to_string()),
        _ => serde_json::from_str(raw).map_err(|e| e.to_string()),
    }
}

/// In-memory sources keyed by stem, for embedded configs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its stem (`main`, `mode_test`, `local`, ...).
    #[must_use]
    pub fn with(mut self, stem: impl Into<String>, config: Value) -> Self {
        self.sources.insert(stem.into(), config);
        self
    }
}

impl SourceLoader for MemorySource {
    fn load(&self, name: &SourceName) -> Result<Option<ConfigMap>> {
        let stem = name.stem();
        self.sources
            .get(&stem)
            .map(|value| into_mapping(value.clone(), &stem))
            .transpose()
    }
}

fn into_mapping(value: Value, source_name: &str) -> Result<ConfigMap> {
    match value {
        Value::Object(map) => Ok(map),
        // An empty list is how PHP-style configs spell an empty mapping.
        Value::Array(seq) if seq.is_empty() => Ok(ConfigMap::new()),
        _ => Err(EnvironmentError::Parse {
            source_name: source_name.to_string(),
            message: "config root must be a mapping".into(),
        }),
    }
}
