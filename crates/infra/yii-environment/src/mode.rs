//! Environment mode selection.
//!
//! A mode comes from one of three places, checked in this order:
//! 1. An explicit override passed by the caller
//! 2. The side-channel marker (console entry points, see [`ModeOrigin::Marker`])
//! 3. The external mode signal, by default the `YII_ENVIRONMENT` variable
//!
//! Whatever the origin, the name is uppercased and must belong to the
//! configured [`ModeSet`].

use crate::error::{EnvironmentError, Result};
use crate::marker::MarkerStore;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A validated environment mode, stored uppercase.
///
/// Only a [`ModeSet`] hands out modes, so every value names a known member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mode(Cow<'static, str>);

impl Mode {
    pub const DEVELOPMENT: Self = Self(Cow::Borrowed("DEVELOPMENT"));
    pub const TEST: Self = Self(Cow::Borrowed("TEST"));
    pub const STAGING: Self = Self(Cow::Borrowed("STAGING"));
    pub const PRODUCTION: Self = Self(Cow::Borrowed("PRODUCTION"));

    /// Uppercase name, e.g. `PRODUCTION`.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Lowercase name as used for `params.environment`, the marker and
    /// the `mode_<name>` config source.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The set of modes an application accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSet {
    modes: Vec<Mode>,
}

impl Default for ModeSet {
    fn default() -> Self {
        Self {
            modes: vec![
                Mode::DEVELOPMENT,
                Mode::TEST,
                Mode::STAGING,
                Mode::PRODUCTION,
            ],
        }
    }
}

impl ModeSet {
    /// Build a set from arbitrary names. Names are uppercased and deduplicated.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(Self { modes: Vec::new() }, |set, name| set.with(name))
    }

    /// Add a mode to the set.
    #[must_use]
    pub fn with(mut self, name: impl AsRef<str>) -> Self {
        let name = normalize(name.as_ref());
        if !name.is_empty() && !self.modes.iter().any(|m| m.name() == name) {
            self.modes.push(Mode(Cow::Owned(name)));
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter()
    }

    /// Validate a raw mode name (any case, surrounding whitespace ignored).
    pub fn parse(&self, raw: &str) -> Result<Mode> {
        let name = normalize(raw);
        self.modes
            .iter()
            .find(|m| m.name() == name)
            .cloned()
            .ok_or_else(|| EnvironmentError::InvalidMode {
                mode: raw.to_string(),
            })
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Source of the externally selected mode name.
pub trait ModeSignal {
    /// The raw mode name, or `None` when the signal is not set.
    fn read(&self) -> Option<String>;

    /// Human-readable name of the signal for error messages.
    fn describe(&self) -> String;
}

/// Reads the mode from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvVar {
    name: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ModeSignal for EnvVar {
    fn read(&self) -> Option<String> {
        env_trimmed(&self.name)
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.name)
    }
}

/// A signal with a value fixed at construction, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct FixedSignal(pub Option<String>);

impl FixedSignal {
    pub fn set(mode: impl Into<String>) -> Self {
        Self(Some(mode.into()))
    }

    pub fn unset() -> Self {
        Self(None)
    }
}

impl ModeSignal for FixedSignal {
    fn read(&self) -> Option<String> {
        self.0.clone()
    }

    fn describe(&self) -> String {
        "fixed mode signal".into()
    }
}

/// Where to look for the mode when no override is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModeOrigin {
    /// The external signal (web entry points).
    #[default]
    Signal,

    /// The side-channel marker written by an earlier resolution.
    Marker,
}

/// Determines the active mode. Never writes anything.
pub struct ModeResolver<'a> {
    pub modes: &'a ModeSet,
    pub signal: &'a dyn ModeSignal,
    pub marker: &'a dyn MarkerStore,
}

impl ModeResolver<'_> {
    pub fn resolve(&self, override_mode: Option<&str>, origin: ModeOrigin) -> Result<Mode> {
        if let Some(mode) = override_mode {
            tracing::debug!(mode, "Using mode override");
            return self.modes.parse(mode);
        }

        let raw = match origin {
            ModeOrigin::Marker => self.marker.read()?.ok_or_else(|| {
                EnvironmentError::missing(format!(
                    "mode marker {} (run the web application or create it manually)",
                    self.marker.location()
                ))
            })?,
            ModeOrigin::Signal => self.signal.read().ok_or_else(|| {
                EnvironmentError::missing(format!("{} is not set", self.signal.describe()))
            })?,
        };

        tracing::debug!(raw = %raw, ?origin, "Read environment mode");
        self.modes.parse(&raw)
    }
}

/// Read an env var, trimming whitespace and treating blank values as unset.
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
