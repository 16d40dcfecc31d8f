//! Environment resolution.
//!
//! The resolving process:
//! 1. Determine the mode (override, marker or external signal)
//! 2. Load `main`, `mode_<mode>` and, if present, `local`
//! 3. Deep merge them in that order
//! 4. Extract the bootstrap fields and the web/console bundles
//! 5. Inject `params.environment` into the web bundle
//! 6. For a non-empty console bundle: resolve `inherit` values against the
//!    web bundle, record the mode marker, inject `params.environment`

use crate::error::{EnvironmentError, Result};
use crate::inherit::{InheritPolicy, resolve_inheritance};
use crate::marker::{FileMarker, MarkerStore};
use crate::merge::{ConfigMap, deep_merge};
use crate::mode::{EnvVar, Mode, ModeOrigin, ModeResolver, ModeSet, ModeSignal};
use crate::settings::EnvironmentSettings;
use crate::source::{DirSource, SourceLoader, SourceName};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One `Yii::setPathOfAlias()` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathAlias {
    pub alias: String,
    pub path: PathBuf,
}

/// A fully resolved environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub mode: Mode,

    /// Path to `yii.php`.
    pub yii_path: PathBuf,

    /// Path to `yiic.php`, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yiic_path: Option<PathBuf>,

    /// Path to `yiit.php`, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yiit_path: Option<PathBuf>,

    /// Value for `YII_DEBUG`.
    pub yii_debug: bool,

    /// Value for `YII_TRACE_LEVEL`.
    pub yii_trace_level: u32,

    /// Path aliases to register, in declaration order.
    #[serde(rename = "yiiSetPathOfAlias", serialize_with = "aliases_as_map")]
    pub aliases: Vec<PathAlias>,

    /// Web application config.
    pub config_web: ConfigMap,

    /// Console application config; empty when not used.
    pub config_console: ConfigMap,
}

impl Environment {
    /// Resolve with the default collaborators for `settings`.
    pub fn resolve(
        settings: EnvironmentSettings,
        override_mode: Option<&str>,
        origin: ModeOrigin,
    ) -> Result<Self> {
        EnvironmentResolver::from_settings(settings).resolve(override_mode, origin)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn has_console(&self) -> bool {
        !self.config_console.is_empty()
    }

    /// `(alias, path)` pairs for the application bootstrap to register.
    pub fn path_aliases(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.aliases
            .iter()
            .map(|a| (a.alias.as_str(), a.path.as_path()))
    }

    /// Pretty JSON dump of everything that was resolved.
    pub fn debug_dump(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Dumped in the same alias => path shape the config declares.
fn aliases_as_map<S: Serializer>(
    aliases: &[PathAlias],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(aliases.iter().map(|a| (&a.alias, &a.path)))
}

/// Resolves an [`Environment`] from pluggable sources, marker and signal.
pub struct EnvironmentResolver {
    modes: ModeSet,
    inherit_policy: InheritPolicy,
    sources: Box<dyn SourceLoader>,
    marker: Box<dyn MarkerStore>,
    signal: Box<dyn ModeSignal>,
}

impl EnvironmentResolver {
    /// Directory sources, a file marker and the env var signal from `settings`.
    pub fn from_settings(settings: EnvironmentSettings) -> Self {
        Self {
            modes: settings.modes,
            inherit_policy: settings.inherit_policy,
            sources: Box::new(DirSource::new(settings.config_dir)),
            marker: Box::new(FileMarker::new(settings.mode_file)),
            signal: Box::new(EnvVar::new(settings.signal_var)),
        }
    }

    #[must_use]
    pub fn with_sources(mut self, sources: impl SourceLoader + 'static) -> Self {
        self.sources = Box::new(sources);
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: impl MarkerStore + 'static) -> Self {
        self.marker = Box::new(marker);
        self
    }

    #[must_use]
    pub fn with_signal(mut self, signal: impl ModeSignal + 'static) -> Self {
        self.signal = Box::new(signal);
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

    pub fn mode_resolver(&self) -> ModeResolver<'_> {
        ModeResolver {
            modes: &self.modes,
            signal: self.signal.as_ref(),
            marker: self.marker.as_ref(),
        }
    }

    /// Run the whole resolution. Any error aborts it; nothing partial is returned.
    pub fn resolve(&self, override_mode: Option<&str>, origin: ModeOrigin) -> Result<Environment> {
        let mode = self.mode_resolver().resolve(override_mode, origin)?;
        tracing::info!(mode = %mode, "Resolving environment");

        let config = self.load(&mode)?;
        self.finalize(mode, &config)
    }

    fn load(&self, mode: &Mode) -> Result<ConfigMap> {
        let main = self.require(&SourceName::Main)?;
        let specific = self.require(&SourceName::Mode(mode.clone()))?;
        let mut config = deep_merge(&main, &specific);

        match self.sources.load(&SourceName::Local)? {
            Some(local) => {
                tracing::debug!("Merging local config overrides");
                config = deep_merge(&config, &local);
            }
            None => tracing::debug!("No local config found, skipping"),
        }

        Ok(config)
    }

    fn require(&self, name: &SourceName) -> Result<ConfigMap> {
        self.sources.load(name)?.ok_or_else(|| {
            EnvironmentError::missing(format!("cannot find {}", self.sources.describe(name)))
        })
    }

    fn finalize(&self, mode: Mode, config: &ConfigMap) -> Result<Environment> {
        let yii_path = required_path(config, "yiiPath")?;
        let yiic_path = optional_path(config, "yiicPath")?;
        let yiit_path = optional_path(config, "yiitPath")?;
        let yii_debug = debug_flag(required(config, "yiiDebug")?)?;
        let yii_trace_level = trace_level(required(config, "yiiTraceLevel")?)?;
        let aliases = path_aliases(config.get("yiiSetPathOfAlias"))?;

        let mut config_web = bundle(required(config, "configWeb")?, "configWeb")?;
        inject_environment(&mut config_web, &mode, "configWeb.params")?;

        let mut config_console = match config.get("configConsole") {
            Some(value) => bundle(value, "configConsole")?,
            None => ConfigMap::new(),
        };
        if !config_console.is_empty() {
            config_console = resolve_inheritance(&config_console, &config_web, self.inherit_policy)?;
            self.record_mode(&mode)?;
            inject_environment(&mut config_console, &mode, "configConsole.params")?;
        }

        Ok(Environment {
            mode,
            yii_path,
            yiic_path,
            yiit_path,
            yii_debug,
            yii_trace_level,
            aliases,
            config_web,
            config_console,
        })
    }

    fn record_mode(&self, mode: &Mode) -> Result<()> {
        match self.marker.write_if_absent(&mode.to_lowercase()) {
            Ok(true) => {
                tracing::info!(location = %self.marker.location(), "Wrote environment mode marker");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(source) => Err(EnvironmentError::ConfigWriteError {
                location: self.marker.location(),
                source,
            }),
        }
    }
}

fn required<'a>(config: &'a ConfigMap, field: &'static str) -> Result<&'a Value> {
    config
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| EnvironmentError::missing(format!("required field '{field}'")))
}

fn required_path(config: &ConfigMap, field: &'static str) -> Result<PathBuf> {
    required(config, field)?
        .as_str()
        .map(PathBuf::from)
        .ok_or(EnvironmentError::InvalidField {
            field,
            expected: "a path string",
        })
}

fn optional_path(config: &ConfigMap, field: &'static str) -> Result<Option<PathBuf>> {
    match config.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(path)) => Ok(Some(PathBuf::from(path))),
        Some(_) => Err(EnvironmentError::InvalidField {
            field,
            expected: "a path string",
        }),
    }
}

fn debug_flag(value: &Value) -> Result<bool> {
    let flag = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => n
            .as_i64()
            .map(|n| n != 0)
            .or_else(|| n.as_u64().map(|n| n != 0)),
        _ => None,
    };
    flag.ok_or(EnvironmentError::InvalidField {
        field: "yiiDebug",
        expected: "a boolean or integer",
    })
}

fn trace_level(value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(EnvironmentError::InvalidField {
            field: "yiiTraceLevel",
            expected: "a non-negative integer",
        })
}

fn path_aliases(value: Option<&Value>) -> Result<Vec<PathAlias>> {
    const INVALID: EnvironmentError = EnvironmentError::InvalidField {
        field: "yiiSetPathOfAlias",
        expected: "a mapping of alias to path string",
    };

    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(seq)) if seq.is_empty() => Ok(Vec::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(alias, path)| match path {
                Value::String(path) => Ok(PathAlias {
                    alias: alias.clone(),
                    path: PathBuf::from(path),
                }),
                _ => Err(INVALID),
            })
            .collect(),
        Some(_) => Err(INVALID),
    }
}

/// A bundle must be a mapping; `null` and `[]` stand for an empty one.
fn bundle(value: &Value, field: &'static str) -> Result<ConfigMap> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(ConfigMap::new()),
        Value::Array(seq) if seq.is_empty() => Ok(ConfigMap::new()),
        _ => Err(EnvironmentError::InvalidField {
            field,
            expected: "a mapping",
        }),
    }
}

fn inject_environment(bundle: &mut ConfigMap, mode: &Mode, field: &'static str) -> Result<()> {
    let params = bundle.entry("params").or_insert(Value::Null);
    if params.is_null() || params.as_array().is_some_and(Vec::is_empty) {
        *params = Value::Object(ConfigMap::new());
    }

    let Value::Object(params) = params else {
        return Err(EnvironmentError::InvalidField {
            field,
            expected: "a mapping",
        });
    };
    params.insert("environment".into(), Value::String(mode.to_lowercase()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inherit::Inherit;
    use crate::marker::MemoryMarker;
    use crate::mode::FixedSignal;
    use crate::source::MemorySource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "yiiPath": "/a",
            "yiiDebug": true,
            "yiiTraceLevel": 0,
            "yiiSetPathOfAlias": {},
            "configWeb": {"params": {}},
            "configConsole": {}
        })
    }

    fn resolver(sources: MemorySource, marker: &MemoryMarker) -> EnvironmentResolver {
        EnvironmentResolver::from_settings(EnvironmentSettings::new("/nonexistent"))
            .with_sources(sources)
            .with_marker(marker.clone())
            .with_signal(FixedSignal::unset())
    }

    #[test]
    fn test_end_to_end_without_console() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configWeb": {"foo": "bar"}}));

        let env = resolver(sources, &marker)
            .resolve(Some("TEST"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(env.mode, Mode::TEST);
        assert_eq!(
            Value::Object(env.config_web.clone()),
            json!({"params": {"environment": "test"}, "foo": "bar"})
        );
        let keys: Vec<&str> = env.config_web.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["params", "foo"]);
        assert!(!env.has_console());
        assert_eq!(marker.contents(), None);
    }

    #[test]
    fn test_bootstrap_fields() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with(
                "main",
                json!({
                    "yiiPath": "/yii/framework/yii.php",
                    "yiicPath": "/yii/framework/yiic.php",
                    "yiitPath": "/yii/framework/yiit.php",
                    "yiiDebug": 1,
                    "yiiTraceLevel": 3,
                    "yiiSetPathOfAlias": {"local": "/srv/local", "vendor": "/srv/vendor"},
                    "configWeb": {}
                }),
            )
            .with("mode_production", json!({"yiiDebug": false, "yiiTraceLevel": 0}));

        let env = resolver(sources, &marker)
            .resolve(Some("production"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(env.yii_path, Path::new("/yii/framework/yii.php"));
        assert_eq!(env.yiic_path.as_deref(), Some(Path::new("/yii/framework/yiic.php")));
        assert_eq!(env.yiit_path.as_deref(), Some(Path::new("/yii/framework/yiit.php")));
        assert!(!env.yii_debug);
        assert_eq!(env.yii_trace_level, 0);
        let aliases: Vec<_> = env.path_aliases().collect();
        assert_eq!(
            aliases,
            vec![
                ("local", Path::new("/srv/local")),
                ("vendor", Path::new("/srv/vendor"))
            ]
        );
    }

    #[test]
    fn test_console_inherits_and_records_mode() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with(
                "main",
                json!({
                    "yiiPath": "/a",
                    "yiiDebug": false,
                    "yiiTraceLevel": 0,
                    "configWeb": {
                        "name": "Shop",
                        "components": {"db": {"connectionString": "mysql:host=web"}}
                    },
                    "configConsole": {
                        "name": Inherit,
                        "components": {"db": Inherit}
                    }
                }),
            )
            .with("mode_staging", json!({}));

        let env = resolver(sources, &marker)
            .resolve(Some("staging"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(
            Value::Object(env.config_console),
            json!({
                "name": "Shop",
                "components": {"db": {"connectionString": "mysql:host=web"}},
                "params": {"environment": "staging"}
            })
        );
        assert_eq!(marker.contents(), Some("staging".to_string()));
    }

    #[test]
    fn test_console_can_inherit_web_params() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with(
                "main",
                json!({
                    "yiiPath": "/a",
                    "yiiDebug": false,
                    "yiiTraceLevel": 0,
                    "configWeb": {"params": {"adminEmail": "ops@example.com"}},
                    "configConsole": {"params": {"adminEmail": "inherit", "environment": "inherit"}}
                }),
            )
            .with("mode_development", json!({}));

        let env = resolver(sources, &marker)
            .resolve(Some("development"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(env.config_console["params"]["adminEmail"], "ops@example.com");
        assert_eq!(env.config_console["params"]["environment"], "development");
    }

    #[test]
    fn test_existing_marker_is_left_alone() {
        let marker = MemoryMarker::with_mode("production");
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configConsole": {"name": "cli"}}));

        resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(marker.contents(), Some("production".to_string()));
    }

    #[test]
    fn test_local_overrides_mode_config() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configWeb": {"db": "test-db", "preload": ["log"]}}))
            .with("local", json!({"configWeb": {"db": "my-db", "preload": ["debug"]}}));

        let env = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(env.config_web["db"], "my-db");
        assert_eq!(env.config_web["preload"], json!(["log", "debug"]));
    }

    #[test]
    fn test_missing_main_source() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new().with("mode_test", json!({}));

        let err = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::ConfigMissing { what } if what.contains("main")));
    }

    #[test]
    fn test_missing_mode_source() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new().with("main", base());

        let err = resolver(sources, &marker)
            .resolve(Some("production"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(
            matches!(err, EnvironmentError::ConfigMissing { what } if what.contains("mode_production"))
        );
    }

    #[test]
    fn test_missing_required_field() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", json!({"yiiPath": "/a", "yiiDebug": true, "configWeb": {}}))
            .with("mode_test", json!({}));

        let err = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(
            matches!(err, EnvironmentError::ConfigMissing { what } if what.contains("yiiTraceLevel"))
        );
    }

    #[test]
    fn test_wrongly_shaped_field() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"yiiTraceLevel": "high"}));

        let err = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(matches!(
            err,
            EnvironmentError::InvalidField {
                field: "yiiTraceLevel",
                ..
            }
        ));
    }

    #[test]
    fn test_inherit_miss_aborts_and_writes_nothing() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configConsole": {"components": {"cache": "inherit"}}}));

        let err = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::PathNotFound { path } if path == "components.cache"));
        assert_eq!(marker.contents(), None);
    }

    #[test]
    fn test_inherit_miss_with_null_policy() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configConsole": {"components": {"cache": "inherit"}}}));

        let env = resolver(sources, &marker)
            .with_inherit_policy(InheritPolicy::NullOnMissing)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();
        assert_eq!(env.config_console["components"]["cache"], Value::Null);
    }

    #[test]
    fn test_mode_from_marker() {
        let marker = MemoryMarker::with_mode("test");
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({}));

        let env = resolver(sources, &marker)
            .resolve(None, ModeOrigin::Marker)
            .unwrap();
        assert_eq!(env.mode(), &Mode::TEST);
    }

    #[test]
    fn test_re_resolution_is_identical() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with(
                "mode_test",
                json!({"configWeb": {"name": "app"}, "configConsole": {"name": "inherit"}}),
            );
        let resolver = resolver(sources, &marker);

        let first = resolver.resolve(Some("test"), ModeOrigin::Signal).unwrap();
        let second = resolver.resolve(Some("test"), ModeOrigin::Signal).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.debug_dump().unwrap(), second.debug_dump().unwrap());
    }

    #[test]
    fn test_debug_dump_uses_config_field_names() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({}));

        let env = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();
        let dump: Value = serde_json::from_str(&env.debug_dump().unwrap()).unwrap();

        assert_eq!(dump["mode"], "TEST");
        assert_eq!(dump["yiiPath"], "/a");
        assert_eq!(dump["configWeb"]["params"]["environment"], "test");
        assert!(dump.get("yiicPath").is_none());
    }

    #[test]
    fn test_scalar_params_is_rejected() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configWeb": {"params": "nope"}}));

        let err = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();
        assert!(matches!(
            err,
            EnvironmentError::InvalidField {
                field: "configWeb.params",
                ..
            }
        ));
    }

    #[test]
    fn test_debug_dump_keeps_alias_mapping_shape() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new().with("main", base()).with(
            "mode_test",
            json!({"yiiSetPathOfAlias": {"vendor": "/srv/vendor", "local": "/srv/local"}}),
        );

        let env = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();
        let dump: Value = serde_json::from_str(&env.debug_dump().unwrap()).unwrap();

        assert_eq!(
            dump["yiiSetPathOfAlias"],
            json!({"vendor": "/srv/vendor", "local": "/srv/local"})
        );
        let keys: Vec<&str> = dump["yiiSetPathOfAlias"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["vendor", "local"]);
    }

    #[test]
    fn test_empty_params_override_keeps_web_params() {
        let marker = MemoryMarker::default();
        let sources = MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configWeb": {"params": {"adminEmail": "a@b"}}}))
            .with("local", json!({"configWeb": {"params": []}}));

        let env = resolver(sources, &marker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(
            env.config_web["params"],
            json!({"adminEmail": "a@b", "environment": "test"})
        );
    }

    struct ReadOnlyMarker;

    impl MarkerStore for ReadOnlyMarker {
        fn read(&self) -> std::io::Result<Option<String>> {
            Ok(None)
        }

        fn write_if_absent(&self, _mode: &str) -> std::io::Result<bool> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        }

        fn location(&self) -> String {
            "read-only marker".into()
        }
    }

    /// Reports the marker as already present, like a lost write race.
    struct RacedMarker;

    impl MarkerStore for RacedMarker {
        fn read(&self) -> std::io::Result<Option<String>> {
            Ok(Some("test".into()))
        }

        fn write_if_absent(&self, _mode: &str) -> std::io::Result<bool> {
            Ok(false)
        }

        fn location(&self) -> String {
            "raced marker".into()
        }
    }

    fn console_sources() -> MemorySource {
        MemorySource::new()
            .with("main", base())
            .with("mode_test", json!({"configConsole": {"name": "cli"}}))
    }

    #[test]
    fn test_marker_write_failure_aborts_resolution() {
        let err = EnvironmentResolver::from_settings(EnvironmentSettings::new("/nonexistent"))
            .with_sources(console_sources())
            .with_marker(ReadOnlyMarker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap_err();

        match err {
            EnvironmentError::ConfigWriteError { location, source } => {
                assert_eq!(location, "read-only marker");
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected ConfigWriteError, got {other:?}"),
        }
    }

    #[test]
    fn test_marker_failure_is_skipped_without_console() {
        let sources = MemorySource::new().with("main", base()).with("mode_test", json!({}));

        let env = EnvironmentResolver::from_settings(EnvironmentSettings::new("/nonexistent"))
            .with_sources(sources)
            .with_marker(ReadOnlyMarker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();
        assert!(!env.has_console());
    }

    #[test]
    fn test_marker_written_elsewhere_counts_as_success() {
        let env = EnvironmentResolver::from_settings(EnvironmentSettings::new("/nonexistent"))
            .with_sources(console_sources())
            .with_marker(RacedMarker)
            .resolve(Some("test"), ModeOrigin::Signal)
            .unwrap();

        assert_eq!(env.config_console["params"]["environment"], "test");
    }
}
