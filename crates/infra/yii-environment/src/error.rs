use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Missing configuration: {what}")]
    ConfigMissing { what: String },

    #[error("Invalid environment mode supplied or selected: '{mode}'")]
    InvalidMode { mode: String },

    #[error("Inherited value not found in web config at path: {path}")]
    PathNotFound { path: String },

    #[error("Cannot write environment mode marker {location}: {source}")]
    ConfigWriteError {
        location: String,
        source: std::io::Error,
    },

    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Failed to parse config source '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnvironmentError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Self::ConfigMissing { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, EnvironmentError>;
