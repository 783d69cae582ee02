use std::path::PathBuf;
use thiserror::Error;

use super::load::ConfigFormat;

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of yaml, yml, json, toml.
    #[error("cannot determine config format of '{path}' (expected .yaml, .yml, .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    /// The content is not valid for its format or does not fit the schema.
    #[error("invalid {format} config: {message}")]
    Parse {
        format: ConfigFormat,
        message: String,
    },

    /// A dispatch tree reaches itself through its slots.
    #[error("dispatch trees form a cycle{}: {}", cycle_scope(.route), .path.join(" -> "))]
    Cycle {
        route: Option<String>,
        path: Vec<String>,
    },
}

fn cycle_scope(route: &Option<String>) -> String {
    route
        .as_deref()
        .map(|r| format!(" on route '{r}'"))
        .unwrap_or_default()
}

impl ConfigError {
    pub(crate) fn parse(format: ConfigFormat, message: impl ToString) -> Self {
        Self::Parse {
            format,
            message: message.to_string(),
        }
    }
}
