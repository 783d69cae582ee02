//! Configuration file loading.
//!
//! YAML, JSON and TOML are accepted; the format is picked from the file
//! extension. Slot order is taken from the file for every format.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::info;

use super::core::{DispatchConfig, FailurePolicy};
use super::error::ConfigError;
use crate::router::{RouteDefinition, Router};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Infer the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
        })
    }
}

/// Settings of the view layer: error templates and the page layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewManagerConfig {
    /// Expose why a controller was not found on the 404 page.
    pub display_not_found_reason: bool,
    /// Expose the cause of a controller error on the error page.
    pub display_exceptions: bool,
    pub not_found_template: String,
    pub exception_template: String,
    /// Template wrapping every non-terminal page.
    pub layout: String,
}

impl Default for ViewManagerConfig {
    fn default() -> Self {
        Self {
            display_not_found_reason: false,
            display_exceptions: false,
            not_found_template: "error/404".to_string(),
            exception_template: "error/index".to_string(),
            layout: "layout/layout".to_string(),
        }
    }
}

/// Everything a configuration file declares.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub dispatch: DispatchConfig,
    pub view_manager: ViewManagerConfig,
    pub router: Router,
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, format)?;
        info!(
            path = %path.display(),
            format = %format,
            trees = config.dispatch.tree_names().len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let raw: RawAppConfig = match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| ConfigError::parse(format, e))?
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfigError::parse(format, e))?
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::parse(format, e))?
            }
        };
        raw.into_config()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAppConfig {
    dispatch: RawDispatch,
    view_manager: ViewManagerConfig,
    router: RawRouter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDispatch {
    defaults: HashMap<String, OrderedSlots>,
    routes: HashMap<String, HashMap<String, OrderedSlots>>,
    failure_policy: FailurePolicy,
    placeholder_template: Option<String>,
    nested_partials: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRouter {
    routes: HashMap<String, RouteDefinition>,
}

impl RawAppConfig {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let RawDispatch {
            defaults,
            routes,
            failure_policy,
            placeholder_template,
            nested_partials,
        } = self.dispatch;

        let defaults = defaults.into_iter().map(|(k, v)| (k, v.0)).collect();
        let routes = routes
            .into_iter()
            .map(|(route, trees)| (route, trees.into_iter().map(|(k, v)| (k, v.0)).collect()))
            .collect();

        let mut dispatch = DispatchConfig::from_bindings(defaults, routes)?
            .with_failure_policy(failure_policy)
            .with_nested_partials(nested_partials);
        if let Some(template) = placeholder_template {
            dispatch = dispatch.with_placeholder_template(template);
        }

        Ok(AppConfig {
            dispatch,
            view_manager: self.view_manager,
            router: Router::new(self.router.routes),
        })
    }
}

/// Slot bindings in file order. A null value (`Dispatch\Empty:` in YAML) is
/// an empty mapping.
#[derive(Debug, Default)]
struct OrderedSlots(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedSlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotsVisitor;

        impl<'de> Visitor<'de> for SlotsVisitor {
            type Value = OrderedSlots;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of slot names to controller or dispatch tree names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut slots = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((slot, identity)) = access.next_entry::<String, String>()? {
                    slots.push((slot, identity));
                }
                Ok(OrderedSlots(slots))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedSlots::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedSlots::default())
            }
        }

        deserializer.deserialize_any(SlotsVisitor)
    }
}
