//! # Runtime Configuration Module
//!
//! Environment overrides applied on top of the configuration file.
//!
//! ## Environment Variables
//!
//! ### `VIEWTREE_FAILURE_POLICY`
//!
//! `abort` or `placeholder`. Replaces `dispatch.failure_policy`.
//!
//! ### `VIEWTREE_DISPLAY_EXCEPTIONS`
//!
//! `true` or `false`. Replaces `view_manager.display_exceptions`, so error
//! details can be switched off in production without editing the file.
//!
//! Unparseable values are logged and ignored.
//!
//! ## Usage
//!
//! ```rust
//! use viewtree::config::AppConfig;
//! use viewtree::runtime_config::RuntimeConfig;
//!
//! let mut config = AppConfig::default();
//! RuntimeConfig::from_env().apply(&mut config);
//! ```

use std::env;
use tracing::{info, warn};

use crate::config::{AppConfig, FailurePolicy};

pub const FAILURE_POLICY_VAR: &str = "VIEWTREE_FAILURE_POLICY";
pub const DISPLAY_EXCEPTIONS_VAR: &str = "VIEWTREE_DISPLAY_EXCEPTIONS";

/// Overrides read from the environment; `None` leaves the file value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub failure_policy: Option<FailurePolicy>,
    pub display_exceptions: Option<bool>,
}

impl RuntimeConfig {
    /// Load overrides from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let failure_policy = lookup(FAILURE_POLICY_VAR).and_then(|value| {
            let policy = FailurePolicy::parse(&value);
            if policy.is_none() {
                warn!(variable = FAILURE_POLICY_VAR, value = %value, "Ignoring unknown failure policy");
            }
            policy
        });
        let display_exceptions = lookup(DISPLAY_EXCEPTIONS_VAR).and_then(|value| {
            match value.trim().to_lowercase().parse::<bool>() {
                Ok(flag) => Some(flag),
                Err(_) => {
                    warn!(variable = DISPLAY_EXCEPTIONS_VAR, value = %value, "Ignoring non-boolean value");
                    None
                }
            }
        });
        Self {
            failure_policy,
            display_exceptions,
        }
    }

    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(policy) = self.failure_policy {
            info!(failure_policy = ?policy, "Failure policy overridden from environment");
            config.dispatch = std::mem::take(&mut config.dispatch).with_failure_policy(policy);
        }
        if let Some(flag) = self.display_exceptions {
            info!(display_exceptions = flag, "Exception display overridden from environment");
            config.view_manager.display_exceptions = flag;
        }
    }
}
