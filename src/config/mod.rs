//! # Config Module
//!
//! Dispatch configuration: which slots make up each dispatch tree, and how
//! individual routes override them.
//!
//! ## Layout
//!
//! ```yaml
//! dispatch:
//!   failure_policy: abort        # or: placeholder
//!   defaults:                    # tree -> slot -> controller or tree
//!     Dispatch\Main:
//!       header: Layout\Header
//!       sidebar: Dispatch\Sidebar
//!       footer: Layout\Footer
//!     Dispatch\Sidebar:
//!       basket: Layout\Basket
//!   routes:                      # route -> tree -> slot overrides
//!     home:
//!       Dispatch\Main:
//!         header: Layout\AlternativeHeader
//! ```
//!
//! A binding names a nested tree exactly when it is a key of
//! `dispatch.defaults`. The classification is done once, at load time, into
//! [`SlotBinding`], and the configuration is rejected if trees reach
//! themselves.
//!
//! ## Merge rule
//!
//! [`DispatchConfig::resolve_slots`] merges the route's overrides over the
//! tree defaults. Overridden slots keep their default position; slots only
//! the route declares are appended.

mod core;
mod error;
mod load;
#[cfg(test)]
mod tests;

pub use core::{DispatchConfig, FailurePolicy, SlotBinding, SlotMap, DEFAULT_PLACEHOLDER_TEMPLATE};
pub use error::ConfigError;
pub use load::{AppConfig, ConfigFormat, ViewManagerConfig};
