//! # CLI Module
//!
//! Command-line tools for dispatch configurations.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Print every dispatch tree and the effective slot mapping of each route:
//!
//! ```bash
//! viewtree inspect --config config/dispatch.yaml
//! viewtree inspect --config config/dispatch.yaml --route home
//! ```
//!
//! ### `validate`
//!
//! Check that every tree, slot and route identity is a registered controller:
//!
//! ```bash
//! viewtree validate --config config/dispatch.yaml
//! ```
//!
//! ### `dispatch`
//!
//! Dispatch one request against the demo controllers and render it:
//!
//! ```bash
//! viewtree dispatch --config config/dispatch.yaml --views views
//! viewtree dispatch --config config/dispatch.yaml --query dispatch=sidebar --post item=apple
//! viewtree dispatch --config config/dispatch.yaml --json
//! ```
//!
//! `--config` can also come from `VIEWTREE_CONFIG`. The overrides of
//! [`RuntimeConfig`](crate::runtime_config::RuntimeConfig) apply to every
//! command.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{dispatch, inspect, run, run_cli, validate, Cli, Commands};
