//! # Controller Module
//!
//! The seam between the dispatcher and application code.
//!
//! - [`Controller`] - one leaf unit: builds a [`Rendered`](crate::view::Rendered)
//!   for the request. Closures `Fn(&DispatchEvent) -> anyhow::Result<Rendered>`
//!   are controllers too.
//! - [`ControllerRegistry`] - identity lookup; distinguishes "not registered"
//!   from "registered but invalid".
//! - [`ControllerManager`] - the in-memory registry used by the bundled
//!   application and the tests.
//!
//! Dispatch tree names are registered as controllers as well: the controller
//! registered under a tree's name produces the tree's composite shell.

mod core;

pub use core::{
    Controller, ControllerFactory, ControllerManager, ControllerRegistry, InvalidController,
    RegistryError,
};
