//! # View Module
//!
//! Result types produced by controllers and assembled by the dispatcher:
//!
//! - [`ViewModel`] - a template plus variables, owning named child views
//! - [`Response`] - a finished response that cannot be embedded in a page
//! - [`Rendered`] - either of the two, as returned by a controller
//!
//! [`TemplateRenderer`] turns a composed view tree into HTML with minijinja.

mod core;
mod render;

pub use core::{HeaderVec, Rendered, Response, ViewModel, MAX_INLINE_HEADERS};
pub use render::{RenderError, TemplateRenderer, TEMPLATE_SUFFIX};
