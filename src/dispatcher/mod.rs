//! # Dispatcher Module
//!
//! Resolves a route's dispatch tree into one composite view.
//!
//! ## Overview
//!
//! A route names a dispatch tree through its `dispatch` parameter. Every
//! slot of the tree is bound to a leaf controller or to another tree, and
//! the dispatcher walks the tree depth-first, in slot order, attaching each
//! result to the composite produced by the tree's own controller.
//!
//! - [`DispatchListener`] - entry point; picks pass-through, partial or full
//!   tree dispatch and runs the completion hook
//! - [`TreeDispatcher`] - the recursive resolution, plus single-slot partials
//! - [`ControllerInvoker`] - registry lookup, invocation and error translation
//! - [`DispatchContext`] - route values captured once per request
//!
//! ## Request Flow
//!
//! 1. The listener reads route name, tree, controller, action and the
//!    partial marker into a [`DispatchContext`]
//! 2. No tree, or a tree without slots: the [`FallbackDispatch`] runs the
//!    route controller on its own
//! 3. A `dispatch` request parameter names one slot: only that slot is
//!    resolved and the result is marked terminal
//! 4. Otherwise the route controller produces the `content` slot and the
//!    tree is resolved around it
//! 5. The [`CompletionHook`] records the outcome on the event
//!
//! ## Error Handling
//!
//! Every failure is a [`DispatchError`] wrapped in a [`Failure`] together
//! with the view the [`ErrorPipeline`] produced for it. A failing slot aborts
//! the whole tree unless the configuration selects
//! [`FailurePolicy::Placeholder`](crate::config::FailurePolicy), in which
//! case the slot is replaced by the placeholder template and its siblings
//! still run.
//!
//! ```rust
//! use std::sync::Arc;
//! use viewtree::config::DispatchConfig;
//! use viewtree::controller::ControllerManager;
//! use viewtree::dispatcher::DispatchListener;
//! use viewtree::event::{DispatchEvent, Request};
//! use viewtree::router::RouteMatch;
//!
//! let listener = DispatchListener::new(
//!     Arc::new(DispatchConfig::default()),
//!     Arc::new(ControllerManager::new()),
//! );
//! let mut event = DispatchEvent::new(Request::new(), RouteMatch::new("home"));
//! let outcome = listener.on_dispatch(&mut event);
//! assert_eq!(outcome.unwrap_err().status().as_u16(), 404);
//! ```

mod context;
mod error;
mod invoker;
mod listener;
mod pipeline;
mod tree;

pub use context::{DispatchContext, CONTENT_SLOT, NOT_FOUND, SLOT_ACTION};
pub use error::{DispatchError, Failure, Outcome};
pub use invoker::ControllerInvoker;
pub use listener::DispatchListener;
pub use pipeline::{
    CompletionHook, DefaultErrorPipeline, ErrorPipeline, EventCompletion, FallbackDispatch,
    SingleControllerDispatch,
};
pub use tree::TreeDispatcher;
