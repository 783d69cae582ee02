//! # Router Module
//!
//! Route match context consumed by the dispatch layer.
//!
//! URL matching belongs to the host framework. What reaches the dispatcher is
//! a [`RouteMatch`]: the matched route name and its named parameters, of which
//! three are significant here:
//!
//! - `controller` - identity of the controller producing the page content
//! - `action` - action the next invoked controller runs; rewritten per slot
//! - `dispatch` - name of the dispatch tree composing the page
//!
//! [`Router`] is a name-indexed route table built from the `router.routes`
//! configuration section, used by the CLI and tests to build route matches.
//!
//! ```rust
//! use viewtree::router::{RouteMatch, PARAM_ACTION};
//!
//! let mut m = RouteMatch::new("home").with_param(PARAM_ACTION, "index");
//! m.set_param(PARAM_ACTION, "dispatch");
//! assert_eq!(m.get_param(PARAM_ACTION), Some("dispatch"));
//! ```

mod core;

pub use core::{
    ParamVec, RouteDefinition, RouteMatch, Router, MAX_INLINE_PARAMS, PARAM_ACTION,
    PARAM_CONTROLLER, PARAM_DISPATCH, PARAM_PARTIAL,
};
