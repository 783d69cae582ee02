//! # viewtree
//!
//! **viewtree** assembles a page from many controllers. A route names a
//! *dispatch tree*; each slot of the tree (header, sidebar, footer, ...) is
//! bound to a leaf controller or to another tree, and the dispatcher walks
//! the tree to build one composite view per request.
//!
//! ## Overview
//!
//! Instead of one route mapping to one controller action, the `dispatch`
//! configuration declares which controllers fill which slots:
//!
//! ```yaml
//! dispatch:
//!   defaults:
//!     Dispatch\Main: { header: Layout\Header, sidebar: Dispatch\Sidebar, footer: Layout\Footer }
//!     Dispatch\Sidebar: { basket: Layout\Basket }
//!   routes:
//!     promo:
//!       Dispatch\Main: { header: Layout\AlternativeHeader }
//! ```
//!
//! The route's own controller fills the reserved `content` slot. A request
//! carrying `dispatch=<slot>` in its form data or query string asks for that
//! one slot only (an AJAX refresh of the basket, say) and gets it back
//! without the page layout.
//!
//! ## Architecture
//!
//! - **[`config`]** - loading, per-route merge and cycle check of dispatch trees
//! - **[`router`]** - route matches and the route table of the configuration
//! - **[`event`]** - the per-request dispatch event
//! - **[`controller`]** - the controller and registry seams
//! - **[`dispatcher`]** - tree resolution, partials and error translation
//! - **[`view`]** - view models and minijinja rendering
//! - **[`cli`]** - `viewtree inspect | validate | dispatch`
//! - **[`logging`]** / **[`runtime_config`]** - environment driven setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Listener as DispatchListener
//!     participant Tree as TreeDispatcher
//!     participant Invoker as ControllerInvoker
//!     participant Registry as ControllerRegistry
//!     participant Errors as ErrorPipeline
//!
//!     Caller->>Listener: on_dispatch(&mut event)
//!     Listener->>Listener: DispatchContext::from_event
//!     alt no tree for the route
//!         Listener->>Invoker: route controller + action
//!     else dispatch=<slot>
//!         Listener->>Tree: resolve_partial(slot)
//!         Tree->>Invoker: slot controller, action "dispatch"
//!     else full page
//!         Listener->>Invoker: route controller + action (content)
//!         Listener->>Tree: resolve_tree(tree, content)
//!         Tree->>Invoker: tree shell, action "dispatch"
//!         loop every slot in order
//!             Tree->>Tree: resolve_tree(sub-tree)
//!             Tree->>Invoker: leaf controller, action "dispatch"
//!         end
//!     end
//!     Invoker->>Registry: has / get
//!     Invoker-->>Errors: on failure
//!     Errors-->>Invoker: fallback view, status
//!     Listener->>Listener: CompletionHook::complete
//!     Listener-->>Caller: Outcome
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use viewtree::config::{AppConfig, ConfigFormat};
//! use viewtree::dispatcher::DispatchListener;
//! use viewtree::event::{DispatchEvent, Request};
//! use viewtree::registry::demo_registry;
//!
//! let config = AppConfig::parse(
//!     r#"
//! dispatch:
//!   defaults:
//!     Dispatch\Main: { header: Layout\Header, footer: Layout\Footer }
//! router:
//!   routes:
//!     home:
//!       defaults: { dispatch: Dispatch\Main, controller: Page\Index, action: index }
//! "#,
//!     ConfigFormat::Yaml,
//! )?;
//!
//! let listener = DispatchListener::new(Arc::new(config.dispatch), Arc::new(demo_registry()));
//! let route = config.router.route("home").ok_or("no route")?;
//! let mut event = DispatchEvent::new(Request::new(), route);
//!
//! let page = listener.on_dispatch(&mut event)?.into_view().ok_or("not a view")?;
//! assert_eq!(page.child_slots(), vec!["content", "header", "footer"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Demo Application
//!
//! `config/dispatch.yaml` and `views/` hold a small application built from
//! the controllers in [`controllers`]:
//!
//! ```bash
//! viewtree dispatch --config config/dispatch.yaml --views views
//! viewtree dispatch --config config/dispatch.yaml --query dispatch=sidebar --post item=apple
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod controllers;
pub mod dispatcher;
pub mod event;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod view;

pub use config::{AppConfig, DispatchConfig, FailurePolicy, SlotBinding};
pub use controller::{Controller, ControllerManager, ControllerRegistry};
pub use dispatcher::{DispatchError, DispatchListener, Failure, Outcome};
pub use event::{DispatchEvent, Request};
pub use view::{Rendered, ViewModel};
