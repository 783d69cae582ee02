//! Route match context: the matched route name plus its named parameters.

use serde::Deserialize;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of route parameters before heap allocation.
/// Dispatch routes carry `controller`, `action`, `dispatch` and a few extras.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` because they repeat across requests
/// (`controller`, `action`, ...) while values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Route parameter naming the content controller.
pub const PARAM_CONTROLLER: &str = "controller";
/// Route parameter naming the action the next controller should run.
pub const PARAM_ACTION: &str = "action";
/// Route parameter naming the dispatch tree for the route.
pub const PARAM_DISPATCH: &str = "dispatch";
/// Route parameter set to `"true"` while a partial is being resolved.
pub const PARAM_PARTIAL: &str = "partial";

/// Result of matching a request to a named route.
///
/// Unlike the URL matcher that produced it, the dispatch layer only cares
/// about the route name and its parameters. The `action` parameter is
/// rewritten while a tree is walked, so a `RouteMatch` belongs to exactly
/// one request.
#[derive(Debug, Clone, Default)]
pub struct RouteMatch {
    route_name: String,
    params: ParamVec,
}

impl RouteMatch {
    #[must_use]
    pub fn new(route_name: impl Into<String>) -> Self {
        Self {
            route_name: route_name.into(),
            params: ParamVec::new(),
        }
    }

    /// Builder-style parameter insertion.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn matched_route_name(&self) -> &str {
        &self.route_name
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics if a name was pushed more than once.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a parameter, falling back to `default` when absent.
    #[inline]
    #[must_use]
    pub fn get_param_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_param(name).unwrap_or(default)
    }

    /// Set or overwrite a parameter in place.
    pub fn set_param(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().rfind(|(k, _)| k.as_ref() == name) {
            Some((_, v)) => *v = value,
            None => self.params.push((Arc::from(name), value)),
        }
    }

    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }
}

/// Parameter defaults declared for one route in configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDefinition {
    /// URL pattern, informational only: URL matching happens upstream.
    #[serde(default)]
    pub path: Option<String>,
    /// Parameter defaults (`dispatch`, `controller`, `action`, ...).
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

/// Named route table.
///
/// Produces a [`RouteMatch`] from a route name and the route's configured
/// defaults. Turning a URL into a route name is the host framework's job.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: HashMap<String, RouteDefinition>,
}

impl Router {
    #[must_use]
    pub fn new(routes: HashMap<String, RouteDefinition>) -> Self {
        info!(routes_count = routes.len(), "Route table loaded");
        Self { routes }
    }

    /// Build the route match for `route_name`, or `None` if it is unknown.
    #[must_use]
    pub fn route(&self, route_name: &str) -> Option<RouteMatch> {
        let Some(definition) = self.routes.get(route_name) else {
            warn!(route = %route_name, "No route with this name");
            return None;
        };

        let route_match = definition
            .defaults
            .iter()
            .fold(RouteMatch::new(route_name), |m, (k, v)| {
                m.with_param(k, v.as_str())
            });

        debug!(
            route = %route_name,
            params = ?route_match.params(),
            "Route matched by name"
        );
        Some(route_match)
    }

    /// Route names in sorted order.
    #[must_use]
    pub fn route_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
