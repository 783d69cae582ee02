use crate::event::DispatchEvent;
use crate::router::{PARAM_ACTION, PARAM_CONTROLLER, PARAM_DISPATCH};

/// Slot reserved for the route's own controller result.
pub const CONTENT_SLOT: &str = "content";

/// Action used when invoking tree shells and slot controllers.
pub const SLOT_ACTION: &str = "dispatch";

/// Controller and action used when the route does not name one.
pub const NOT_FOUND: &str = "not-found";

/// Per-request values read once from the event when dispatch starts.
///
/// The invoker overwrites the `action` route parameter while the tree is
/// walked, so the route's own action is captured here first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchContext {
    pub route_name: String,
    pub tree: Option<String>,
    pub controller: String,
    pub action: String,
    pub partial: Option<String>,
}

impl DispatchContext {
    #[must_use]
    pub fn from_event(event: &DispatchEvent) -> Self {
        let route = &event.route_match;
        Self {
            route_name: route.matched_route_name().to_string(),
            tree: route
                .get_param(PARAM_DISPATCH)
                .filter(|tree| !tree.is_empty())
                .map(str::to_string),
            controller: route.get_param_or(PARAM_CONTROLLER, NOT_FOUND).to_string(),
            action: route.get_param_or(PARAM_ACTION, NOT_FOUND).to_string(),
            partial: event.request.partial_marker().map(str::to_string),
        }
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.partial.is_some()
    }
}
