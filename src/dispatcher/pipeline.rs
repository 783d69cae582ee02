use tracing::{debug, error};

use super::context::NOT_FOUND;
use super::error::{DispatchError, Outcome};
use super::invoker::ControllerInvoker;
use crate::config::ViewManagerConfig;
use crate::event::DispatchEvent;
use crate::router::{PARAM_ACTION, PARAM_CONTROLLER};
use crate::view::{Rendered, ViewModel};

/// Turns a dispatch error into something to show the user.
///
/// Called with the error descriptor already attached to the event. May set
/// the response status. Returning `None` leaves the event's current result
/// as the fallback.
pub trait ErrorPipeline: Send + Sync {
    fn dispatch_error(&self, event: &mut DispatchEvent, error: &DispatchError) -> Option<Rendered>;
}

/// The one-controller dispatch used for routes without a dispatch tree.
pub trait FallbackDispatch: Send + Sync {
    fn dispatch(&self, event: &mut DispatchEvent) -> Outcome;
}

/// Final step of every dispatch.
pub trait CompletionHook: Send + Sync {
    fn complete(&self, outcome: Outcome, event: &mut DispatchEvent) -> Outcome;
}

/// Error pages driven by the `view_manager` configuration section.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorPipeline {
    view_manager: ViewManagerConfig,
}

impl DefaultErrorPipeline {
    #[must_use]
    pub fn new(view_manager: ViewManagerConfig) -> Self {
        Self { view_manager }
    }
}

impl ErrorPipeline for DefaultErrorPipeline {
    fn dispatch_error(&self, event: &mut DispatchEvent, error: &DispatchError) -> Option<Rendered> {
        event.set_status(error.status());

        let kind = error.kind();
        let mut view = if kind.is_not_found() {
            let mut view = ViewModel::with_template(&self.view_manager.not_found_template)
                .with_variable("message", "Page not found.");
            if self.view_manager.display_not_found_reason {
                view.set_variable("reason", kind.as_str());
                view.set_variable("controller", error.identity());
            }
            view
        } else {
            let mut view = ViewModel::with_template(&self.view_manager.exception_template)
                .with_variable("message", "An error occurred during execution; please try again later.");
            if self.view_manager.display_exceptions {
                view.set_variable("exception", error.to_string());
                view.set_variable("controller", error.identity());
                if let Some(class) = event.error().and_then(|e| e.controller_class) {
                    view.set_variable("controller_class", class);
                }
            }
            view
        };
        view.set_variable("request_id", event.request_id().to_string());

        debug!(
            request_id = %event.request_id(),
            reason = %kind,
            status = event.status().as_u16(),
            "Rendering error view"
        );
        Some(view.into())
    }
}

/// Dispatches the route's controller and action, nothing else.
#[derive(Clone)]
pub struct SingleControllerDispatch {
    invoker: ControllerInvoker,
}

impl SingleControllerDispatch {
    #[must_use]
    pub fn new(invoker: ControllerInvoker) -> Self {
        Self { invoker }
    }
}

impl FallbackDispatch for SingleControllerDispatch {
    fn dispatch(&self, event: &mut DispatchEvent) -> Outcome {
        let controller = event
            .route_match
            .get_param_or(PARAM_CONTROLLER, NOT_FOUND)
            .to_string();
        let action = event
            .route_match
            .get_param(PARAM_ACTION)
            .filter(|action| !action.is_empty())
            .unwrap_or(NOT_FOUND)
            .to_string();
        debug!(controller = %controller, action = %action, "Single controller dispatch");
        self.invoker.invoke(event, &controller, &action)
    }
}

/// Records the final result, or the failure's fallback, on the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventCompletion;

impl CompletionHook for EventCompletion {
    fn complete(&self, outcome: Outcome, event: &mut DispatchEvent) -> Outcome {
        match &outcome {
            Ok(result) => event.set_result(result.clone()),
            Err(failure) => {
                if let Some(fallback) = &failure.fallback {
                    event.set_result(fallback.clone());
                }
                if failure.error.kind().is_not_found() {
                    debug!(error = %failure.error, "Dispatch finished with not-found");
                } else {
                    error!(error = %failure.error, "Dispatch finished with error");
                }
            }
        }
        outcome
    }
}
