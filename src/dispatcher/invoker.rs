use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::{DispatchError, Failure, Outcome};
use super::pipeline::ErrorPipeline;
use crate::controller::{ControllerRegistry, RegistryError};
use crate::event::DispatchEvent;
use crate::router::PARAM_ACTION;

/// Looks controllers up in the registry, runs them and turns every failure
/// into a [`Failure`] carrying the error pipeline's fallback.
#[derive(Clone)]
pub struct ControllerInvoker {
    registry: Arc<dyn ControllerRegistry>,
    errors: Arc<dyn ErrorPipeline>,
}

impl ControllerInvoker {
    #[must_use]
    pub fn new(registry: Arc<dyn ControllerRegistry>, errors: Arc<dyn ErrorPipeline>) -> Self {
        Self { registry, errors }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<dyn ControllerRegistry> {
        &self.registry
    }

    /// Run `action` on the controller registered as `identity`.
    ///
    /// The `action` route parameter is overwritten before the lookup, so a
    /// failing lookup still leaves the event showing what was attempted.
    pub fn invoke(&self, event: &mut DispatchEvent, identity: &str, action: &str) -> Outcome {
        event.route_match.set_param(PARAM_ACTION, action);

        if !self.registry.has(identity) {
            warn!(controller = %identity, action = %action, "Controller not registered");
            return Err(self.fail(
                event,
                DispatchError::ControllerNotFound {
                    controller: identity.to_string(),
                },
            ));
        }

        let controller = match self.registry.get(identity) {
            Ok(controller) => controller,
            Err(err) => {
                if matches!(err, RegistryError::Construction { .. }) {
                    error!(controller = %identity, error = %err, "Controller construction failed");
                } else {
                    warn!(controller = %identity, error = %err, "Controller lookup failed");
                }
                return Err(self.fail(event, err.into()));
            }
        };

        debug!(
            controller = %identity,
            action = %action,
            controller_class = controller.type_name(),
            "Invoking controller"
        );
        match controller.dispatch(event) {
            Ok(result) => Ok(result),
            Err(source) => {
                error!(
                    controller = %identity,
                    action = %action,
                    controller_class = controller.type_name(),
                    error = %source,
                    "Controller raised an error"
                );
                Err(self.fail(
                    event,
                    DispatchError::Exception {
                        controller: identity.to_string(),
                        controller_class: controller.type_name(),
                        source,
                    },
                ))
            }
        }
    }

    /// Attach `error` to the event and run the error pipeline.
    ///
    /// The fallback is the pipeline's result, or the event's existing result
    /// when the pipeline produces nothing.
    pub fn fail(&self, event: &mut DispatchEvent, error: DispatchError) -> Failure {
        event.set_error(error.descriptor());
        let fallback = self
            .errors
            .dispatch_error(event, &error)
            .or_else(|| event.result().cloned());
        Failure::new(error, fallback)
    }
}
