use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::DispatchEvent;
use crate::view::Rendered;

/// A leaf unit of work: build a view (or a response) for the current request.
///
/// The action to run is the `action` route parameter, which the dispatcher
/// sets before every invocation (`dispatch` for slots, the route's own
/// action for the page content).
pub trait Controller: Send + Sync {
    fn dispatch(&self, event: &DispatchEvent) -> anyhow::Result<Rendered>;

    /// Concrete type name, recorded on the event when the controller fails.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Controller for F
where
    F: Fn(&DispatchEvent) -> anyhow::Result<Rendered> + Send + Sync,
{
    fn dispatch(&self, event: &DispatchEvent) -> anyhow::Result<Rendered> {
        self(event)
    }
}

/// Returned by a controller factory to signal that what it would build is
/// not a usable controller. Reported as [`RegistryError::Invalid`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidController(pub String);

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("controller '{identity}' is not registered")]
    NotFound { identity: String },

    #[error("controller '{identity}' is invalid: {reason}")]
    Invalid { identity: String, reason: String },

    #[error("controller '{identity}' could not be created: {source}")]
    Construction {
        identity: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Lookup of controllers by identity.
pub trait ControllerRegistry: Send + Sync {
    fn has(&self, identity: &str) -> bool;

    fn get(&self, identity: &str) -> Result<Arc<dyn Controller>, RegistryError>;
}

/// Builds a controller on demand.
pub type ControllerFactory = Arc<dyn Fn() -> anyhow::Result<Arc<dyn Controller>> + Send + Sync>;

/// In-memory [`ControllerRegistry`] of named factories.
#[derive(Clone, Default)]
pub struct ControllerManager {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared controller instance under `identity`.
    pub fn register<C>(&mut self, identity: &str, controller: C)
    where
        C: Controller + 'static,
    {
        let controller: Arc<dyn Controller> = Arc::new(controller);
        self.register_factory(identity, move || Ok(Arc::clone(&controller)));
    }

    /// Register a factory invoked on every lookup of `identity`.
    ///
    /// A factory error downcasting to [`InvalidController`] is reported as
    /// [`RegistryError::Invalid`], any other as
    /// [`RegistryError::Construction`].
    pub fn register_factory<F>(&mut self, identity: &str, factory: F)
    where
        F: Fn() -> anyhow::Result<Arc<dyn Controller>> + Send + Sync + 'static,
    {
        if self
            .factories
            .insert(identity.to_string(), Arc::new(factory))
            .is_some()
        {
            warn!(controller = %identity, "Replaced existing controller registration");
        } else {
            info!(
                controller = %identity,
                total_controllers = self.factories.len(),
                "Controller registered"
            );
        }
    }

    /// Registered identities, sorted.
    #[must_use]
    pub fn identities(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ControllerRegistry for ControllerManager {
    fn has(&self, identity: &str) -> bool {
        self.factories.contains_key(identity)
    }

    fn get(&self, identity: &str) -> Result<Arc<dyn Controller>, RegistryError> {
        let factory = self
            .factories
            .get(identity)
            .ok_or_else(|| RegistryError::NotFound {
                identity: identity.to_string(),
            })?;

        debug!(controller = %identity, "Creating controller");
        factory().map_err(|err| match err.downcast::<InvalidController>() {
            Ok(invalid) => RegistryError::Invalid {
                identity: identity.to_string(),
                reason: invalid.0,
            },
            Err(source) => RegistryError::Construction {
                identity: identity.to_string(),
                source,
            },
        })
    }
}
