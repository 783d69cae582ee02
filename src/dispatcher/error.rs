use http::StatusCode;
use thiserror::Error;

use crate::controller::RegistryError;
use crate::event::{ErrorDescriptor, ErrorKind};
use crate::view::Rendered;

/// Why a dispatch (or one slot of it) did not produce a result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("controller '{controller}' is not registered")]
    ControllerNotFound { controller: String },

    #[error("controller '{controller}' is invalid: {reason}")]
    ControllerInvalid { controller: String, reason: String },

    #[error("controller '{controller}' could not be created: {source}")]
    BadController {
        controller: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("controller '{controller}' failed: {source}")]
    Exception {
        controller: String,
        controller_class: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("slot '{slot}' is not declared in dispatch tree '{tree}'")]
    PartialNotFound { tree: String, slot: String },

    #[error("dispatch tree '{tree}' has no slots and no content")]
    EmptyTree { tree: String },
}

impl DispatchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::ControllerNotFound { .. } => ErrorKind::ControllerNotFound,
            DispatchError::ControllerInvalid { .. } => ErrorKind::ControllerInvalid,
            DispatchError::BadController { .. } | DispatchError::Exception { .. } => {
                ErrorKind::Exception
            }
            DispatchError::PartialNotFound { .. } => ErrorKind::PartialNotFound,
            DispatchError::EmptyTree { .. } => ErrorKind::EmptyTree,
        }
    }

    /// Response status for this error: 404 for the not-found family, 500 for
    /// controller failures.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.kind().is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// The controller, tree or slot the error is about.
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            DispatchError::ControllerNotFound { controller }
            | DispatchError::ControllerInvalid { controller, .. }
            | DispatchError::BadController { controller, .. }
            | DispatchError::Exception { controller, .. } => controller,
            DispatchError::PartialNotFound { slot, .. } => slot,
            DispatchError::EmptyTree { tree } => tree,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> ErrorDescriptor {
        let controller_class = match self {
            DispatchError::Exception {
                controller_class, ..
            } => Some(*controller_class),
            _ => None,
        };
        ErrorDescriptor {
            kind: self.kind(),
            controller: self.identity().to_string(),
            controller_class,
            message: self.to_string(),
        }
    }
}

impl From<RegistryError> for DispatchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { identity } => DispatchError::ControllerNotFound {
                controller: identity,
            },
            RegistryError::Invalid { identity, reason } => DispatchError::ControllerInvalid {
                controller: identity,
                reason,
            },
            RegistryError::Construction { identity, source } => DispatchError::BadController {
                controller: identity,
                source,
            },
        }
    }
}

/// A failed dispatch: the error plus whatever the error pipeline produced
/// to show instead (a 404 page, an exception page, or nothing).
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Failure {
    pub error: DispatchError,
    pub fallback: Option<Rendered>,
}

impl Failure {
    #[must_use]
    pub fn new(error: DispatchError, fallback: Option<Rendered>) -> Self {
        Self { error, fallback }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.error.status()
    }
}

/// Result of resolving a dispatch, a tree or a single slot.
pub type Outcome = Result<Rendered, Failure>;
