//! # Event Module
//!
//! The per-request [`DispatchEvent`]: the inbound [`Request`], the
//! [`RouteMatch`](crate::router::RouteMatch), the response status, the last
//! recorded result and, after a failure, an [`ErrorDescriptor`].
//!
//! Everything that changes while a dispatch tree is walked lives here, so
//! the listener and dispatchers can be shared between concurrent requests.

mod core;

pub use core::{DispatchEvent, ErrorDescriptor, ErrorKind, Request, PARTIAL_PARAM};
