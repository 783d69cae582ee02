use http::StatusCode;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::ids::RequestId;
use crate::router::{ParamVec, RouteMatch};
use crate::view::Rendered;

/// Request parameter selecting a partial dispatch.
pub const PARTIAL_PARAM: &str = "dispatch";

/// The inbound request as seen by the dispatch layer: posted form fields
/// and query string.
#[derive(Debug, Clone, Default)]
pub struct Request {
    post_params: ParamVec,
    query_params: ParamVec,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request with the given `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        Self {
            query_params: parse_urlencoded(query),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_post(mut self, name: &str, value: impl Into<String>) -> Self {
        self.post_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query_params.push((Arc::from(name), value.into()));
        self
    }

    /// Replace the posted form fields with a urlencoded body.
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.post_params = parse_urlencoded(body);
        self
    }

    /// Posted form field, last occurrence wins.
    #[inline]
    #[must_use]
    pub fn post(&self, name: &str) -> Option<&str> {
        lookup(&self.post_params, name)
    }

    /// Query string parameter, last occurrence wins.
    #[inline]
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        lookup(&self.query_params, name)
    }

    /// Posted value if present, otherwise the query string value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.post(name).or_else(|| self.query(name))
    }

    /// The slot named by the partial marker, if the request asks for one.
    ///
    /// Post data takes precedence over the query string; an empty value is
    /// the same as no marker.
    #[must_use]
    pub fn partial_marker(&self) -> Option<&str> {
        self.param(PARTIAL_PARAM).filter(|slot| !slot.is_empty())
    }
}

fn lookup<'a>(params: &'a ParamVec, name: &str) -> Option<&'a str> {
    params
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

fn parse_urlencoded(input: &str) -> ParamVec {
    url::form_urlencoded::parse(input.trim_start_matches('?').as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Category of a dispatch error, as recorded on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ControllerNotFound,
    ControllerInvalid,
    Exception,
    PartialNotFound,
    EmptyTree,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ControllerNotFound => "error-controller-not-found",
            ErrorKind::ControllerInvalid => "error-controller-invalid",
            ErrorKind::Exception => "error-exception",
            ErrorKind::PartialNotFound => "error-partial-not-found",
            ErrorKind::EmptyTree => "error-empty-dispatch",
        }
    }

    /// Not-found kinds render through the 404 template; the rest through
    /// the exception template.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ErrorKind::Exception)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to the event for the error pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    /// Controller, tree or slot the error is about.
    pub controller: String,
    /// Concrete controller type, when one was constructed.
    pub controller_class: Option<&'static str>,
    pub message: String,
}

/// Per-request dispatch state shared by every step of one dispatch.
///
/// Owned by the request; the dispatcher itself keeps nothing between
/// requests.
#[derive(Debug, Clone)]
pub struct DispatchEvent {
    request_id: RequestId,
    pub request: Request,
    pub route_match: RouteMatch,
    error: Option<ErrorDescriptor>,
    result: Option<Rendered>,
    status: StatusCode,
}

impl DispatchEvent {
    #[must_use]
    pub fn new(request: Request, route_match: RouteMatch) -> Self {
        Self {
            request_id: RequestId::new(),
            request,
            route_match,
            error: None,
            result: None,
            status: StatusCode::OK,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ErrorDescriptor) {
        self.error = Some(error);
    }

    /// Put back a descriptor saved before a step whose failure was absorbed.
    pub fn restore_error(&mut self, error: Option<ErrorDescriptor>) {
        self.error = error;
    }

    /// The last result recorded on the event.
    #[must_use]
    pub fn result(&self) -> Option<&Rendered> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, result: Rendered) {
        self.result = Some(result);
    }

    /// Response status the request should be answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }
}
