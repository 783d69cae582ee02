use serde::Serialize;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline response headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage; names are shared `Arc<str>`.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// A view to be rendered by the template engine.
///
/// A view with children is a composite: each child is captured into the
/// parent template under its slot name. Children keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    template: Option<String>,
    variables: Map<String, Value>,
    children: Vec<(String, ViewModel)>,
    terminal: bool,
}

impl ViewModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Builder-style variable assignment.
    #[must_use]
    pub fn with_variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_variable(name, value);
        self
    }

    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) {
        self.variables.insert(name.to_string(), value.into());
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    #[must_use]
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Capture `child` into this view under `slot`.
    pub fn add_child(&mut self, child: ViewModel, slot: impl Into<String>) {
        self.children.push((slot.into(), child));
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ViewModel)> {
        self.children.iter().map(|(slot, view)| (slot.as_str(), view))
    }

    /// First child captured under `slot`.
    #[must_use]
    pub fn child(&self, slot: &str) -> Option<&ViewModel> {
        self.children
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, view)| view)
    }

    #[must_use]
    pub fn child_slots(&self) -> Vec<&str> {
        self.children.iter().map(|(slot, _)| slot.as_str()).collect()
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A terminal view is rendered on its own, without the page layout.
    pub fn set_terminal(&mut self, terminal: bool) {
        self.terminal = terminal;
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// A finished response that bypasses view composition (redirects, JSON).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self::new(status, headers, body)
    }

    #[must_use]
    pub fn redirect(location: &str) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("location"), location.to_string()));
        Self::new(302, headers, Value::Null)
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What a controller hands back: a view to compose, or a finished response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rendered {
    View(ViewModel),
    Response(Response),
}

impl Rendered {
    #[must_use]
    pub fn as_view(&self) -> Option<&ViewModel> {
        match self {
            Rendered::View(view) => Some(view),
            Rendered::Response(_) => None,
        }
    }

    #[must_use]
    pub fn into_view(self) -> Option<ViewModel> {
        match self {
            Rendered::View(view) => Some(view),
            Rendered::Response(_) => None,
        }
    }

    /// Marks views terminal; responses are already standalone.
    pub fn set_terminal(&mut self, terminal: bool) {
        if let Rendered::View(view) = self {
            view.set_terminal(terminal);
        }
    }
}

impl From<ViewModel> for Rendered {
    fn from(view: ViewModel) -> Self {
        Rendered::View(view)
    }
}

impl From<Response> for Rendered {
    fn from(response: Response) -> Self {
        Rendered::Response(response)
    }
}
