//! Template rendering of composed views with minijinja.
//!
//! Children are rendered before their parent and exposed to the parent
//! template as pre-escaped strings named after their slot, so a page
//! template places its parts with `{{ header }}`, `{{ content }}`, ...

use minijinja::{AutoEscape, Environment, Value as TemplateValue};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::core::ViewModel;

/// Template file extension appended to view template names.
pub const TEMPLATE_SUFFIX: &str = ".html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view in slot '{slot}' has no template")]
    MissingTemplate { slot: String },

    #[error("failed to render template '{template}': {source}")]
    Template {
        template: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Renders [`ViewModel`] trees.
pub struct TemplateRenderer {
    env: Environment<'static>,
    layout: Option<String>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env, layout: None }
    }
}

impl TemplateRenderer {
    /// Renderer loading `<name>.html` files below `dir` on demand.
    #[must_use]
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut renderer = Self::default();
        let load = minijinja::path_loader(dir.as_ref());
        renderer.env.set_loader(move |name| {
            if name.ends_with(TEMPLATE_SUFFIX) {
                load(name)
            } else {
                load(&format!("{name}{TEMPLATE_SUFFIX}"))
            }
        });
        renderer
    }

    /// Wrap non-terminal pages in `layout`, captured as `content`.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Register an in-memory template.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| RenderError::Template {
                template: name.to_string(),
                source,
            })
    }

    /// Render a view and its children, without the layout.
    pub fn render(&self, view: &ViewModel) -> Result<String, RenderError> {
        self.render_view(view, "root")
    }

    /// Render a full page: the view wrapped in the layout unless the view is
    /// terminal or no layout is configured.
    pub fn render_page(&self, view: &ViewModel) -> Result<String, RenderError> {
        let body = self.render(view)?;
        match &self.layout {
            Some(layout) if !view.is_terminal() => {
                let mut ctx = BTreeMap::new();
                ctx.insert("content".to_string(), TemplateValue::from_safe_string(body));
                self.render_template(layout, ctx)
            }
            _ => Ok(body),
        }
    }

    fn render_view(&self, view: &ViewModel, slot: &str) -> Result<String, RenderError> {
        let template = view.template().ok_or_else(|| RenderError::MissingTemplate {
            slot: slot.to_string(),
        })?;

        let mut ctx: BTreeMap<String, TemplateValue> = view
            .variables()
            .iter()
            .map(|(k, v)| (k.clone(), TemplateValue::from_serialize(v)))
            .collect();

        // Same-slot children are concatenated in capture order
        let mut captured: BTreeMap<&str, String> = BTreeMap::new();
        for (child_slot, child) in view.children() {
            let html = self.render_view(child, child_slot)?;
            captured.entry(child_slot).or_default().push_str(&html);
        }
        for (child_slot, html) in captured {
            ctx.insert(child_slot.to_string(), TemplateValue::from_safe_string(html));
        }

        debug!(template = %template, slot = %slot, "Rendering view");
        self.render_template(template, ctx)
    }

    fn render_template(
        &self,
        name: &str,
        ctx: BTreeMap<String, TemplateValue>,
    ) -> Result<String, RenderError> {
        let to_error = |source: minijinja::Error| RenderError::Template {
            template: name.to_string(),
            source,
        };
        self.env
            .get_template(name)
            .map_err(to_error)?
            .render(ctx)
            .map_err(to_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TemplateRenderer {
        let mut r = TemplateRenderer::default().with_layout("layout");
        r.add_template("layout", "<html>{{ content }}</html>").unwrap();
        r.add_template("page", "[{{ header }}|{{ content }}]").unwrap();
        r.add_template("part", "<{{ name }}>").unwrap();
        r
    }

    #[test]
    fn test_children_are_captured_by_slot() {
        let mut page = ViewModel::with_template("page");
        page.add_child(
            ViewModel::with_template("part").with_variable("name", "h"),
            "header",
        );
        page.add_child(
            ViewModel::with_template("part").with_variable("name", "c"),
            "content",
        );

        let html = renderer().render_page(&page).unwrap();
        assert_eq!(html, "<html>[<h>|<c>]</html>");
    }

    #[test]
    fn test_variables_are_escaped() {
        let view = ViewModel::with_template("part").with_variable("name", "<b>");
        let html = renderer().render(&view).unwrap();
        assert_eq!(html, "<&lt;b&gt;>");
    }

    #[test]
    fn test_terminal_view_skips_layout() {
        let mut view = ViewModel::with_template("part").with_variable("name", "x");
        view.set_terminal(true);
        assert_eq!(renderer().render_page(&view).unwrap(), "<x>");
    }

    #[test]
    fn test_missing_template_is_reported_with_slot() {
        let mut page = ViewModel::with_template("page");
        page.add_child(ViewModel::new(), "header");
        let err = renderer().render(&page).unwrap_err();
        assert!(matches!(err, RenderError::MissingTemplate { ref slot } if slot == "header"));
    }
}
