// Content of the `home` route.

use anyhow::bail;

use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::router::PARAM_ACTION;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Page\\Index";

#[derive(Debug, Default)]
pub struct IndexController;

impl Controller for IndexController {
    fn dispatch(&self, event: &DispatchEvent) -> anyhow::Result<Rendered> {
        match event.route_match.get_param(PARAM_ACTION) {
            Some("index") => Ok(ViewModel::with_template("page/index")
                .with_variable("title", "Home")
                .into()),
            Some(action) => bail!("unknown action '{action}'"),
            None => bail!("no action requested"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Request;
    use crate::router::RouteMatch;

    #[test]
    fn test_index_action() {
        let event = DispatchEvent::new(
            Request::new(),
            RouteMatch::new("home").with_param(PARAM_ACTION, "index"),
        );
        let view = IndexController.dispatch(&event).unwrap().into_view().unwrap();
        assert_eq!(view.template(), Some("page/index"));
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        let event = DispatchEvent::new(
            Request::new(),
            RouteMatch::new("home").with_param(PARAM_ACTION, "edit"),
        );
        let err = IndexController.dispatch(&event).unwrap_err();
        assert_eq!(err.to_string(), "unknown action 'edit'");
    }
}
