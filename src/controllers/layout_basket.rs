// Basket widget. With nested partials enabled, `dispatch=basket` refreshes it alone.

use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::router::PARAM_PARTIAL;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Layout\\Basket";

#[derive(Debug, Default)]
pub struct BasketController;

impl Controller for BasketController {
    fn dispatch(&self, event: &DispatchEvent) -> anyhow::Result<Rendered> {
        let item = event
            .request
            .post("item")
            .map_or(serde_json::Value::Null, serde_json::Value::from);
        let mut view = ViewModel::with_template("layout/basket").with_variable("item", item);
        view.set_terminal(event.route_match.get_param(PARAM_PARTIAL) == Some("true"));
        Ok(view.into())
    }
}
