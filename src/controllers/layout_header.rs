use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Layout\\Header";

#[derive(Debug, Default)]
pub struct HeaderController;

impl Controller for HeaderController {
    fn dispatch(&self, _event: &DispatchEvent) -> anyhow::Result<Rendered> {
        Ok(ViewModel::with_template("layout/header").into())
    }
}
