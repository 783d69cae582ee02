use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Layout\\Footer";

#[derive(Debug, Default)]
pub struct FooterController;

impl Controller for FooterController {
    fn dispatch(&self, _event: &DispatchEvent) -> anyhow::Result<Rendered> {
        Ok(ViewModel::with_template("layout/footer").into())
    }
}
