// Header variant for routes that override `header` in `Dispatch\Main`.

use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Layout\\AlternativeHeader";

#[derive(Debug, Default)]
pub struct AlternativeHeaderController;

impl Controller for AlternativeHeaderController {
    fn dispatch(&self, _event: &DispatchEvent) -> anyhow::Result<Rendered> {
        Ok(ViewModel::with_template("layout/header")
            .with_variable("alternative", true)
            .into())
    }
}
