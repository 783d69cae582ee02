// Shell of the `Dispatch\Main` tree.

use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Dispatch\\Main";

#[derive(Debug, Default)]
pub struct MainController;

impl Controller for MainController {
    fn dispatch(&self, _event: &DispatchEvent) -> anyhow::Result<Rendered> {
        Ok(ViewModel::with_template("layout/main").into())
    }
}
