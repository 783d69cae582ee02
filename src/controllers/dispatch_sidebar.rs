// Shell of the `Dispatch\Sidebar` tree.

use crate::controller::Controller;
use crate::event::DispatchEvent;
use crate::view::{Rendered, ViewModel};

pub const IDENTITY: &str = "Dispatch\\Sidebar";

#[derive(Debug, Default)]
pub struct SidebarController;

impl Controller for SidebarController {
    fn dispatch(&self, _event: &DispatchEvent) -> anyhow::Result<Rendered> {
        Ok(ViewModel::with_template("layout/sidebar").into())
    }
}
