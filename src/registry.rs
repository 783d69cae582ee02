// Registry of the bundled demo controllers.

use crate::controller::ControllerManager;
use crate::controllers::*;

/// Register every demo controller under its identity.
pub fn register_all(manager: &mut ControllerManager) {
    manager.register(dispatch_main::IDENTITY, dispatch_main::MainController);
    manager.register(dispatch_sidebar::IDENTITY, dispatch_sidebar::SidebarController);
    manager.register(layout_header::IDENTITY, layout_header::HeaderController);
    manager.register(
        layout_alternative_header::IDENTITY,
        layout_alternative_header::AlternativeHeaderController,
    );
    manager.register(layout_footer::IDENTITY, layout_footer::FooterController);
    manager.register(layout_basket::IDENTITY, layout_basket::BasketController);
    manager.register(page_index::IDENTITY, page_index::IndexController);
}

/// A manager holding every demo controller.
#[must_use]
pub fn demo_registry() -> ControllerManager {
    let mut manager = ControllerManager::new();
    register_all(&mut manager);
    manager
}
