#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use viewtree::config::{AppConfig, ConfigFormat, DispatchConfig};
use viewtree::controller::{Controller, ControllerManager};
use viewtree::dispatcher::DispatchListener;
use viewtree::event::{DispatchEvent, Request};
use viewtree::router::{RouteMatch, PARAM_ACTION, PARAM_CONTROLLER, PARAM_DISPATCH};
use viewtree::view::{Rendered, Response, ViewModel};

/// The page of the demo application: header, a sidebar tree holding the
/// basket, and a footer around the route content.
pub const DEMO_CONFIG: &str = r#"
dispatch:
  defaults:
    Dispatch\Main:
      header: Layout\Header
      sidebar: Dispatch\Sidebar
      footer: Layout\Footer
    Dispatch\Sidebar:
      basket: Layout\Basket
  routes:
    promo:
      Dispatch\Main:
        header: Layout\AlternativeHeader
router:
  routes:
    home:
      path: /
      defaults: { dispatch: Dispatch\Main, controller: Page\Index, action: index }
"#;

pub fn parse_config(yaml: &str) -> AppConfig {
    AppConfig::parse(yaml, ConfigFormat::Yaml).expect("valid test config")
}

pub fn demo_config() -> DispatchConfig {
    parse_config(DEMO_CONFIG).dispatch
}

/// Route match for `route` rendering `Dispatch\Main` around `Page\Index::index`.
pub fn page_route(route: &str) -> RouteMatch {
    RouteMatch::new(route)
        .with_param(PARAM_DISPATCH, "Dispatch\\Main")
        .with_param(PARAM_CONTROLLER, "Page\\Index")
        .with_param(PARAM_ACTION, "index")
}

pub fn home_event(request: Request) -> DispatchEvent {
    DispatchEvent::new(request, page_route("home"))
}

/// Controllers that record every invocation as `identity:action`.
pub struct Fixture {
    pub manager: ControllerManager,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            manager: ControllerManager::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every controller of the demo page, each rendering its own template.
    pub fn demo() -> Self {
        let mut fixture = Self::new();
        fixture.view("Dispatch\\Main", "layout/main");
        fixture.view("Dispatch\\Sidebar", "layout/sidebar");
        fixture.view("Layout\\Header", "layout/header");
        fixture.view("Layout\\AlternativeHeader", "layout/alternative-header");
        fixture.view("Layout\\Footer", "layout/footer");
        fixture.view("Layout\\Basket", "layout/basket");
        fixture.view("Page\\Index", "page/index");
        fixture
    }

    /// Register a recording controller returning a view of `template`.
    pub fn view(&mut self, identity: &str, template: &str) {
        let template = template.to_string();
        self.recording(identity, move |_| Ok(ViewModel::with_template(&template).into()));
    }

    /// Register a recording controller that fails with `message`.
    pub fn failing(&mut self, identity: &str, message: &str) {
        let message = message.to_string();
        self.recording(identity, move |_| Err(anyhow::anyhow!(message.clone())));
    }

    /// Register a recording controller returning `response`.
    pub fn responding(&mut self, identity: &str, response: Response) {
        self.recording(identity, move |_| Ok(response.clone().into()));
    }

    /// Register `controller` behind a recorder.
    pub fn register<C: Controller + 'static>(&mut self, identity: &str, controller: C) {
        self.recording(identity, move |event| controller.dispatch(event));
    }

    fn recording<F>(&mut self, identity: &str, respond: F)
    where
        F: Fn(&DispatchEvent) -> anyhow::Result<Rendered> + Send + Sync + 'static,
    {
        let calls = Arc::clone(&self.calls);
        let name = identity.to_string();
        self.manager
            .register(identity, move |event: &DispatchEvent| -> anyhow::Result<Rendered> {
                let action = event.route_match.get_param(PARAM_ACTION).unwrap_or("-");
                calls.lock().unwrap().push(format!("{name}:{action}"));
                respond(event)
            });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Identities invoked, in order, without the action.
    pub fn invoked(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| call.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn was_invoked(&self, identity: &str) -> bool {
        self.invoked().iter().any(|called| called == identity)
    }

    pub fn listener(&self, config: DispatchConfig) -> DispatchListener {
        DispatchListener::new(Arc::new(config), Arc::new(self.manager.clone()))
    }
}
