use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, SlotBinding, SlotMap};
use crate::controller::{ControllerManager, ControllerRegistry};
use crate::dispatcher::{DefaultErrorPipeline, DispatchListener};
use crate::event::{DispatchEvent, Request};
use crate::ids::RequestId;
use crate::registry::demo_registry;
use crate::router::{RouteMatch, PARAM_CONTROLLER, PARAM_DISPATCH};
use crate::runtime_config::RuntimeConfig;
use crate::view::{Rendered, TemplateRenderer};

/// Command-line interface for viewtree
///
/// Inspects dispatch configurations and dry-runs requests against the
/// bundled demo controllers.
#[derive(Parser)]
#[command(name = "viewtree")]
#[command(about = "Recursive view dispatch tools", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print every dispatch tree and the effective slots of each route
    Inspect {
        /// Configuration file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "VIEWTREE_CONFIG")]
        config: PathBuf,

        /// Only show this route
        #[arg(short, long)]
        route: Option<String>,
    },
    /// Check that every identity in the configuration is a registered controller
    Validate {
        /// Configuration file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "VIEWTREE_CONFIG")]
        config: PathBuf,
    },
    /// Dispatch one request and print the rendered page
    Dispatch {
        /// Configuration file (.yaml, .yml, .json or .toml)
        #[arg(short, long, env = "VIEWTREE_CONFIG")]
        config: PathBuf,

        /// Directory holding `<template>.html` files
        #[arg(long, default_value = "views")]
        views: PathBuf,

        /// Route name to dispatch
        #[arg(short, long, default_value = "home")]
        route: String,

        /// Query string, e.g. `dispatch=sidebar`
        #[arg(short, long)]
        query: Option<String>,

        /// Urlencoded form body, e.g. `item=apple`
        #[arg(short, long)]
        post: Option<String>,

        /// Print the composed view tree as JSON instead of rendering it
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Upstream request id (ULID) to log under; a new one is minted if
        /// absent or invalid
        #[arg(long)]
        request_id: Option<String>,
    },
}

/// Parse arguments and run the command, writing to stdout.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, validation finds
/// problems, or rendering fails.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Run a parsed command, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Inspect { config, route } => {
            let config = load_config(config)?;
            inspect(&config, route.as_deref(), out)
        }
        Commands::Validate { config } => {
            let config = load_config(config)?;
            let problems = validate(&config, &demo_registry());
            if problems.is_empty() {
                writeln!(
                    out,
                    "ok: {} trees, {} routes",
                    config.dispatch.tree_names().len(),
                    config.router.route_names().len()
                )?;
                return Ok(());
            }
            for problem in &problems {
                writeln!(out, "error: {problem}")?;
            }
            bail!("{} problem(s) found", problems.len())
        }
        Commands::Dispatch {
            config,
            views,
            route,
            query,
            post,
            json,
            request_id,
        } => {
            let config = load_config(config)?;
            let mut request = Request::from_query_string(query.as_deref().unwrap_or_default());
            if let Some(body) = post {
                request = request.with_form_body(body);
            }
            let request_id = RequestId::from_header_or_new(request_id.as_deref());
            dispatch(&config, views, route, request, request_id, *json, out)
        }
    }
}

fn load_config(path: &Path) -> Result<AppConfig> {
    let mut config = AppConfig::load(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    RuntimeConfig::from_env().apply(&mut config);
    info!(
        config = %path.display(),
        trees = config.dispatch.tree_names().len(),
        failure_policy = ?config.dispatch.failure_policy(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Write the trees and each route's effective slot mapping.
pub fn inspect(config: &AppConfig, only_route: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let dispatch = &config.dispatch;

    if only_route.is_none() {
        writeln!(out, "trees:")?;
        for tree in dispatch.tree_names() {
            writeln!(out, "  {tree}")?;
            write_slots(&dispatch.resolve_slots("", tree), out)?;
        }
    }

    let mut routes: Vec<&str> = config.router.route_names();
    for name in dispatch.route_names() {
        if !routes.contains(&name) {
            routes.push(name);
        }
    }
    routes.sort_unstable();

    if let Some(route) = only_route {
        if !routes.contains(&route) {
            bail!("unknown route '{route}'");
        }
        routes.retain(|name| *name == route);
    }

    writeln!(out, "routes:")?;
    for route in routes {
        let route_match = config
            .router
            .route(route)
            .unwrap_or_else(|| RouteMatch::new(route));
        match route_match.get_param(PARAM_DISPATCH) {
            Some(tree) => {
                writeln!(out, "  {route} -> {tree}")?;
                write_slots(&dispatch.resolve_slots(route, tree), out)?;
            }
            None => writeln!(out, "  {route} (single controller)")?,
        }
    }
    Ok(())
}

fn write_slots(slots: &SlotMap, out: &mut dyn Write) -> Result<()> {
    if slots.is_empty() {
        writeln!(out, "    (no slots)")?;
    }
    for (slot, binding) in slots.iter() {
        match binding {
            SlotBinding::Tree(name) => writeln!(out, "    {slot}: {name} (tree)")?,
            SlotBinding::Leaf(name) => writeln!(out, "    {slot}: {name}")?,
        }
    }
    Ok(())
}

/// Problems that would make a dispatch fail with a not-found error.
#[must_use]
pub fn validate(config: &AppConfig, registry: &ControllerManager) -> Vec<String> {
    let dispatch = &config.dispatch;
    let mut problems = Vec::new();

    for tree in dispatch.tree_names() {
        if !registry.has(tree) {
            problems.push(format!("tree '{tree}' has no shell controller"));
        }
    }
    for identity in dispatch.leaf_identities() {
        if !registry.has(identity) {
            problems.push(format!("controller '{identity}' is not registered"));
        }
    }
    for route in config.router.route_names() {
        let Some(route_match) = config.router.route(route) else {
            continue;
        };
        if let Some(tree) = route_match.get_param(PARAM_DISPATCH) {
            if !dispatch.is_tree(tree) {
                problems.push(format!("route '{route}' uses unknown tree '{tree}'"));
            }
        }
        match route_match.get_param(PARAM_CONTROLLER) {
            Some(controller) if !registry.has(controller) => problems.push(format!(
                "route '{route}' uses unregistered controller '{controller}'"
            )),
            Some(_) => {}
            None => problems.push(format!("route '{route}' names no controller")),
        }
    }
    problems
}

/// Dispatch `route` against the demo controllers and write the result.
pub fn dispatch(
    config: &AppConfig,
    views: &Path,
    route: &str,
    request: Request,
    request_id: RequestId,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let registry: Arc<dyn ControllerRegistry> = Arc::new(demo_registry());
    let listener = DispatchListener::new(Arc::new(config.dispatch.clone()), registry)
        .with_error_pipeline(Arc::new(DefaultErrorPipeline::new(
            config.view_manager.clone(),
        )));

    let route_match = config
        .router
        .route(route)
        .unwrap_or_else(|| RouteMatch::new(route));
    let mut event = DispatchEvent::new(request, route_match).with_request_id(request_id);
    // Failures carry their error page as the event result; render that.
    let _outcome = listener.on_dispatch(&mut event);

    let result = event
        .result()
        .ok_or_else(|| anyhow!("dispatch produced no result (status {})", event.status()))?;

    if json {
        let doc = serde_json::json!({
            "request_id": event.request_id(),
            "status": event.status().as_u16(),
            "error": event.error(),
            "result": result,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        return Ok(());
    }

    match result {
        Rendered::View(view) => {
            let renderer =
                TemplateRenderer::from_dir(views).with_layout(&config.view_manager.layout);
            let html = renderer.render_page(view)?;
            writeln!(out, "{html}")?;
        }
        Rendered::Response(response) => {
            writeln!(out, "HTTP {}", response.status)?;
            for (name, value) in &response.headers {
                writeln!(out, "{name}: {value}")?;
            }
            if !response.body.is_null() {
                writeln!(out)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&response.body)?)?;
            }
        }
    }
    info!(status = event.status().as_u16(), request_id = %event.request_id(), "Request dispatched");
    Ok(())
}
