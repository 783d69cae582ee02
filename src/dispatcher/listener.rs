use std::sync::Arc;
use tracing::{debug, info_span, warn};

use super::context::DispatchContext;
use super::error::Outcome;
use super::invoker::ControllerInvoker;
use super::pipeline::{
    CompletionHook, DefaultErrorPipeline, ErrorPipeline, EventCompletion, FallbackDispatch,
    SingleControllerDispatch,
};
use super::tree::TreeDispatcher;
use crate::config::{DispatchConfig, FailurePolicy};
use crate::controller::ControllerRegistry;
use crate::event::DispatchEvent;
use crate::view::Rendered;

/// Entry point of the dispatch stage.
///
/// Routes without a non-empty dispatch tree go to the [`FallbackDispatch`];
/// requests carrying a partial marker resolve one slot; everything else is
/// resolved as a full tree around the route's content. Every branch ends in
/// the [`CompletionHook`].
///
/// The listener keeps no per-request state and can be shared between
/// threads.
#[derive(Clone)]
pub struct DispatchListener {
    registry: Arc<dyn ControllerRegistry>,
    tree: TreeDispatcher,
    fallback: Option<Arc<dyn FallbackDispatch>>,
    completion: Arc<dyn CompletionHook>,
}

impl DispatchListener {
    /// Listener with the default error pipeline, single-controller fallback
    /// and event completion.
    #[must_use]
    pub fn new(config: Arc<DispatchConfig>, registry: Arc<dyn ControllerRegistry>) -> Self {
        let errors: Arc<dyn ErrorPipeline> = Arc::new(DefaultErrorPipeline::default());
        let invoker = ControllerInvoker::new(Arc::clone(&registry), errors);
        Self {
            registry,
            tree: TreeDispatcher::new(config, invoker),
            fallback: None,
            completion: Arc::new(EventCompletion),
        }
    }

    #[must_use]
    pub fn with_error_pipeline(mut self, errors: Arc<dyn ErrorPipeline>) -> Self {
        let invoker = ControllerInvoker::new(Arc::clone(&self.registry), errors);
        self.tree = self.tree.with_invoker(invoker);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackDispatch>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_completion(mut self, completion: Arc<dyn CompletionHook>) -> Self {
        self.completion = completion;
        self
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        self.tree.config()
    }

    /// Dispatch one request.
    pub fn on_dispatch(&self, event: &mut DispatchEvent) -> Outcome {
        let ctx = DispatchContext::from_event(event);
        let span = info_span!(
            "dispatch",
            request_id = %event.request_id(),
            route = %ctx.route_name,
            tree = ctx.tree.as_deref().unwrap_or("-"),
        );
        let _enter = span.enter();

        let outcome = self.run(event, &ctx);
        match &outcome {
            Ok(_) => debug!(status = event.status().as_u16(), "Dispatch complete"),
            Err(failure) => warn!(
                status = event.status().as_u16(),
                error = %failure.error,
                "Dispatch failed"
            ),
        }
        self.completion.complete(outcome, event)
    }

    fn run(&self, event: &mut DispatchEvent, ctx: &DispatchContext) -> Outcome {
        let config = self.tree.config();
        let tree = match ctx.tree.as_deref() {
            Some(tree) if !config.resolve_slots(&ctx.route_name, tree).is_empty() => tree,
            _ => {
                debug!("No dispatch tree for route, using single controller dispatch");
                return self.fallback(event);
            }
        };

        if let Some(slot) = ctx.partial.as_deref() {
            return self.tree.resolve_partial(event, ctx, slot);
        }

        let content = match self
            .tree
            .invoker()
            .invoke(event, &ctx.controller, &ctx.action)
        {
            Ok(content) => content,
            Err(failure) => match (config.failure_policy(), failure.fallback.as_ref()) {
                (FailurePolicy::Placeholder, Some(fallback @ Rendered::View(_))) => {
                    warn!(
                        controller = %ctx.controller,
                        error = %failure.error,
                        "Content failed, rendering fallback in its place"
                    );
                    fallback.clone()
                }
                _ => return Err(failure),
            },
        };

        self.tree.resolve_tree(event, ctx, tree, Some(content))
    }

    fn fallback(&self, event: &mut DispatchEvent) -> Outcome {
        match &self.fallback {
            Some(fallback) => fallback.dispatch(event),
            None => SingleControllerDispatch::new(self.tree.invoker().clone()).dispatch(event),
        }
    }
}
