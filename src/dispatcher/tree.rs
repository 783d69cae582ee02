use std::sync::Arc;
use tracing::{debug, warn};

use super::context::{DispatchContext, CONTENT_SLOT, SLOT_ACTION};
use super::error::{DispatchError, Failure, Outcome};
use super::invoker::ControllerInvoker;
use crate::config::{DispatchConfig, FailurePolicy, SlotBinding};
use crate::event::DispatchEvent;
use crate::router::PARAM_PARTIAL;
use crate::view::{Rendered, ViewModel};

/// Resolves dispatch trees into composite views, and single slots for
/// partial requests.
#[derive(Clone)]
pub struct TreeDispatcher {
    config: Arc<DispatchConfig>,
    invoker: ControllerInvoker,
}

impl TreeDispatcher {
    #[must_use]
    pub fn new(config: Arc<DispatchConfig>, invoker: ControllerInvoker) -> Self {
        Self { config, invoker }
    }

    /// Same configuration, different invoker.
    #[must_use]
    pub fn with_invoker(self, invoker: ControllerInvoker) -> Self {
        Self { invoker, ..self }
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    #[must_use]
    pub fn invoker(&self) -> &ControllerInvoker {
        &self.invoker
    }

    /// Resolve `tree` for the current route into one composite view.
    ///
    /// The controller registered under the tree's name supplies the shell;
    /// `content`, when given, is attached under `content` before the declared
    /// slots are resolved in mapping order.
    pub fn resolve_tree(
        &self,
        event: &mut DispatchEvent,
        ctx: &DispatchContext,
        tree: &str,
        content: Option<Rendered>,
    ) -> Outcome {
        if let Some(response @ Rendered::Response(_)) = content {
            debug!(tree = %tree, "Content returned a response, skipping tree");
            return Ok(response);
        }

        let slots = self.config.resolve_slots(&ctx.route_name, tree);
        if slots.is_empty() {
            return match content {
                Some(content) => Ok(content),
                None => Err(self.invoker.fail(
                    event,
                    DispatchError::EmptyTree {
                        tree: tree.to_string(),
                    },
                )),
            };
        }

        let mut composite = match self.invoker.invoke(event, tree, SLOT_ACTION)? {
            Rendered::View(view) => view,
            response => return Ok(response),
        };
        if let Some(Rendered::View(content)) = content {
            composite.add_child(content, CONTENT_SLOT);
        }

        for (slot, binding) in slots.iter() {
            debug!(
                tree = %tree,
                slot = %slot,
                binding = %binding.identity(),
                nested = binding.is_tree(),
                "Resolving slot"
            );
            let status = event.status();
            let prior_error = event.error().cloned();
            match self.resolve_binding(event, ctx, binding) {
                Ok(Rendered::View(child)) => composite.add_child(child, slot),
                Ok(response) => {
                    debug!(tree = %tree, slot = %slot, "Slot returned a response");
                    return Ok(response);
                }
                Err(failure) => match self.config.failure_policy() {
                    FailurePolicy::Abort => return Err(failure),
                    FailurePolicy::Placeholder => {
                        warn!(
                            tree = %tree,
                            slot = %slot,
                            error = %failure.error,
                            "Slot failed, rendering placeholder"
                        );
                        event.set_status(status);
                        event.restore_error(prior_error);
                        composite.add_child(self.placeholder(slot, &failure), slot);
                    }
                },
            }
        }

        Ok(Rendered::View(composite))
    }

    /// Resolve the single slot `slot` of the route's tree, standalone.
    ///
    /// `content` is the route's own controller. Any other slot must be
    /// declared in the route's effective mapping (or, with nested partials
    /// enabled, in one of its sub-trees). The result is marked terminal.
    pub fn resolve_partial(
        &self,
        event: &mut DispatchEvent,
        ctx: &DispatchContext,
        slot: &str,
    ) -> Outcome {
        event.route_match.set_param(PARAM_PARTIAL, "true");

        let mut outcome = if slot == CONTENT_SLOT {
            debug!(controller = %ctx.controller, action = %ctx.action, "Partial content dispatch");
            self.invoker.invoke(event, &ctx.controller, &ctx.action)
        } else {
            let tree = ctx.tree.as_deref().unwrap_or_default();
            match self.find_partial(&ctx.route_name, tree, slot) {
                Some(binding) => {
                    debug!(tree = %tree, slot = %slot, binding = %binding.identity(), "Partial dispatch");
                    self.resolve_binding(event, ctx, &binding)
                }
                None => Err(self.invoker.fail(
                    event,
                    DispatchError::PartialNotFound {
                        tree: tree.to_string(),
                        slot: slot.to_string(),
                    },
                )),
            }
        };

        // The error page of a failed partial stands alone as well
        match &mut outcome {
            Ok(result) => result.set_terminal(true),
            Err(failure) => {
                if let Some(fallback) = &mut failure.fallback {
                    fallback.set_terminal(true);
                }
            }
        }
        outcome
    }

    fn resolve_binding(
        &self,
        event: &mut DispatchEvent,
        ctx: &DispatchContext,
        binding: &SlotBinding,
    ) -> Outcome {
        match binding {
            SlotBinding::Tree(name) => self.resolve_tree(event, ctx, name, None),
            SlotBinding::Leaf(identity) => self.invoker.invoke(event, identity, SLOT_ACTION),
        }
    }

    /// Binding of `slot` in `tree`, searching sub-trees depth-first when
    /// nested partials are enabled.
    fn find_partial(&self, route_name: &str, tree: &str, slot: &str) -> Option<SlotBinding> {
        let slots = self.config.resolve_slots(route_name, tree);
        if let Some(binding) = slots.get(slot) {
            return Some(binding.clone());
        }
        if !self.config.nested_partials() {
            return None;
        }
        let found = slots.iter().find_map(|(_, binding)| match binding {
            SlotBinding::Tree(sub_tree) => self.find_partial(route_name, sub_tree, slot),
            SlotBinding::Leaf(_) => None,
        });
        found
    }

    fn placeholder(&self, slot: &str, failure: &Failure) -> ViewModel {
        ViewModel::with_template(self.config.placeholder_template())
            .with_variable("slot", slot)
            .with_variable("error", failure.error.kind().as_str())
    }
}
