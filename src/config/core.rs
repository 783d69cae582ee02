//! Dispatch configuration: tagged slot bindings and the per-route merge.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::error::ConfigError;

/// What a slot is bound to, decided once when the configuration is loaded.
///
/// An identity is a [`SlotBinding::Tree`] when it names a tree declared under
/// `dispatch.defaults`; anything else is a leaf controller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum SlotBinding {
    /// Leaf controller identity, invoked with the `dispatch` action.
    Leaf(String),
    /// Nested dispatch tree, resolved recursively.
    Tree(String),
}

impl SlotBinding {
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            SlotBinding::Leaf(id) | SlotBinding::Tree(id) => id,
        }
    }

    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, SlotBinding::Tree(_))
    }
}

/// Ordered slot name → binding mapping.
///
/// Order is the declaration order of the configuration file. Replacing an
/// existing slot keeps its position; new slots are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    entries: Vec<(String, SlotBinding)>,
}

impl SlotMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a binding, returning the previous one.
    pub fn insert(&mut self, slot: impl Into<String>, binding: SlotBinding) -> Option<SlotBinding> {
        let slot = slot.into();
        match self.entries.iter_mut().find(|(name, _)| *name == slot) {
            Some((_, existing)) => Some(std::mem::replace(existing, binding)),
            None => {
                self.entries.push((slot, binding));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&SlotBinding> {
        self.entries
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, binding)| binding)
    }

    /// `overrides` merged over `self`: override bindings win, slots present
    /// on only one side are kept.
    #[must_use]
    pub fn merged(&self, overrides: &SlotMap) -> SlotMap {
        let mut merged = self.clone();
        for (slot, binding) in overrides.iter() {
            merged.insert(slot, binding.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotBinding)> {
        self.entries.iter().map(|(slot, binding)| (slot.as_str(), binding))
    }

    #[must_use]
    pub fn slot_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(slot, _)| slot.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, SlotBinding)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (String, SlotBinding)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (slot, binding) in iter {
            map.insert(slot, binding);
        }
        map
    }
}

/// What to do when one slot of a tree fails to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The first failing slot becomes the outcome of the whole dispatch;
    /// later siblings are never invoked.
    #[default]
    Abort,
    /// The failing slot is replaced by a placeholder view and assembly goes on.
    Placeholder,
}

impl FailurePolicy {
    /// Lenient parse used for environment overrides.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Some(FailurePolicy::Abort),
            "placeholder" => Some(FailurePolicy::Placeholder),
            _ => None,
        }
    }
}

/// Default template for slots replaced under [`FailurePolicy::Placeholder`].
pub const DEFAULT_PLACEHOLDER_TEMPLATE: &str = "error/slot";

/// Immutable dispatch configuration.
///
/// Built once and shared behind an `Arc` by every request.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    defaults: HashMap<String, SlotMap>,
    routes: HashMap<String, HashMap<String, SlotMap>>,
    failure_policy: FailurePolicy,
    placeholder_template: String,
    nested_partials: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            defaults: HashMap::new(),
            routes: HashMap::new(),
            failure_policy: FailurePolicy::default(),
            placeholder_template: DEFAULT_PLACEHOLDER_TEMPLATE.to_string(),
            nested_partials: false,
        }
    }
}

impl DispatchConfig {
    /// Build a configuration from raw `identity` strings, classifying each
    /// binding and rejecting cyclic trees.
    pub fn from_bindings(
        defaults: HashMap<String, Vec<(String, String)>>,
        routes: HashMap<String, HashMap<String, Vec<(String, String)>>>,
    ) -> Result<Self, ConfigError> {
        let tree_names: HashSet<String> = defaults.keys().cloned().collect();
        let classify = |slots: Vec<(String, String)>| -> SlotMap {
            slots
                .into_iter()
                .map(|(slot, identity)| {
                    let binding = if tree_names.contains(&identity) {
                        SlotBinding::Tree(identity)
                    } else {
                        SlotBinding::Leaf(identity)
                    };
                    (slot, binding)
                })
                .collect()
        };

        let defaults: HashMap<String, SlotMap> = defaults
            .into_iter()
            .map(|(tree, slots)| (tree, classify(slots)))
            .collect();
        let routes: HashMap<String, HashMap<String, SlotMap>> = routes
            .into_iter()
            .map(|(route, trees)| {
                let trees = trees
                    .into_iter()
                    .map(|(tree, slots)| (tree, classify(slots)))
                    .collect();
                (route, trees)
            })
            .collect();

        let config = Self {
            defaults,
            routes,
            ..Self::default()
        };
        config.check_acyclic()?;

        debug!(
            trees = config.defaults.len(),
            routes = config.routes.len(),
            "Dispatch configuration built"
        );
        Ok(config)
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_placeholder_template(mut self, template: impl Into<String>) -> Self {
        self.placeholder_template = template.into();
        self
    }

    #[must_use]
    pub fn with_nested_partials(mut self, enabled: bool) -> Self {
        self.nested_partials = enabled;
        self
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    #[must_use]
    pub fn placeholder_template(&self) -> &str {
        &self.placeholder_template
    }

    #[must_use]
    pub fn nested_partials(&self) -> bool {
        self.nested_partials
    }

    /// Effective slot mapping for `tree` under `route_name`.
    ///
    /// `routes[route_name][tree]` merged over `defaults[tree]`; either side
    /// may be missing. Pure: identical inputs give identical mappings, in the
    /// same order.
    #[must_use]
    pub fn resolve_slots(&self, route_name: &str, tree: &str) -> SlotMap {
        let defaults = self.defaults.get(tree);
        let overrides = self
            .routes
            .get(route_name)
            .and_then(|trees| trees.get(tree));

        match (defaults, overrides) {
            (Some(d), Some(o)) => d.merged(o),
            (Some(d), None) => d.clone(),
            (None, Some(o)) => o.clone(),
            (None, None) => SlotMap::new(),
        }
    }

    /// True iff `identity` names a tree declared under `defaults`.
    #[must_use]
    pub fn is_tree(&self, identity: &str) -> bool {
        self.defaults.contains_key(identity)
    }

    /// Declared tree names, sorted.
    #[must_use]
    pub fn tree_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defaults.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route names that carry overrides, sorted.
    #[must_use]
    pub fn route_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every leaf controller identity reachable from any tree or override.
    #[must_use]
    pub fn leaf_identities(&self) -> Vec<&str> {
        let overrides = self.routes.values().flat_map(HashMap::values);
        let mut leaves: Vec<&str> = self
            .defaults
            .values()
            .chain(overrides)
            .flat_map(SlotMap::iter)
            .filter(|(_, binding)| !binding.is_tree())
            .map(|(_, binding)| binding.identity())
            .collect();
        leaves.sort_unstable();
        leaves.dedup();
        leaves
    }

    /// Recursion only terminates if no tree reaches itself. Checked with the
    /// defaults alone and once per route with that route's overrides applied.
    fn check_acyclic(&self) -> Result<(), ConfigError> {
        let scopes = std::iter::once("").chain(self.routes.keys().map(String::as_str));
        for route in scopes {
            // Trees already walked without finding a cycle, for this scope
            let mut acyclic = HashSet::new();
            for tree in self.tree_names() {
                self.walk(route, tree, &mut Vec::new(), &mut acyclic)?;
            }
        }
        Ok(())
    }

    fn walk(
        &self,
        route: &str,
        tree: &str,
        stack: &mut Vec<String>,
        acyclic: &mut HashSet<String>,
    ) -> Result<(), ConfigError> {
        if acyclic.contains(tree) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|t| t == tree) {
            let mut path = stack.split_off(pos);
            path.push(tree.to_string());
            return Err(ConfigError::Cycle {
                route: (!route.is_empty()).then(|| route.to_string()),
                path,
            });
        }

        stack.push(tree.to_string());
        for (_, binding) in self.resolve_slots(route, tree).iter() {
            if let SlotBinding::Tree(child) = binding {
                self.walk(route, child, stack, acyclic)?;
            }
        }
        stack.pop();
        acyclic.insert(tree.to_string());
        Ok(())
    }
}
