//! Declarative forest rewriting.
//!
//! Generic translation leaves shape artifacts: parameters nested under
//! wrapper nodes, generic kinds that a child makes more precise. The
//! reorganizer fixes those with predicate→action rules applied depth-first
//! over the whole forest. The shipped rule set reaches a fixed point in one
//! pass; a second pass changes nothing.

mod arena;
mod rules;

pub use rules::default_rules;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use crate::asset::{AssetKind, AssetNode};

use arena::Arena;

type ReplaceFn = dyn Fn(&AssetNode) -> AssetNode + Send + Sync;

enum RuleAction {
    Splice,
    Replace(Arc<ReplaceFn>),
}

/// Predicate (kind, optional exact rendered value, optional child-kinds
/// test) plus a splice or replace action.
pub struct ReorganizerRule {
    kind: AssetKind,
    rendered: Option<String>,
    child_kinds: Option<Vec<AssetKind>>,
    action: RuleAction,
}

impl ReorganizerRule {
    pub fn for_kind(kind: AssetKind) -> ReorganizerRuleBuilder {
        ReorganizerRuleBuilder {
            kind,
            rendered: None,
            child_kinds: None,
        }
    }

    fn matches(&self, node: &AssetNode) -> bool {
        if node.kind() != self.kind {
            return false;
        }
        if let Some(expected) = &self.rendered {
            if node.render() != *expected {
                return false;
            }
        }
        if let Some(kinds) = &self.child_kinds {
            if !node.has_child_of(kinds) {
                return false;
            }
        }
        true
    }
}

pub struct ReorganizerRuleBuilder {
    kind: AssetKind,
    rendered: Option<String>,
    child_kinds: Option<Vec<AssetKind>>,
}

impl ReorganizerRuleBuilder {
    /// Require the node to render exactly this value.
    pub fn rendered(mut self, value: impl Into<String>) -> Self {
        self.rendered = Some(value.into());
        self
    }

    /// Require at least one child among these kinds.
    pub fn with_any_child_of(mut self, kinds: impl IntoIterator<Item = AssetKind>) -> Self {
        self.child_kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Move the matched node's children onto its parent and clear the node.
    pub fn splice(self) -> ReorganizerRule {
        ReorganizerRule {
            kind: self.kind,
            rendered: self.rendered,
            child_kinds: self.child_kinds,
            action: RuleAction::Splice,
        }
    }

    /// Substitute a computed node that inherits the original's children.
    pub fn replace_with(
        self,
        replacement: impl Fn(&AssetNode) -> AssetNode + Send + Sync + 'static,
    ) -> ReorganizerRule {
        ReorganizerRule {
            kind: self.kind,
            rendered: self.rendered,
            child_kinds: self.child_kinds,
            action: RuleAction::Replace(Arc::new(replacement)),
        }
    }
}

pub struct Reorganizer {
    rules: Vec<ReorganizerRule>,
}

impl Reorganizer {
    pub fn new(rules: Vec<ReorganizerRule>) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Apply the rule set depth-first over the forest.
    pub fn reorganize(&self, forest: Vec<AssetNode>) -> Vec<AssetNode> {
        let mut arena = Arena::from_forest(forest);
        let mut seen = HashSet::new();
        for position in 0..arena.root_count() {
            let id = arena.root_at(position);
            self.visit(&mut arena, id, &mut seen);
        }
        arena.into_forest()
    }

    fn visit(&self, arena: &mut Arena, id: usize, seen: &mut HashSet<usize>) {
        if !seen.insert(id) {
            return;
        }
        let current = self.apply_first_match(arena, id).unwrap_or(id);
        seen.insert(current);
        // Children may gain members while we descend (a spliced grandchild
        // re-parents here); keep draining until none are unvisited.
        loop {
            let pending: Vec<usize> = arena
                .children_ids(current)
                .into_iter()
                .filter(|child| !seen.contains(child))
                .collect();
            if pending.is_empty() {
                break;
            }
            for child in pending {
                self.visit(arena, child, seen);
            }
        }
    }

    /// At most one rule fires per node; returns the id that now occupies
    /// the node's place when a replacement happened.
    fn apply_first_match(&self, arena: &mut Arena, id: usize) -> Option<usize> {
        let node = arena.materialize(id);
        let rule = self.rules.iter().find(|rule| rule.matches(&node))?;
        match &rule.action {
            RuleAction::Splice => {
                if !arena.splice(id) {
                    trace!(kind = %node.kind(), "splice at forest root; structural no-op");
                }
                None
            }
            RuleAction::Replace(compute) => {
                let replacement = compute(&node);
                Some(arena.replace(id, replacement))
            }
        }
    }
}
