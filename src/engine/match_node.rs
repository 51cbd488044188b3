use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::ast::Location;
use crate::pattern::{Pattern, INVOCATION_INDEX};

use super::{ContextKind, Value};

/// One node of the per-call-site match-result tree.
///
/// Children are keyed by the parameter index whose sub-expression they were
/// matched against; [`INVOCATION_INDEX`] holds whole-invocation dependents
/// (the receiver or enclosing wrapper). A node with no values, no action and
/// no children records a non-match.
#[derive(Debug, Clone)]
pub struct MatchNode {
    pattern: Arc<Pattern>,
    location: Location,
    values: Vec<(i32, Value)>,
    action: Option<Value>,
    children: BTreeMap<i32, Vec<MatchNode>>,
}

impl MatchNode {
    pub(crate) fn new(pattern: Arc<Pattern>, location: Location) -> Self {
        Self {
            pattern,
            location,
            values: Vec::new(),
            action: None,
            children: BTreeMap::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn context(&self) -> ContextKind {
        self.pattern.context()
    }

    pub fn bundle(&self) -> &str {
        self.pattern.bundle()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Route an extracted value to the action slot or the value list.
    /// At most one discriminating action per node; the first wins.
    pub(crate) fn add_value(&mut self, index: i32, value: Value) {
        if value.is_action() {
            if self.action.is_some() {
                trace!(
                    bundle = self.pattern.bundle(),
                    "discarding second action value for match node"
                );
                return;
            }
            self.action = Some(value);
        } else {
            self.values.push((index, value));
        }
    }

    pub(crate) fn add_child(&mut self, index: i32, child: MatchNode) {
        self.children.entry(index).or_default().push(child);
    }

    /// Extracted values as (parameter index, value) pairs;
    /// [`INVOCATION_INDEX`] marks invocation-level values.
    pub fn values(&self) -> &[(i32, Value)] {
        &self.values
    }

    pub fn action(&self) -> Option<&Value> {
        self.action.as_ref()
    }

    pub fn children(&self) -> &BTreeMap<i32, Vec<MatchNode>> {
        &self.children
    }

    pub fn children_at(&self, index: i32) -> &[MatchNode] {
        self.children.get(&index).map_or(&[], Vec::as_slice)
    }

    pub fn receiver_children(&self) -> &[MatchNode] {
        self.children_at(INVOCATION_INDEX)
    }

    pub fn has_content(&self) -> bool {
        !self.values.is_empty() || self.action.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_content() && self.children.is_empty()
    }
}

/// A completed, emitted match result: an immutable pointer to one root
/// match-node subtree. Emitted exactly once per root analysis.
#[derive(Debug, Clone)]
pub struct Finding {
    root: MatchNode,
}

impl Finding {
    pub(crate) fn new(root: MatchNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MatchNode {
        &self.root
    }

    pub fn bundle(&self) -> &str {
        self.root.bundle()
    }

    /// The shallowest match nodes carrying any values or an action,
    /// collected depth-first. A branch with content is not descended
    /// further, but independent sibling branches still contribute.
    pub fn content_nodes(&self) -> Vec<&MatchNode> {
        let mut nodes = Vec::new();
        collect_content(&self.root, &mut nodes);
        nodes
    }

    pub fn has_content(&self) -> bool {
        !self.content_nodes().is_empty()
    }
}

fn collect_content<'a>(node: &'a MatchNode, out: &mut Vec<&'a MatchNode>) {
    if node.has_content() {
        out.push(node);
        return;
    }
    for siblings in node.children().values() {
        for child in siblings {
            collect_content(child, out);
        }
    }
}
