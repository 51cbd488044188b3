//! Call-site match engine.
//!
//! `MatchEngine::start` walks one expression against one root pattern,
//! recursively evaluating dependent patterns discovered on the way down,
//! and delivers the completed [`Finding`] for that root exactly once.

pub mod match_node;
pub mod value;

pub use match_node::{Finding, MatchNode};
pub use value::{ActionKind, ContextKind, Value, ValueKind};

use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::Expr;
use crate::pattern::{Pattern, INVOCATION_INDEX};
use crate::session::ScanContext;

/// Completion counters for one root analysis, exposed for verification.
///
/// `expected` starts at 1 for the root evaluation and grows by one for each
/// dependent-pattern evaluation scheduled while descending; `visited` grows
/// by one per evaluation conclusion, match or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStats {
    pub expected: usize,
    pub visited: usize,
}

/// Per-root executive resolving the completion barrier over a fan-out that
/// is only discovered while walking.
struct Executive {
    expected: usize,
    visited: usize,
    emitted: bool,
}

impl Executive {
    fn new() -> Self {
        Self {
            expected: 1,
            visited: 0,
            emitted: false,
        }
    }

    fn schedule(&mut self) {
        self.expected += 1;
    }

    /// Returns true for the single conclusion that observes
    /// `visited == expected`; every later conclusion is a no-op.
    fn conclude(&mut self) -> bool {
        self.visited += 1;
        if self.visited == self.expected && !self.emitted {
            self.emitted = true;
            return true;
        }
        false
    }

    fn stats(&self) -> MatchStats {
        MatchStats {
            expected: self.expected,
            visited: self.visited,
        }
    }
}

#[derive(Default)]
pub struct MatchEngine;

impl MatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Analyse one expression against one root pattern and deliver the
    /// Finding for it. Delivery is synchronous and single-shot; a root
    /// that fails its shape check still yields a (content-less) Finding.
    pub fn start(&self, expr: &Expr, pattern: &Arc<Pattern>, ctx: &ScanContext) -> Finding {
        self.start_with_stats(expr, pattern, ctx).0
    }

    pub fn start_with_stats(
        &self,
        expr: &Expr,
        pattern: &Arc<Pattern>,
        ctx: &ScanContext,
    ) -> (Finding, MatchStats) {
        let mut exec = Executive::new();
        let root = self.evaluate(expr, pattern, &mut exec);
        // Synchronous depth-first recursion: the root conclusion is the one
        // that observes visited == expected.
        debug_assert!(exec.emitted);
        let stats = exec.stats();
        debug!(
            file = %ctx.file,
            bundle = pattern.bundle(),
            evaluations = stats.visited,
            content = root.has_content() || !root.children().is_empty(),
            "analysis complete"
        );
        (Finding::new(root), stats)
    }

    fn evaluate(&self, expr: &Expr, pattern: &Arc<Pattern>, exec: &mut Executive) -> MatchNode {
        let node = self.apply(expr, pattern, exec);
        exec.conclude();
        node
    }

    /// One pattern application at one call site. Never panics on surprise
    /// shapes: anything unmatchable yields the empty node.
    fn apply(&self, expr: &Expr, pattern: &Arc<Pattern>, exec: &mut Executive) -> MatchNode {
        let mut node = MatchNode::new(pattern.clone(), expr.location.clone());

        let Some(invocation) = expr.as_invocation() else {
            return node;
        };
        if !pattern.matches_shape(invocation) {
            return node;
        }
        trace!(
            bundle = pattern.bundle(),
            matched_type = invocation.concrete_type().unwrap_or_default(),
            "shape match"
        );

        for factory in pattern.detect_as() {
            if let Some(value) = factory.extract(expr) {
                node.add_value(INVOCATION_INDEX, value);
            }
        }

        for (index, spec) in pattern.parameters().iter().enumerate() {
            let Some(argument) = invocation.arguments.get(index) else {
                // Missing token in the source; skip the slot, keep walking.
                continue;
            };
            if let Some(factory) = spec.factory() {
                if let Some(value) = factory.extract(argument) {
                    node.add_value(index as i32, value);
                }
            }
            for dependent in spec.dependents() {
                exec.schedule();
                let child = self.evaluate(argument, dependent, exec);
                node.add_child(index as i32, child);
            }
        }

        for dependent in pattern.invocation_dependents() {
            exec.schedule();
            let child = match invocation.receiver.as_deref() {
                Some(receiver) => self.evaluate(receiver, dependent, exec),
                None => {
                    // No governing sub-expression: conclude the scheduled
                    // evaluation as a non-match so the barrier stays balanced.
                    let child = MatchNode::new(dependent.clone(), expr.location.clone());
                    exec.conclude();
                    child
                }
            };
            node.add_child(INVOCATION_INDEX, child);
        }

        node
    }
}
