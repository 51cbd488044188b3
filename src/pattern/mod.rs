//! Declarative call-site patterns.
//!
//! A pattern describes the shape of an interesting invocation (target type,
//! constructor or method, parameter slots) together with value factories
//! that extract typed values from matched arguments and dependent patterns
//! evaluated recursively against sub-expressions. Patterns are immutable
//! once built; the builder fails fast on malformed sequences.

mod factory;

pub use factory::{
    ActionFactory, BooleanFactory, FixedNameFactory, NameFactory, SizeFactory, SizeUnit,
    ValueFactory,
};

use std::fmt;
use std::sync::Arc;

use crate::ast::{Invocation, InvocationKind};
use crate::engine::{ActionKind, ContextKind};
use crate::error::PatternBuildError;

/// Index used for whole-invocation dependents and invocation-level values.
pub const INVOCATION_INDEX: i32 = -1;

/// Whether the target type must match exactly or any supertype counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Exact,
    Subtype,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    Named(String),
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallShape {
    Constructor,
    Method(MethodMatcher),
}

impl CallShape {
    fn describe(&self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::Method(_) => "method",
        }
    }
}

/// One parameter slot: an optional value factory plus dependent patterns
/// matched recursively against the actual argument sub-expression.
#[derive(Clone, Default)]
pub struct ParameterSpec {
    factory: Option<Arc<dyn ValueFactory>>,
    dependents: Vec<Arc<Pattern>>,
}

impl ParameterSpec {
    /// A slot the pattern does not inspect.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn value(factory: impl ValueFactory + 'static) -> Self {
        Self {
            factory: Some(Arc::new(factory)),
            dependents: Vec::new(),
        }
    }

    pub fn with_dependent(mut self, pattern: impl Into<Arc<Pattern>>) -> Self {
        self.dependents.push(pattern.into());
        self
    }

    pub fn factory(&self) -> Option<&dyn ValueFactory> {
        self.factory.as_deref()
    }

    pub fn dependents(&self) -> &[Arc<Pattern>] {
        &self.dependents
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("factory", &self.factory.as_ref().map(|fa| fa.name()))
            .field("dependents", &self.dependents.len())
            .finish()
    }
}

/// An immutable call-site matcher plus its dependent patterns.
pub struct Pattern {
    target_types: Vec<String>,
    match_mode: MatchMode,
    call_shape: CallShape,
    context: ContextKind,
    bundle: String,
    detect_as: Vec<Arc<dyn ValueFactory>>,
    parameters: Vec<ParameterSpec>,
    invocation_dependents: Vec<Arc<Pattern>>,
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder::new()
    }

    pub fn target_types(&self) -> &[String] {
        &self.target_types
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn call_shape(&self) -> &CallShape {
        &self.call_shape
    }

    pub fn context(&self) -> ContextKind {
        self.context
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn detect_as(&self) -> &[Arc<dyn ValueFactory>] {
        &self.detect_as
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn invocation_dependents(&self) -> &[Arc<Pattern>] {
        &self.invocation_dependents
    }

    /// Shape check: target type membership, invocation kind, method name.
    pub fn matches_shape(&self, invocation: &Invocation) -> bool {
        let type_ok = match self.match_mode {
            MatchMode::Exact => invocation
                .concrete_type()
                .is_some_and(|t| self.target_types.iter().any(|p| p == t)),
            MatchMode::Subtype => invocation
                .target_types
                .iter()
                .any(|t| self.target_types.iter().any(|p| p == t)),
        };
        if !type_ok {
            return false;
        }

        match (&self.call_shape, &invocation.kind) {
            (CallShape::Constructor, InvocationKind::Constructor) => true,
            (CallShape::Method(matcher), InvocationKind::Method(name)) => match matcher {
                MethodMatcher::Any => true,
                MethodMatcher::Named(expected) => expected == name,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("target_types", &self.target_types)
            .field("match_mode", &self.match_mode)
            .field("call_shape", &self.call_shape)
            .field("context", &self.context)
            .field("bundle", &self.bundle)
            .field("parameters", &self.parameters)
            .field("invocation_dependents", &self.invocation_dependents.len())
            .finish()
    }
}

/// Fluent pattern builder. `build` validates the sequence and never hands
/// out a degenerate pattern.
pub struct PatternBuilder {
    target_types: Vec<String>,
    match_mode: MatchMode,
    call_shape: Option<CallShape>,
    shape_conflict: Option<(&'static str, &'static str)>,
    context: Option<ContextKind>,
    bundle: String,
    detect_as: Vec<Arc<dyn ValueFactory>>,
    parameters: Vec<ParameterSpec>,
    invocation_dependents: Vec<Arc<Pattern>>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self {
            target_types: Vec::new(),
            match_mode: MatchMode::Exact,
            call_shape: None,
            shape_conflict: None,
            context: None,
            bundle: "default".to_string(),
            detect_as: Vec::new(),
            parameters: Vec::new(),
            invocation_dependents: Vec::new(),
        }
    }

    pub fn for_type(mut self, target: impl Into<String>) -> Self {
        self.target_types.push(target.into());
        self
    }

    pub fn for_types(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target_types
            .extend(targets.into_iter().map(Into::into));
        self
    }

    /// Accept subtypes of the target types as reported by the front-end.
    pub fn match_subtypes(mut self) -> Self {
        self.match_mode = MatchMode::Subtype;
        self
    }

    pub fn constructor(self) -> Self {
        self.set_call_shape(CallShape::Constructor)
    }

    pub fn method(self, name: impl Into<String>) -> Self {
        self.set_call_shape(CallShape::Method(MethodMatcher::Named(name.into())))
    }

    pub fn any_method(self) -> Self {
        self.set_call_shape(CallShape::Method(MethodMatcher::Any))
    }

    fn set_call_shape(mut self, shape: CallShape) -> Self {
        match &self.call_shape {
            // Recorded here, reported by build(): builders stay chainable.
            Some(existing) if self.shape_conflict.is_none() => {
                self.shape_conflict = Some((existing.describe(), shape.describe()));
            }
            Some(_) => {}
            None => self.call_shape = Some(shape),
        }
        self
    }

    pub fn in_context(mut self, context: ContextKind) -> Self {
        self.context = Some(context);
        self
    }

    pub fn bundle(mut self, tag: impl Into<String>) -> Self {
        self.bundle = tag.into();
        self
    }

    /// Attach an invocation-level value factory (index −1).
    pub fn detect_as(mut self, factory: impl ValueFactory + 'static) -> Self {
        self.detect_as.push(Arc::new(factory));
        self
    }

    /// Sugar for `detect_as(ActionFactory::new(action))`.
    pub fn with_action(self, action: ActionKind) -> Self {
        self.detect_as(ActionFactory::new(action))
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Attach a whole-invocation dependent pattern (index −1), matched
    /// against the receiver or enclosing wrapper call.
    pub fn depends_on(mut self, pattern: impl Into<Arc<Pattern>>) -> Self {
        self.invocation_dependents.push(pattern.into());
        self
    }

    pub fn build(self) -> Result<Pattern, PatternBuildError> {
        if self.target_types.is_empty() {
            return Err(PatternBuildError::MissingTargetType);
        }
        if let Some((first, second)) = self.shape_conflict {
            return Err(PatternBuildError::conflicting_call_shape(first, second));
        }
        let call_shape = self.call_shape.ok_or(PatternBuildError::MissingCallShape)?;
        if let CallShape::Method(MethodMatcher::Named(name)) = &call_shape {
            if name.is_empty() {
                return Err(PatternBuildError::EmptyMethodName);
            }
        }
        let context = self.context.ok_or(PatternBuildError::MissingContext)?;

        Ok(Pattern {
            target_types: self.target_types,
            match_mode: self.match_mode,
            call_shape,
            context,
            bundle: self.bundle,
            detect_as: self.detect_as,
            parameters: self.parameters,
            invocation_dependents: self.invocation_dependents,
        })
    }
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self::new()
    }
}
