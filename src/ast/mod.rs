//! Front-end expression model.
//!
//! Language adapters lower their ASTs into this IR before handing nodes to
//! the match engine. The engine never parses source text and never resolves
//! types on its own: `Invocation::target_types` must already contain the
//! resolved type of the call target followed by its supertype chain.

use serde::{Deserialize, Serialize};

/// Source position of an expression, carried onto every extracted value
/// and every inventory node derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Placeholder for expressions the front-end could not attribute.
    pub fn unknown() -> Self {
        Self {
            file: String::new(),
            line: 0,
            column: 0,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// How a call site invokes its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationKind {
    Constructor,
    Method(String),
}

/// A call site: constructor invocation or named method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub kind: InvocationKind,
    /// Resolved type of the target, most specific first, then supertypes.
    pub target_types: Vec<String>,
    /// The governing sub-expression: the receiver a method is called on,
    /// or an enclosing wrapper call. Constructors usually have none.
    pub receiver: Option<Box<Expr>>,
    pub arguments: Vec<Expr>,
}

impl Invocation {
    pub fn method_name(&self) -> Option<&str> {
        match &self.kind {
            InvocationKind::Method(name) => Some(name),
            InvocationKind::Constructor => None,
        }
    }

    pub fn concrete_type(&self) -> Option<&str> {
        self.target_types.first().map(String::as_str)
    }
}

/// Literal shapes the front-end extracts for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
    Array(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Invocation(Invocation),
    Literal(Literal),
    Identifier(String),
    /// Anything the front-end could not shape into the above.
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Location,
}

impl Expr {
    pub fn constructor(
        target_types: impl IntoIterator<Item = impl Into<String>>,
        arguments: Vec<Expr>,
        location: Location,
    ) -> Self {
        Self {
            kind: ExprKind::Invocation(Invocation {
                kind: InvocationKind::Constructor,
                target_types: target_types.into_iter().map(Into::into).collect(),
                receiver: None,
                arguments,
            }),
            location,
        }
    }

    pub fn method(
        target_types: impl IntoIterator<Item = impl Into<String>>,
        name: impl Into<String>,
        receiver: Option<Expr>,
        arguments: Vec<Expr>,
        location: Location,
    ) -> Self {
        Self {
            kind: ExprKind::Invocation(Invocation {
                kind: InvocationKind::Method(name.into()),
                target_types: target_types.into_iter().map(Into::into).collect(),
                receiver: receiver.map(Box::new),
                arguments,
            }),
            location,
        }
    }

    pub fn string_literal(value: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ExprKind::Literal(Literal::Str(value.into())),
            location,
        }
    }

    pub fn int_literal(value: i64, location: Location) -> Self {
        Self {
            kind: ExprKind::Literal(Literal::Int(value)),
            location,
        }
    }

    pub fn bool_literal(value: bool, location: Location) -> Self {
        Self {
            kind: ExprKind::Literal(Literal::Bool(value)),
            location,
        }
    }

    pub fn array_literal(elements: Vec<Expr>, location: Location) -> Self {
        Self {
            kind: ExprKind::Literal(Literal::Array(elements)),
            location,
        }
    }

    pub fn identifier(name: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ExprKind::Identifier(name.into()),
            location,
        }
    }

    pub fn opaque(location: Location) -> Self {
        Self {
            kind: ExprKind::Opaque,
            location,
        }
    }

    pub fn as_invocation(&self) -> Option<&Invocation> {
        match &self.kind {
            ExprKind::Invocation(inv) => Some(inv),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}
