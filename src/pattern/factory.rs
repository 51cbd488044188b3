use crate::ast::{Expr, Literal};
use crate::engine::{ActionKind, Value};

/// Produces a typed [`Value`] from an argument (or invocation) expression.
///
/// Factories are the extraction half of a pattern: the shape check decides
/// whether a call site is relevant, factories pull the interesting values
/// out of it. Returning `None` drops the slot without failing the match.
pub trait ValueFactory: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, expr: &Expr) -> Option<Value>;
}

/// Extracts a string literal as an algorithm/display name.
pub struct NameFactory;

impl ValueFactory for NameFactory {
    fn name(&self) -> &'static str {
        "name"
    }

    fn extract(&self, expr: &Expr) -> Option<Value> {
        match expr.as_literal()? {
            Literal::Str(s) => Some(Value::name(s.clone(), expr.location.clone())),
            _ => None,
        }
    }
}

/// Always yields a fixed display name, located at the matched expression.
///
/// Used when the invocation itself identifies the primitive, e.g. a
/// zero-argument `MD5Digest()` constructor.
pub struct FixedNameFactory {
    value: String,
}

impl FixedNameFactory {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl ValueFactory for FixedNameFactory {
    fn name(&self) -> &'static str {
        "fixed_name"
    }

    fn extract(&self, expr: &Expr) -> Option<Value> {
        Some(Value::name(self.value.clone(), expr.location.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bits,
    Bytes,
}

/// Extracts an integer literal as a size, normalized to bits.
pub struct SizeFactory {
    unit: SizeUnit,
}

impl SizeFactory {
    pub fn bits() -> Self {
        Self {
            unit: SizeUnit::Bits,
        }
    }

    pub fn bytes() -> Self {
        Self {
            unit: SizeUnit::Bytes,
        }
    }
}

impl ValueFactory for SizeFactory {
    fn name(&self) -> &'static str {
        "size"
    }

    fn extract(&self, expr: &Expr) -> Option<Value> {
        match expr.as_literal()? {
            Literal::Int(n) if *n >= 0 => {
                let bits = match self.unit {
                    SizeUnit::Bits => *n as u64,
                    SizeUnit::Bytes => (*n as u64) * 8,
                };
                Some(Value::size(bits, expr.location.clone()))
            }
            _ => None,
        }
    }
}

/// Extracts a boolean literal.
pub struct BooleanFactory;

impl ValueFactory for BooleanFactory {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn extract(&self, expr: &Expr) -> Option<Value> {
        match expr.as_literal()? {
            Literal::Bool(b) => Some(Value::boolean(*b, expr.location.clone())),
            _ => None,
        }
    }
}

/// Always yields a fixed enumerated action, located at the matched
/// expression. One action value per match node discriminates the operation.
pub struct ActionFactory {
    action: ActionKind,
}

impl ActionFactory {
    pub fn new(action: ActionKind) -> Self {
        Self { action }
    }
}

impl ValueFactory for ActionFactory {
    fn name(&self) -> &'static str {
        "action"
    }

    fn extract(&self, expr: &Expr) -> Option<Value> {
        Some(Value::action(self.action, expr.location.clone()))
    }
}
