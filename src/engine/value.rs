//! Typed value extractions produced by pattern value factories.

use serde::Serialize;

use crate::ast::Location;

/// Enumerated cryptographic operation discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Digest,
    Tag,
    Generate,
    Derive,
    Agree,
    Encapsulate,
    Decapsulate,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::Sign => "sign",
            Self::Verify => "verify",
            Self::Digest => "digest",
            Self::Tag => "tag",
            Self::Generate => "generate",
            Self::Derive => "derive",
            Self::Agree => "agree",
            Self::Encapsulate => "encapsulate",
            Self::Decapsulate => "decapsulate",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification tag carried by every match node; the translator
/// dispatches its mapping functions on this tag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Cipher,
    Digest,
    Key,
    Mac,
    Signature,
    KeyDerivation,
    KeyAgreement,
    Protocol,
    Random,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cipher => "cipher",
            Self::Digest => "digest",
            Self::Key => "key",
            Self::Mac => "mac",
            Self::Signature => "signature",
            Self::KeyDerivation => "key_derivation",
            Self::KeyAgreement => "key_agreement",
            Self::Protocol => "protocol",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Name(String),
    Size(u64),
    Boolean(bool),
    Action(ActionKind),
}

/// An immutable typed extraction plus the source location it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub kind: ValueKind,
    pub location: Location,
}

impl Value {
    pub fn name(value: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ValueKind::Name(value.into()),
            location,
        }
    }

    pub fn size(value: u64, location: Location) -> Self {
        Self {
            kind: ValueKind::Size(value),
            location,
        }
    }

    pub fn boolean(value: bool, location: Location) -> Self {
        Self {
            kind: ValueKind::Boolean(value),
            location,
        }
    }

    pub fn action(action: ActionKind, location: Location) -> Self {
        Self {
            kind: ValueKind::Action(action),
            location,
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, ValueKind::Action(_))
    }

    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<u64> {
        match self.kind {
            ValueKind::Size(n) => Some(n),
            _ => None,
        }
    }
}
