//! Canonical cryptographic asset model.
//!
//! The output side of the pipeline: kind-tagged nodes holding at most one
//! child per kind. Distinct top-level nodes may render identically, so the
//! reorganizer addresses roots by position, never by equality.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::Location;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub enum AssetKind {
    BlockCipher,
    StreamCipher,
    MessageDigest,
    Mac,
    Signature,
    PublicKeyEncryption,
    Key,
    PublicKey,
    PrivateKey,
    SecretKey,
    KeyDerivationFunction,
    KeyAgreement,
    Algorithm,
    Mode,
    Padding,
    KeyLength,
    DigestSize,
    InitializationVector,
    Nonce,
    SaltLength,
    Protocol,
    CipherSuite,
    Action,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockCipher => "block_cipher",
            Self::StreamCipher => "stream_cipher",
            Self::MessageDigest => "message_digest",
            Self::Mac => "mac",
            Self::Signature => "signature",
            Self::PublicKeyEncryption => "public_key_encryption",
            Self::Key => "key",
            Self::PublicKey => "public_key",
            Self::PrivateKey => "private_key",
            Self::SecretKey => "secret_key",
            Self::KeyDerivationFunction => "key_derivation_function",
            Self::KeyAgreement => "key_agreement",
            Self::Algorithm => "algorithm",
            Self::Mode => "mode",
            Self::Padding => "padding",
            Self::KeyLength => "key_length",
            Self::DigestSize => "digest_size",
            Self::InitializationVector => "initialization_vector",
            Self::Nonce => "nonce",
            Self::SaltLength => "salt_length",
            Self::Protocol => "protocol",
            Self::CipherSuite => "cipher_suite",
            Self::Action => "action",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of the canonical asset forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetNode {
    kind: AssetKind,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<AssetKind, AssetNode>,
}

impl AssetNode {
    pub fn new(kind: AssetKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            location: None,
            children: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_child(mut self, child: AssetNode) -> Self {
        self.put_child(child);
        self
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn children(&self) -> &BTreeMap<AssetKind, AssetNode> {
        &self.children
    }

    pub fn child(&self, kind: AssetKind) -> Option<&AssetNode> {
        self.children.get(&kind)
    }

    pub fn child_mut(&mut self, kind: AssetKind) -> Option<&mut AssetNode> {
        self.children.get_mut(&kind)
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut AssetNode> {
        self.children.values_mut()
    }

    /// Insert a child, keyed by its kind. At most one child per kind: a
    /// later write displaces the earlier one, which is returned.
    pub fn put_child(&mut self, child: AssetNode) -> Option<AssetNode> {
        self.children.insert(child.kind, child)
    }

    pub fn take_children(&mut self) -> BTreeMap<AssetKind, AssetNode> {
        std::mem::take(&mut self.children)
    }

    pub fn has_child_of(&self, kinds: &[AssetKind]) -> bool {
        kinds.iter().any(|k| self.children.contains_key(k))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// String rendering; primitives with parameter children compose, e.g.
    /// a block cipher with key length and mode renders "AES-128-CBC".
    pub fn render(&self) -> String {
        match self.kind {
            AssetKind::BlockCipher | AssetKind::StreamCipher => {
                let mut out = self.value.clone();
                if let Some(length) = self.child(AssetKind::KeyLength) {
                    out.push('-');
                    out.push_str(length.value());
                }
                if let Some(mode) = self.child(AssetKind::Mode) {
                    out.push('-');
                    out.push_str(mode.value());
                }
                out
            }
            _ => self.value.clone(),
        }
    }
}
