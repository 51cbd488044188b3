//! Shipped reorganization rules.
//!
//! Generic shape fixes only; bundle-specific rule sets are supplied by the
//! caller alongside their mapper tables.

use crate::asset::{AssetKind, AssetNode};

use super::ReorganizerRule;

pub fn default_rules() -> Vec<ReorganizerRule> {
    vec![
        // Generic translation nests cipher parameters under an Algorithm
        // wrapper; hoist them onto the enclosing primitive node.
        ReorganizerRule::for_kind(AssetKind::Algorithm)
            .with_any_child_of([
                AssetKind::Mode,
                AssetKind::Padding,
                AssetKind::KeyLength,
                AssetKind::DigestSize,
                AssetKind::InitializationVector,
                AssetKind::Nonce,
            ])
            .splice(),
        // A generic Key carrying an asymmetric half is really that half.
        ReorganizerRule::for_kind(AssetKind::Key)
            .with_any_child_of([AssetKind::PublicKey, AssetKind::PrivateKey])
            .replace_with(|node| {
                let kind = if node.child(AssetKind::PublicKey).is_some() {
                    AssetKind::PublicKey
                } else {
                    AssetKind::PrivateKey
                };
                let mut replacement = AssetNode::new(kind, node.value().to_string());
                if let Some(location) = node.location() {
                    replacement = replacement.with_location(location.clone());
                }
                replacement
            }),
        // Fold the underlying digest into the HMAC rendering.
        ReorganizerRule::for_kind(AssetKind::Mac)
            .rendered("HMAC")
            .with_any_child_of([AssetKind::MessageDigest])
            .replace_with(|node| {
                let digest = node
                    .child(AssetKind::MessageDigest)
                    .map(AssetNode::render)
                    .unwrap_or_default();
                let mut replacement =
                    AssetNode::new(AssetKind::Mac, format!("HMAC-{digest}"));
                if let Some(location) = node.location() {
                    replacement = replacement.with_location(location.clone());
                }
                replacement
            }),
    ]
}
