//! Post-normalization enrichment.
//!
//! Visits every node parent-first, exactly once, dispatching on the node
//! kind and appending derived children (inferred default parameters).
//! Enrichment never removes existing content; running it again on an
//! already-enriched forest changes nothing.

mod defaults;

use tracing::trace;

use crate::asset::{AssetKind, AssetNode};

use defaults::{default_key_length, digest_output_bits};

pub struct Enricher;

impl Enricher {
    pub fn enrich(forest: &mut [AssetNode]) {
        for node in forest.iter_mut() {
            Self::enrich_node(node);
        }
    }

    fn enrich_node(node: &mut AssetNode) {
        Self::apply(node);
        // Parent first: children appended above are enriched here too.
        for child in node.children_mut() {
            Self::enrich_node(child);
        }
    }

    fn apply(node: &mut AssetNode) {
        match node.kind() {
            AssetKind::BlockCipher | AssetKind::StreamCipher => Self::enrich_cipher(node),
            AssetKind::MessageDigest => Self::enrich_digest(node),
            AssetKind::Mac => Self::enrich_mac(node),
            _ => {}
        }
    }

    fn enrich_cipher(node: &mut AssetNode) {
        if node.child(AssetKind::KeyLength).is_some() {
            return;
        }
        if let Some(bits) = default_key_length(node.value()) {
            trace!(algorithm = node.value(), bits, "inferred default key length");
            node.put_child(Self::derived(node, AssetKind::KeyLength, bits));
        }
    }

    fn enrich_digest(node: &mut AssetNode) {
        if node.child(AssetKind::DigestSize).is_some() {
            return;
        }
        if let Some(bits) = digest_output_bits(node.value()) {
            node.put_child(Self::derived(node, AssetKind::DigestSize, bits));
        }
    }

    /// An HMAC rendered with its digest baked in ("HMAC-SHA-256") gains the
    /// underlying digest as an explicit child.
    fn enrich_mac(node: &mut AssetNode) {
        if node.child(AssetKind::MessageDigest).is_some() {
            return;
        }
        let digest = match node.value().strip_prefix("HMAC-") {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => return,
        };
        node.put_child(Self::derived_named(node, AssetKind::MessageDigest, digest));
    }

    fn derived(parent: &AssetNode, kind: AssetKind, bits: u64) -> AssetNode {
        Self::derived_named(parent, kind, bits.to_string())
    }

    fn derived_named(parent: &AssetNode, kind: AssetKind, value: String) -> AssetNode {
        let mut child = AssetNode::new(kind, value);
        if let Some(location) = parent.location() {
            child = child.with_location(location.clone());
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cipher_gains_default_key_length() {
        let mut forest = vec![AssetNode::new(AssetKind::BlockCipher, "AES")];
        Enricher::enrich(&mut forest);
        let length = forest[0].child(AssetKind::KeyLength).unwrap();
        assert_eq!(length.value(), "128");
        assert_eq!(forest[0].render(), "AES-128");
    }

    #[test]
    fn test_explicit_key_length_is_kept() {
        let mut forest = vec![AssetNode::new(AssetKind::BlockCipher, "AES")
            .with_child(AssetNode::new(AssetKind::KeyLength, "256"))];
        Enricher::enrich(&mut forest);
        assert_eq!(
            forest[0].child(AssetKind::KeyLength).unwrap().value(),
            "256"
        );
    }

    #[test]
    fn test_digest_gains_output_size() {
        let mut forest = vec![AssetNode::new(AssetKind::MessageDigest, "SHA-256")];
        Enricher::enrich(&mut forest);
        assert_eq!(
            forest[0].child(AssetKind::DigestSize).unwrap().value(),
            "256"
        );
    }

    #[test]
    fn test_hmac_gains_digest_child_which_is_enriched_too() {
        let mut forest = vec![AssetNode::new(AssetKind::Mac, "HMAC-SHA-256")];
        Enricher::enrich(&mut forest);
        let digest = forest[0].child(AssetKind::MessageDigest).unwrap();
        assert_eq!(digest.value(), "SHA-256");
        // Parent-first visit reaches the appended child as well.
        assert_eq!(digest.child(AssetKind::DigestSize).unwrap().value(), "256");
    }

    #[test]
    fn test_unknown_families_untouched() {
        let mut forest = vec![AssetNode::new(AssetKind::BlockCipher, "Kalyna")];
        Enricher::enrich(&mut forest);
        assert!(forest[0].is_leaf());
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let mut forest = vec![
            AssetNode::new(AssetKind::BlockCipher, "AES"),
            AssetNode::new(AssetKind::Mac, "HMAC-MD5"),
        ];
        Enricher::enrich(&mut forest);
        let once = forest.clone();
        Enricher::enrich(&mut forest);
        assert_eq!(forest, once);
    }
}
