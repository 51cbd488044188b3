//! Generic baseline mapper table.
//!
//! Maps values by their kind alone: names become the primitive node for the
//! context, sizes become key/digest lengths, actions become action nodes.
//! Real deployments inject sharper tables per detection bundle; this
//! baseline keeps the pipeline usable out of the box.

use crate::asset::{AssetKind, AssetNode};
use crate::engine::{ContextKind, Value, ValueKind};

use super::MapperTable;

fn map_generic(
    value: &Value,
    name_kind: AssetKind,
    size_kind: AssetKind,
) -> Option<AssetNode> {
    let node = match &value.kind {
        ValueKind::Name(name) => AssetNode::new(name_kind, name.clone()),
        ValueKind::Size(bits) => AssetNode::new(size_kind, bits.to_string()),
        ValueKind::Action(action) => AssetNode::new(AssetKind::Action, action.as_str()),
        ValueKind::Boolean(_) => return None,
    };
    Some(node.with_location(value.location.clone()))
}

pub fn default_mapper_table() -> MapperTable {
    MapperTable::new()
        .with(ContextKind::Cipher, |v| {
            map_generic(v, AssetKind::BlockCipher, AssetKind::KeyLength)
        })
        .with(ContextKind::Digest, |v| {
            map_generic(v, AssetKind::MessageDigest, AssetKind::DigestSize)
        })
        .with(ContextKind::Key, |v| {
            map_generic(v, AssetKind::Key, AssetKind::KeyLength)
        })
        .with(ContextKind::Mac, |v| {
            map_generic(v, AssetKind::Mac, AssetKind::KeyLength)
        })
        .with(ContextKind::Signature, |v| {
            map_generic(v, AssetKind::Signature, AssetKind::KeyLength)
        })
        .with(ContextKind::KeyDerivation, |v| {
            map_generic(v, AssetKind::KeyDerivationFunction, AssetKind::KeyLength)
        })
        .with(ContextKind::KeyAgreement, |v| {
            map_generic(v, AssetKind::KeyAgreement, AssetKind::KeyLength)
        })
        .with(ContextKind::Protocol, |v| {
            map_generic(v, AssetKind::Protocol, AssetKind::KeyLength)
        })
        .with(ContextKind::Random, |v| {
            map_generic(v, AssetKind::Algorithm, AssetKind::KeyLength)
        })
}
