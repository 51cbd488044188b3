//! Index arena backing forest rewrites.
//!
//! Nodes are addressed by index with explicit parent links, so splice and
//! replace are link updates rather than equality scans. Root slots are
//! patched by position: distinct roots may render identically.

use std::collections::BTreeMap;

use crate::asset::{AssetKind, AssetNode};
use crate::ast::Location;

struct Entry {
    kind: AssetKind,
    value: String,
    location: Option<Location>,
    parent: Option<usize>,
    children: BTreeMap<AssetKind, usize>,
}

pub(crate) struct Arena {
    entries: Vec<Entry>,
    roots: Vec<usize>,
}

impl Arena {
    pub fn from_forest(forest: Vec<AssetNode>) -> Self {
        let mut arena = Self {
            entries: Vec::new(),
            roots: Vec::new(),
        };
        for node in forest {
            let id = arena.insert(node, None);
            arena.roots.push(id);
        }
        arena
    }

    fn insert(&mut self, mut node: AssetNode, parent: Option<usize>) -> usize {
        let children = node.take_children();
        let id = self.entries.len();
        self.entries.push(Entry {
            kind: node.kind(),
            value: node.value().to_string(),
            location: node.location().cloned(),
            parent,
            children: BTreeMap::new(),
        });
        for (kind, child) in children {
            let child_id = self.insert(child, Some(id));
            self.entries[id].children.insert(kind, child_id);
        }
        id
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn root_at(&self, position: usize) -> usize {
        self.roots[position]
    }

    pub fn children_ids(&self, id: usize) -> Vec<usize> {
        self.entries[id].children.values().copied().collect()
    }

    /// Deep-copy the subtree at `id` back into an owned asset node.
    pub fn materialize(&self, id: usize) -> AssetNode {
        let entry = &self.entries[id];
        let mut node = AssetNode::new(entry.kind, entry.value.clone());
        if let Some(location) = &entry.location {
            node = node.with_location(location.clone());
        }
        for child_id in entry.children.values() {
            node.put_child(self.materialize(*child_id));
        }
        node
    }

    /// Move all children of `id` onto its parent and clear `id`'s child
    /// map. Returns false (and does nothing) when `id` is a root.
    pub fn splice(&mut self, id: usize) -> bool {
        let Some(parent) = self.entries[id].parent else {
            return false;
        };
        let children = std::mem::take(&mut self.entries[id].children);
        for (kind, child_id) in children {
            self.entries[child_id].parent = Some(parent);
            // One child per kind: a same-kind sibling under the parent is
            // displaced, the spliced node itself included.
            self.entries[parent].children.insert(kind, child_id);
        }
        true
    }

    /// Substitute `replacement` for the node at `id`. The new node inherits
    /// every child of the original; the parent's child-map entry (or the
    /// root-list slot, found by position) is patched to the new node.
    pub fn replace(&mut self, id: usize, replacement: AssetNode) -> usize {
        let parent = self.entries[id].parent;
        let new_id = self.insert(replacement, parent);

        let children = std::mem::take(&mut self.entries[id].children);
        for (kind, child_id) in children {
            self.entries[child_id].parent = Some(new_id);
            self.entries[new_id].children.insert(kind, child_id);
        }

        match parent {
            Some(parent_id) => {
                let old_key = self.entries[parent_id]
                    .children
                    .iter()
                    .find(|(_, v)| **v == id)
                    .map(|(k, _)| *k);
                if let Some(key) = old_key {
                    self.entries[parent_id].children.remove(&key);
                }
                let new_kind = self.entries[new_id].kind;
                self.entries[parent_id].children.insert(new_kind, new_id);
            }
            None => {
                if let Some(slot) = self.roots.iter().position(|r| *r == id) {
                    self.roots[slot] = new_id;
                }
            }
        }
        self.entries[id].parent = None;
        new_id
    }

    pub fn into_forest(self) -> Vec<AssetNode> {
        self.roots
            .iter()
            .map(|id| self.materialize(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cipher_tree() -> AssetNode {
        AssetNode::new(AssetKind::BlockCipher, "AES")
            .with_child(
                AssetNode::new(AssetKind::Algorithm, "AES")
                    .with_child(AssetNode::new(AssetKind::Mode, "CBC"))
                    .with_child(AssetNode::new(AssetKind::KeyLength, "128")),
            )
    }

    #[test]
    fn test_round_trip_preserves_forest() {
        let forest = vec![cipher_tree(), AssetNode::new(AssetKind::Mac, "HMAC")];
        let arena = Arena::from_forest(forest.clone());
        assert_eq!(arena.into_forest(), forest);
    }

    #[test]
    fn test_splice_moves_children_to_parent() {
        let arena_forest = vec![cipher_tree()];
        let mut arena = Arena::from_forest(arena_forest);
        let root = arena.root_at(0);
        let algorithm = arena.children_ids(root)[0];

        assert!(arena.splice(algorithm));
        let forest = arena.into_forest();

        let cipher = &forest[0];
        assert!(cipher.child(AssetKind::Mode).is_some());
        assert!(cipher.child(AssetKind::KeyLength).is_some());
        // The spliced node stays in place, emptied.
        let algorithm = cipher.child(AssetKind::Algorithm).unwrap();
        assert!(algorithm.is_leaf());
    }

    #[test]
    fn test_splice_at_root_is_noop() {
        let mut arena = Arena::from_forest(vec![cipher_tree()]);
        let root = arena.root_at(0);
        assert!(!arena.splice(root));
        assert_eq!(arena.into_forest(), vec![cipher_tree()]);
    }

    #[test]
    fn test_replace_root_patches_slot_by_position() {
        // Two roots rendering identically: position must disambiguate.
        let forest = vec![
            AssetNode::new(AssetKind::Key, "RSA"),
            AssetNode::new(AssetKind::Key, "RSA"),
        ];
        let mut arena = Arena::from_forest(forest);
        let second = arena.root_at(1);
        arena.replace(second, AssetNode::new(AssetKind::PublicKey, "RSA"));

        let forest = arena.into_forest();
        assert_eq!(forest[0].kind(), AssetKind::Key);
        assert_eq!(forest[1].kind(), AssetKind::PublicKey);
    }

    #[test]
    fn test_replace_inherits_children_and_patches_parent() {
        let mut arena = Arena::from_forest(vec![cipher_tree()]);
        let root = arena.root_at(0);
        let algorithm = arena.children_ids(root)[0];

        let new_id = arena.replace(algorithm, AssetNode::new(AssetKind::Padding, "PKCS7"));
        assert_eq!(arena.children_ids(new_id).len(), 2);

        let forest = arena.into_forest();
        let cipher = &forest[0];
        assert!(cipher.child(AssetKind::Algorithm).is_none());
        let padding = cipher.child(AssetKind::Padding).unwrap();
        assert!(padding.child(AssetKind::Mode).is_some());
        assert!(padding.child(AssetKind::KeyLength).is_some());
    }
}
