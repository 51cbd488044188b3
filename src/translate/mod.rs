//! Match-tree to asset-forest translation.
//!
//! Translation is a pure function over the match tree: each value is mapped
//! through the injected table entry for its node's context kind, results are
//! grouped by parameter index, and child assets attach under the group for
//! their index. A value with no table entry contributes nothing and never
//! blocks its siblings.

mod defaults;

pub use defaults::default_mapper_table;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::asset::AssetNode;
use crate::engine::{ContextKind, Finding, MatchNode, Value};

pub type MapperFn = dyn Fn(&Value) -> Option<AssetNode> + Send + Sync;

/// Context-kind → mapping-function table, injected by callers.
#[derive(Clone, Default)]
pub struct MapperTable {
    entries: HashMap<ContextKind, Arc<MapperFn>>,
}

impl MapperTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        context: ContextKind,
        mapper: impl Fn(&Value) -> Option<AssetNode> + Send + Sync + 'static,
    ) -> Self {
        self.entries.insert(context, Arc::new(mapper));
        self
    }

    pub fn map(&self, context: ContextKind, value: &Value) -> Option<AssetNode> {
        self.entries.get(&context).and_then(|mapper| mapper(value))
    }

    pub fn contains(&self, context: ContextKind) -> bool {
        self.entries.contains_key(&context)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Translator;

impl Translator {
    /// Translate a finding into a flat list of top-level asset nodes.
    /// Each shallowest content node of the match tree roots its own forest
    /// entries; re-running on an unchanged finding yields an identical
    /// forest.
    pub fn translate(finding: &Finding, table: &MapperTable) -> Vec<AssetNode> {
        finding
            .content_nodes()
            .into_iter()
            .flat_map(|node| Self::translate_node(node, table))
            .collect()
    }

    fn translate_node(node: &MatchNode, table: &MapperTable) -> Vec<AssetNode> {
        let context = node.context();
        let mut groups: BTreeMap<i32, Vec<AssetNode>> = BTreeMap::new();

        if let Some(action) = node.action() {
            match table.map(context, action) {
                Some(asset) => groups
                    .entry(crate::pattern::INVOCATION_INDEX)
                    .or_default()
                    .push(asset),
                None => trace!(context = %context, "no mapping for action value"),
            }
        }

        for (index, value) in node.values() {
            match table.map(context, value) {
                Some(asset) => groups.entry(*index).or_default().push(asset),
                None => trace!(context = %context, index, "no mapping for value; dropped"),
            }
        }

        for (index, siblings) in node.children() {
            let child_assets: Vec<AssetNode> = siblings
                .iter()
                .flat_map(|child| Self::translate_node(child, table))
                .collect();
            if child_assets.is_empty() {
                continue;
            }

            // Attach under the group for this index; fall back to the first
            // available group rather than discarding. A node that produced
            // no assets of its own hoists its children's assets in place.
            let target = if groups.contains_key(index) {
                Some(*index)
            } else {
                groups.keys().next().copied()
            };
            match target {
                Some(key) => {
                    if let Some(parents) = groups.get_mut(&key) {
                        for parent in parents.iter_mut() {
                            for asset in &child_assets {
                                parent.put_child(asset.clone());
                            }
                        }
                    }
                }
                None => {
                    groups.entry(*index).or_default().extend(child_assets);
                }
            }
        }

        groups.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::ast::{Expr, Location};
    use crate::engine::MatchEngine;
    use crate::pattern::{FixedNameFactory, NameFactory, ParameterSpec, Pattern, SizeFactory};
    use crate::session::ScanContext;
    use pretty_assertions::assert_eq;

    fn loc() -> Location {
        Location::new("main.go", 12, 4)
    }

    fn cipher_table() -> MapperTable {
        MapperTable::new().with(ContextKind::Cipher, |value| {
            value.as_name().map(|name| {
                AssetNode::new(AssetKind::BlockCipher, name)
                    .with_location(value.location.clone())
            })
        })
    }

    fn finding_for(pattern: Pattern, expr: &Expr) -> Finding {
        let engine = MatchEngine::new();
        engine.start(
            expr,
            &Arc::new(pattern),
            &ScanContext::new("main.go"),
        )
    }

    #[test]
    fn test_translate_single_value() {
        let pattern = Pattern::builder()
            .for_type("NewCipher")
            .constructor()
            .in_context(ContextKind::Cipher)
            .param(ParameterSpec::value(NameFactory))
            .build()
            .unwrap();
        let expr = Expr::constructor(
            ["NewCipher"],
            vec![Expr::string_literal("AES", loc())],
            loc(),
        );

        let forest = Translator::translate(&finding_for(pattern, &expr), &cipher_table());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].kind(), AssetKind::BlockCipher);
        assert_eq!(forest[0].value(), "AES");
        assert_eq!(forest[0].location(), Some(&loc()));
    }

    #[test]
    fn test_unmapped_context_drops_value_keeps_siblings() {
        // Digest has no table entry; cipher sibling must survive.
        let table = cipher_table();
        let digest_dep = Arc::new(
            Pattern::builder()
                .for_type("NewHash")
                .constructor()
                .in_context(ContextKind::Digest)
                .detect_as(FixedNameFactory::new("SHA-256"))
                .build()
                .unwrap(),
        );
        let cipher_dep = Arc::new(
            Pattern::builder()
                .for_type("NewAES")
                .constructor()
                .in_context(ContextKind::Cipher)
                .detect_as(FixedNameFactory::new("AES"))
                .build()
                .unwrap(),
        );
        let pattern = Pattern::builder()
            .for_type("Seal")
            .constructor()
            .in_context(ContextKind::Cipher)
            .param(ParameterSpec::any().with_dependent(cipher_dep))
            .param(ParameterSpec::any().with_dependent(digest_dep))
            .build()
            .unwrap();
        let expr = Expr::constructor(
            ["Seal"],
            vec![
                Expr::constructor(["NewAES"], vec![], loc()),
                Expr::constructor(["NewHash"], vec![], loc()),
            ],
            loc(),
        );

        let forest = Translator::translate(&finding_for(pattern, &expr), &table);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].value(), "AES");
    }

    #[test]
    fn test_child_assets_attach_by_index() {
        let size_table = MapperTable::new().with(ContextKind::Cipher, |value| {
            if let Some(name) = value.as_name() {
                return Some(AssetNode::new(AssetKind::BlockCipher, name));
            }
            value
                .as_size()
                .map(|bits| AssetNode::new(AssetKind::KeyLength, bits.to_string()))
        });

        let key_size_dep = Arc::new(
            Pattern::builder()
                .for_type("KeySize")
                .constructor()
                .in_context(ContextKind::Cipher)
                .param(ParameterSpec::value(SizeFactory::bits()))
                .build()
                .unwrap(),
        );
        let pattern = Pattern::builder()
            .for_type("NewCipher")
            .constructor()
            .in_context(ContextKind::Cipher)
            .param(ParameterSpec::value(NameFactory).with_dependent(key_size_dep))
            .build()
            .unwrap();
        let expr = Expr::constructor(
            ["NewCipher"],
            vec![Expr::constructor(
                ["KeySize"],
                vec![Expr::int_literal(192, loc())],
                loc(),
            )],
            loc(),
        );

        // The name factory sees a constructor argument, not a string
        // literal, so only the dependent contributes a child-level asset;
        // with no group at index 0 the child is hoisted.
        let forest = Translator::translate(&finding_for(pattern, &expr), &size_table);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].kind(), AssetKind::KeyLength);
        assert_eq!(forest[0].value(), "192");
    }

    #[test]
    fn test_translate_is_idempotent() {
        let pattern = Pattern::builder()
            .for_type("NewCipher")
            .constructor()
            .in_context(ContextKind::Cipher)
            .param(ParameterSpec::value(NameFactory))
            .build()
            .unwrap();
        let expr = Expr::constructor(
            ["NewCipher"],
            vec![Expr::string_literal("Serpent", loc())],
            loc(),
        );
        let finding = finding_for(pattern, &expr);
        let table = cipher_table();

        let first = Translator::translate(&finding, &table);
        let second = Translator::translate(&finding, &table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_finding_translates_to_empty_forest() {
        let pattern = Pattern::builder()
            .for_type("NewCipher")
            .constructor()
            .in_context(ContextKind::Cipher)
            .build()
            .unwrap();
        let expr = Expr::constructor(["Unrelated"], vec![], loc());

        let forest = Translator::translate(&finding_for(pattern, &expr), &cipher_table());
        assert!(forest.is_empty());
    }

    #[test]
    fn test_mapper_table_accessors() {
        let table = cipher_table();
        assert!(table.contains(ContextKind::Cipher));
        assert!(!table.contains(ContextKind::Digest));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
