//! Per-scan inventory accumulation.
//!
//! One session owns one scan's pipeline configuration and its accumulated
//! assets; lifecycle (reset) is tied to the session, never to process-wide
//! state. Parallel callers run one engine per call site and serialize
//! around the session when appending.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::asset::AssetNode;
use crate::ast::Expr;
use crate::engine::{Finding, MatchEngine};
use crate::enrich::Enricher;
use crate::pattern::Pattern;
use crate::reorganize::{default_rules, Reorganizer, ReorganizerRule};
use crate::translate::{default_mapper_table, MapperTable, Translator};

/// Per-root scan context: where the expression under analysis came from.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub file: String,
    pub language: Option<String>,
    pub bundle: String,
}

impl ScanContext {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            language: None,
            bundle: "default".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = bundle.into();
        self
    }
}

/// Explicit accumulator for one scan: findings go in, canonical assets
/// come out of the synchronous Translate→Reorganize→Enrich chain.
pub struct InventorySession {
    engine: MatchEngine,
    mappers: MapperTable,
    reorganizer: Reorganizer,
    enrichment: bool,
    assets: Vec<AssetNode>,
}

impl InventorySession {
    /// A session with the shipped baseline: generic mapper table, default
    /// reorganization rules, enrichment on.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_mappers(mappers: MapperTable) -> Self {
        Self::builder().mappers(mappers).build()
    }

    pub fn builder() -> InventorySessionBuilder {
        InventorySessionBuilder::new()
    }

    /// Run the engine on one call site and record the resulting finding.
    /// Returns the number of assets appended.
    pub fn analyze(&mut self, expr: &Expr, pattern: &Arc<Pattern>, ctx: &ScanContext) -> usize {
        let finding = self.engine.start(expr, pattern, ctx);
        self.record(&finding)
    }

    /// Translate, reorganize and enrich a finding, appending the resulting
    /// top-level assets. Order of accumulation is not significant.
    pub fn record(&mut self, finding: &Finding) -> usize {
        let translated = Translator::translate(finding, &self.mappers);
        if translated.is_empty() {
            trace!(bundle = finding.bundle(), "finding produced no assets");
            return 0;
        }
        let mut forest = self.reorganizer.reorganize(translated);
        if self.enrichment {
            Enricher::enrich(&mut forest);
        }
        let appended = forest.len();
        debug!(bundle = finding.bundle(), appended, "recorded finding");
        self.assets.extend(forest);
        appended
    }

    pub fn assets(&self) -> &[AssetNode] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Drop everything accumulated so far, keeping the configuration.
    pub fn reset(&mut self) {
        self.assets.clear();
    }

    pub fn into_assets(self) -> Vec<AssetNode> {
        self.assets
    }
}

impl Default for InventorySession {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InventorySessionBuilder {
    mappers: Option<MapperTable>,
    rules: Option<Vec<ReorganizerRule>>,
    enrichment: bool,
}

impl InventorySessionBuilder {
    pub fn new() -> Self {
        Self {
            mappers: None,
            rules: None,
            enrichment: true,
        }
    }

    pub fn mappers(mut self, mappers: MapperTable) -> Self {
        self.mappers = Some(mappers);
        self
    }

    pub fn rules(mut self, rules: Vec<ReorganizerRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn without_enrichment(mut self) -> Self {
        self.enrichment = false;
        self
    }

    pub fn build(self) -> InventorySession {
        InventorySession {
            engine: MatchEngine::new(),
            mappers: self.mappers.unwrap_or_else(default_mapper_table),
            reorganizer: Reorganizer::new(self.rules.unwrap_or_else(default_rules)),
            enrichment: self.enrichment,
            assets: Vec::new(),
        }
    }
}

impl Default for InventorySessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::ast::Location;
    use crate::engine::ContextKind;
    use crate::pattern::{NameFactory, ParameterSpec};
    use pretty_assertions::assert_eq;

    fn loc() -> Location {
        Location::new("app.py", 7, 1)
    }

    fn cipher_pattern() -> Arc<Pattern> {
        Arc::new(
            Pattern::builder()
                .for_type("Cipher")
                .method("new")
                .in_context(ContextKind::Cipher)
                .bundle("pyca")
                .param(ParameterSpec::value(NameFactory))
                .build()
                .unwrap(),
        )
    }

    fn aes_call() -> Expr {
        Expr::method(
            ["Cipher"],
            "new",
            None,
            vec![Expr::string_literal("AES", loc())],
            loc(),
        )
    }

    #[test]
    fn test_analyze_accumulates_assets() {
        let mut session = InventorySession::new();
        let appended = session.analyze(&aes_call(), &cipher_pattern(), &ScanContext::new("app.py"));

        assert_eq!(appended, 1);
        assert_eq!(session.len(), 1);
        let cipher = &session.assets()[0];
        assert_eq!(cipher.kind(), AssetKind::BlockCipher);
        // Default enrichment infers the family key length.
        assert_eq!(cipher.child(AssetKind::KeyLength).unwrap().value(), "128");
    }

    #[test]
    fn test_recording_twice_appends_twice() {
        let mut session = InventorySession::new();
        let ctx = ScanContext::new("app.py");
        let finding = MatchEngine::new().start(&aes_call(), &cipher_pattern(), &ctx);

        session.record(&finding);
        session.record(&finding);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_reset_empties_accumulator() {
        let mut session = InventorySession::new();
        session.analyze(&aes_call(), &cipher_pattern(), &ScanContext::new("app.py"));
        assert!(!session.is_empty());

        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
    }

    #[test]
    fn test_without_enrichment() {
        let mut session = InventorySession::builder().without_enrichment().build();
        session.analyze(&aes_call(), &cipher_pattern(), &ScanContext::new("app.py"));
        assert!(session.assets()[0].is_leaf());
    }

    #[test]
    fn test_non_matching_call_records_nothing() {
        let mut session = InventorySession::new();
        let expr = Expr::method(["Logger"], "new", None, vec![], loc());
        let appended = session.analyze(&expr, &cipher_pattern(), &ScanContext::new("app.py"));
        assert_eq!(appended, 0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_scan_context_builders() {
        let ctx = ScanContext::new("lib.go")
            .with_language("go")
            .with_bundle("stdlib");
        assert_eq!(ctx.file, "lib.go");
        assert_eq!(ctx.language.as_deref(), Some("go"));
        assert_eq!(ctx.bundle, "stdlib");
    }
}
