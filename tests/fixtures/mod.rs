//! Shared builders for integration tests.

use std::sync::Arc;

use crypto_inventory_core::ast::{Expr, Location};
use crypto_inventory_core::pattern::{FixedNameFactory, ParameterSpec};
use crypto_inventory_core::{ContextKind, Pattern, ScanContext};

pub fn loc(line: usize) -> Location {
    Location::new("src/crypto_util.java", line, 9)
}

pub fn scan_ctx() -> ScanContext {
    ScanContext::new("src/crypto_util.java").with_language("java")
}

/// Constructor pattern for a concrete digest engine, detected as a fixed
/// algorithm name.
pub fn digest_engine(type_name: &str, algorithm: &str) -> Arc<Pattern> {
    Arc::new(
        Pattern::builder()
            .for_type(type_name)
            .constructor()
            .in_context(ContextKind::Digest)
            .bundle("bc")
            .detect_as(FixedNameFactory::new(algorithm))
            .build()
            .unwrap(),
    )
}

/// HMAC wrapper taking an abstract digest engine as its first constructor
/// argument; the concrete engine is resolved by dependent patterns.
pub fn hmac_wrapper(dependents: Vec<Arc<Pattern>>) -> Arc<Pattern> {
    let mut param = ParameterSpec::any();
    for dependent in dependents {
        param = param.with_dependent(dependent);
    }
    Arc::new(
        Pattern::builder()
            .for_type("HMac")
            .constructor()
            .in_context(ContextKind::Mac)
            .bundle("bc")
            .detect_as(FixedNameFactory::new("HMAC"))
            .param(param)
            .build()
            .unwrap(),
    )
}

/// `new HMac(new SHA256Digest())`
pub fn hmac_sha256_call() -> Expr {
    Expr::constructor(
        ["HMac"],
        vec![Expr::constructor(["SHA256Digest"], vec![], loc(21))],
        loc(20),
    )
}
