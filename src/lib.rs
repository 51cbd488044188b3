//! Crypto Inventory Core
//!
//! Detects use of cryptographic primitives by matching call-site shapes
//! against declarative patterns, then runs raw matches through a
//! translate→reorganize→enrich pipeline into a canonical asset forest.
//! Language front-ends lower their ASTs into the [`ast`] model and inject
//! mapping tables; this crate never parses source text.

pub mod asset;
pub mod ast;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod reorganize;
pub mod session;
pub mod translate;

pub use asset::{AssetKind, AssetNode};
pub use engine::{ActionKind, ContextKind, Finding, MatchEngine, MatchNode, MatchStats, Value};
pub use error::{Error, PatternBuildError, Result};
pub use pattern::{ParameterSpec, Pattern, PatternBuilder};
pub use session::{InventorySession, ScanContext};
pub use translate::{MapperTable, Translator};
