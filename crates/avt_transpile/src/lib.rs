//! Rewrites legacy (0.19) AiScript into the 1.x grammar while keeping the
//! script's own layout.
//!
//! The rewrite never pretty-prints. Each node's new text is assembled from
//! small edits to its original slice of the script (a comma here, a joined
//! line there), so comments, indentation and spelling survive wherever the
//! new grammar allows them.
//!
//! - `script.rs`: text queries: trivia skipping, separators, literal extents
//! - `location.rs`: the real extent of a node, parentheses included
//! - `builder.rs`: per-node edit collection
//! - `rewrite/`: one rule per node kind

pub mod ancestors;
pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod keywords;
mod location;
mod rewrite;
pub mod script;
pub mod slice;
mod transpile;
pub mod version;

pub use config::{TranspilerConfig, CONFIG_STORAGE_KEY};
pub use error::{Result, TranspileError};
pub use rewrite::Transpiler;
pub use transpile::{transpile, transpile_nodes};
pub use version::TARGET_VERSION;
