//! Whole-script entry points.

use avt_ast::Node;
use avt_parser::parse_script;
use tracing::debug;

use crate::ancestors::Ancestors;
use crate::config::TranspilerConfig;
use crate::error::Result;
use crate::rewrite::Transpiler;
use crate::slice::{apply_replacements, SliceReplacement};
use crate::version::version_replacement;

/// Parse a legacy script and rewrite it for the 1.x grammar.
pub fn transpile(script: &str, config: &TranspilerConfig) -> Result<String> {
    let nodes = parse_script(script)?;
    transpile_nodes(script, &nodes, config)
}

/// Rewrite `script` given its already parsed top-level statements.
///
/// Text between statements, comments included, is left as it is.
pub fn transpile_nodes(script: &str, nodes: &[Node], config: &TranspilerConfig) -> Result<String> {
    debug!(len = script.len(), statements = nodes.len(), ?config, "transpiling script");
    let cx = Transpiler::new(script)?;

    let mut replacements = Vec::with_capacity(nodes.len() + 1);
    if config.set_version_notation {
        replacements.push(version_replacement(script));
    }
    for node in nodes {
        let span = cx.actual_location(node, true)?;
        let content = cx.rewrite_in_parens(node, Ancestors::root(), None)?;
        replacements.push(SliceReplacement::new(span.lo, span.hi, content));
    }
    apply_replacements(script, &replacements)
}
