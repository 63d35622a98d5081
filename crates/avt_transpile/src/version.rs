//! The `/// @ <version>` comment that tells a host which grammar a script
//! is written for.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::slice::SliceReplacement;

/// Grammar version the output is written for.
pub const TARGET_VERSION: &str = "1.1.0";

static VERSION_NOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\s*///[ \t]*@[ \t]*([A-Z0-9_.-]+)").expect("version notation pattern is valid")
});

/// The edit that makes `script` declare [`TARGET_VERSION`]: the version in
/// an existing leading notation is replaced, otherwise a notation line is
/// prepended.
pub fn version_replacement(script: &str) -> SliceReplacement {
    match VERSION_NOTATION.captures(script).and_then(|caps| caps.get(1)) {
        Some(version) => {
            debug!(from = version.as_str(), to = TARGET_VERSION, "updating version notation");
            SliceReplacement::new(version.start(), version.end(), TARGET_VERSION)
        }
        None => {
            debug!(to = TARGET_VERSION, "adding version notation");
            SliceReplacement::insertion(0, format!("/// @ {TARGET_VERSION}\n"))
        }
    }
}
