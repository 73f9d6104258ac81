//! Model reply cleanup
//!
//! Models often wrap generated HCL in a Markdown code fence even when told
//! not to. Only the outermost fence lines are removed; fences inside the
//! payload stay as they are.

use regex::Regex;
use std::sync::LazyLock;

/// Opening fence with an optional language hint, as the whole first line
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A```(?:hcl|terraform|tf)?[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Bare closing fence, as the whole last line
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\A|\r?\n)```[ \t]*\z").unwrap());

/// Strip the enclosing code fence from a model reply
///
/// One layer per call: a reply wrapped in two nested outer fences comes
/// back with the inner pair intact, and a second call removes it.
pub fn sanitize(text: &str) -> String {
    let text = text.trim();
    let text = match OPENING_FENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let text = text.trim_end();
    let text = match CLOSING_FENCE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    text.trim().to_string()
}
