// Decoding of the escape conventions used inside anime3rb pages.
//
// The site escapes slashes JSON-style (`\/`) and ampersands as HTML entities
// (`&amp;`), sometimes both in the same string, sometimes escaped more than
// once. Nothing else is touched.

use std::sync::LazyLock;

use regex::Regex;

// Any run of backslashes in front of a slash
static ESCAPED_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+/").expect("escaped slash regex is valid"));

// `&amp;`, `&amp;amp;`, ...
static ESCAPED_AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:amp;)+").expect("escaped ampersand regex is valid"));

/// Replaces every `\/` with `/` and every `&amp;` with `&`.
///
/// Nested forms like `\\\/` or `&amp;amp;` collapse in the same pass, so
/// calling it again on its own output is a no-op.
pub fn decode(text: &str) -> String {
    let slashes = ESCAPED_SLASH.replace_all(text, "/");
    ESCAPED_AMPERSAND.replace_all(&slashes, "&").into_owned()
}
