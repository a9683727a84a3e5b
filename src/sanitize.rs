//! Header and cell value cleanup for exported keys/values

use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;

/// Escaped vertical-tab sequence Excel stores for in-cell line breaks
pub const LINE_BREAK_MARKER: &str = "_x000B_";

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Turn a raw header into a lower-case, underscore-delimited key.
///
/// `#` becomes `num`, anything other than ASCII letters, digits, underscores
/// and whitespace is dropped, whitespace runs become `_`, and trailing
/// underscores are stripped. The result only contains `[a-z0-9_]` and
/// `clean_key(clean_key(x)) == clean_key(x)`.
///
/// ```
/// use xlsx2js::sanitize::clean_key;
///
/// assert_eq!(clean_key("Q#1 Score "), "qnum1_score");
/// ```
pub fn clean_key(raw: impl Display) -> String {
    let key = raw.to_string().replace('#', "num");
    let key = disallowed_chars().replace_all(&key, "");
    let key = whitespace_runs().replace_all(&key, "_");
    key.trim_end_matches('_').to_lowercase()
}

/// Stringify a cell value and restore embedded line breaks.
///
/// Blank cells become `""`.
pub fn clean_value(raw: impl Display) -> String {
    raw.to_string().replace(LINE_BREAK_MARKER, "\n")
}
