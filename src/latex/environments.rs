//! Removal of `\begin{name} ... \end{name}` blocks.

use regex::Regex;

use super::spans::{apply_spans, DeletionSpan};

/// Environment always removed before user-specified ones.
pub const COMMENT_ENVIRONMENT: &str = "comment";

/// Deletes every `\begin{name}` through the next `\end{name}`.
///
/// Matching is shortest-first and does not balance nested environments of
/// the same name.
pub fn strip_environment(text: &str, name: &str) -> String {
    let escaped = regex::escape(name);
    let pattern = format!(r"\\begin\{{{escaped}\}}[\s\S]*?\\end\{{{escaped}\}}");
    // The name is escaped, so the pattern is always valid.
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };

    let spans = re
        .find_iter(text)
        .map(|m| DeletionSpan::delete(m.range()))
        .collect();
    apply_spans(text, spans)
}
