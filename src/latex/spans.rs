//! Span-based text rewriting shared by the stripping transforms.
//!
//! Every transform first collects the ranges it wants to replace against an
//! immutable snapshot of the text, then applies them in one right-to-left
//! pass. Rewriting from the end keeps every not-yet-applied offset valid.

use std::ops::Range;

/// A half-open byte range plus the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionSpan {
    pub range: Range<usize>,
    pub replacement: String,
}

impl DeletionSpan {
    /// A span whose content is removed.
    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    /// A span whose content is replaced by `replacement`.
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

/// Applies non-overlapping spans to `text`.
///
/// Spans may be given in any order.
pub fn apply_spans(text: &str, mut spans: Vec<DeletionSpan>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    spans.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    debug_assert!(
        spans.windows(2).all(|w| w[1].range.end <= w[0].range.start),
        "spans must not overlap"
    );

    let mut result = text.to_string();
    for span in spans {
        result.replace_range(span.range, &span.replacement);
    }
    result
}

/// Extends `end` over one following whitespace character, if any.
///
/// Used after deleting a token that sat on its own line so the line break it
/// leaves behind goes with it. A `\r\n` pair counts as one character.
pub fn absorb_trailing_whitespace(text: &str, end: usize) -> usize {
    if text[end..].starts_with("\r\n") {
        return end + 2;
    }
    match text[end..].chars().next() {
        Some(c) if c.is_whitespace() => end + c.len_utf8(),
        _ => end,
    }
}
