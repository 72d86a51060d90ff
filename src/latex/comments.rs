//! Line comment removal.
//!
//! Comments are stripped one physical line at a time. The `%` that starts an
//! inline comment is kept so the line does not glue onto the next one when
//! TeX reads it.

use super::delimiters::matching_brace;

/// Lines carrying this marker are left untouched.
pub const AUTO_IGNORE_MARKER: &str = "auto-ignore";

/// Commands whose brace argument may contain a literal `%`.
const PROTECTED_COMMANDS: &[&str] = &["url"];

/// Marker after which the rest of a TeX file is dropped.
pub const END_DOCUMENT: &str = r"\end{document}";

/// Removes the comment from a single line.
///
/// - Lines containing [`AUTO_IGNORE_MARKER`] are returned verbatim.
/// - Lines that start (after indentation) with `%` become empty.
/// - Otherwise the line is cut right after the first unescaped `%` outside a
///   protected argument such as `\url{...}`.
///
/// Non-empty results always end with a newline.
pub fn strip_line_comment(line: &str) -> String {
    if line.contains(AUTO_IGNORE_MARKER) {
        return line.to_string();
    }
    if line.trim_start_matches([' ', '\t']).starts_with('%') {
        return String::new();
    }
    if line.is_empty() {
        return String::new();
    }

    match find_comment_start(line) {
        Some(index) => format!("{}\n", &line[..=index]),
        None if line.ends_with('\n') => line.to_string(),
        None => format!("{line}\n"),
    }
}

/// Strips comments from every line of `text`.
pub fn strip_comments(text: &str) -> String {
    text.split_inclusive('\n').map(strip_line_comment).collect()
}

/// Byte index of the first `%` that opens a comment.
fn find_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i == 0 || bytes[i - 1] != b'\\' => return Some(i),
            b'\\' => {
                if let Some(close) = protected_argument_end(line, i) {
                    i = close + 1;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// If a protected command starts at `backslash`, returns the index of the
/// brace closing its argument.
fn protected_argument_end(line: &str, backslash: usize) -> Option<usize> {
    let rest = &line[backslash + 1..];
    PROTECTED_COMMANDS.iter().find_map(|name| {
        if rest.starts_with(name) && rest[name.len()..].starts_with('{') {
            matching_brace(line, backslash + 1 + name.len())
        } else {
            None
        }
    })
}

/// Drops every line after the one holding `marker`.
///
/// A line only counts when the marker is not commented out on it.
pub fn truncate_after_marker(lines: Vec<String>, marker: &str) -> Vec<String> {
    let cut = lines.iter().position(|line| match line.find(marker) {
        Some(at) => line.find('%').map_or(true, |percent| percent > at),
        None => false,
    });

    match cut {
        Some(index) => {
            let mut lines = lines;
            lines.truncate(index + 1);
            lines
        }
        None => lines,
    }
}
