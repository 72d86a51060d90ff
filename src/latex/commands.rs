//! Removal of single-argument commands such as `\todo{...}`.

use super::delimiters::{matching_brace, matching_bracket};
use super::spans::{apply_spans, DeletionSpan};

/// One `\name[..]{..}[..]` invocation found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    start: usize,
    end: usize,
    /// Byte range of the text between the argument braces.
    inner: std::ops::Range<usize>,
}

/// Removes every invocation of `\name{...}` from `text`.
///
/// With `keep_text` the invocation is replaced by its argument, and the
/// search repeats until nothing matches so `\name{a \name{b}}` unwraps fully.
/// Without it the invocation disappears; if nothing but whitespace follows
/// it on its line, a `%` takes its place so the line break is preserved.
///
/// Invocations whose braces never balance are left untouched.
pub fn strip_command(text: &str, name: &str, keep_text: bool) -> String {
    let mut text = text.to_string();
    loop {
        let invocations = find_invocations(&text, name);
        if invocations.is_empty() {
            return text;
        }

        let spans = invocations
            .into_iter()
            .map(|inv| {
                let replacement = if keep_text {
                    text[inv.inner.clone()].to_string()
                } else if rest_of_line_is_blank(&text, inv.end) {
                    "%".to_string()
                } else {
                    String::new()
                };
                DeletionSpan::replace(inv.start..inv.end, replacement)
            })
            .collect();
        text = apply_spans(&text, spans);

        if !keep_text {
            return text;
        }
    }
}

/// Finds non-overlapping invocations, scanning left to right.
fn find_invocations(text: &str, name: &str) -> Vec<Invocation> {
    let token = format!("\\{name}");
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(offset) = text[from..].find(&token) {
        let start = from + offset;
        let after_name = start + token.len();
        match parse_invocation(text, start, after_name) {
            Some(inv) => {
                from = inv.end;
                found.push(inv);
            }
            None => from = after_name,
        }
    }
    found
}

fn parse_invocation(text: &str, start: usize, after_name: usize) -> Option<Invocation> {
    // `\todo` must not match `\todos` or `\todo2`.
    if text[after_name..]
        .chars()
        .next()
        .is_some_and(is_identifier_char)
    {
        return None;
    }

    let open = skip_bracket_groups(text, after_name)?;
    if text.as_bytes().get(open) != Some(&b'{') {
        return None;
    }
    let close = matching_brace(text, open)?;
    let end = skip_bracket_groups(text, close + 1).unwrap_or(close + 1);

    Some(Invocation {
        start,
        end,
        inner: open + 1..close,
    })
}

/// Skips consecutive `[...]` groups starting at `pos`.
///
/// Returns `None` if a group is opened but never closed.
fn skip_bracket_groups(text: &str, mut pos: usize) -> Option<usize> {
    while text.as_bytes().get(pos) == Some(&b'[') {
        pos = matching_bracket(text, pos)? + 1;
    }
    Some(pos)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '@'
}

/// True when only whitespace sits between `pos` and the next newline.
///
/// Text with no newline after `pos` never counts as blank.
fn rest_of_line_is_blank(text: &str, pos: usize) -> bool {
    text[pos..]
        .find('\n')
        .is_some_and(|newline| text[pos..pos + newline].trim().is_empty())
}
