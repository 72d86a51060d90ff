//! Balanced delimiter matching.
//!
//! LaTeX arguments nest arbitrarily (`\cmd{a{b}c}`), so finding the end of an
//! argument means counting open and close delimiters rather than searching for
//! the next closing character.

/// Returns the byte index of the `}` closing the `{` at `open`.
///
/// Returns `None` when `open` does not point at `{` or when the text ends
/// before the brace is balanced.
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    matching_delimiter(text, open, b'{', b'}')
}

/// Returns the byte index of the `]` closing the `[` at `open`.
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    matching_delimiter(text, open, b'[', b']')
}

fn matching_delimiter(text: &str, open: usize, opener: u8, closer: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&opener) {
        return None;
    }

    // Both delimiters are ASCII, so byte scanning never lands inside a
    // multi-byte character.
    let mut depth = 0usize;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        if byte == opener {
            depth += 1;
        } else if byte == closer {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}
