//! Deciding whether a file is referenced from LaTeX text.
//!
//! A reference is a brace group holding the file's path, such as
//! `\includegraphics{figs/plot.pdf}` or `\input{ sections/intro }`. Whitespace
//! and `%` are tolerated just inside the braces, as is a leading `./`.
//! Matching ignores case, since figures often differ from their references
//! only in case.
//!
//! In loose mode the extension may be omitted and leading directories may be
//! dropped, as long as what remains is a suffix of the real path: for
//! `a/b/c.png`, `{c}`, `{b/c.png}` and `{a/b/c}` match while `{a/c.png}`
//! does not.

use regex::{Regex, RegexBuilder};

use crate::files::path::{split_extension, PathStyle};

/// How strictly a filename must appear to count as referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The exact relative path, including its extension.
    Strict,
    /// Extension and any leading directories are optional.
    Loose,
}

impl MatchMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            MatchMode::Strict
        } else {
            MatchMode::Loose
        }
    }
}

/// A compiled reference pattern for one filename.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    regex: Regex,
}

impl ReferencePattern {
    pub fn new(filename: &str, mode: MatchMode, style: PathStyle) -> Result<Self, regex::Error> {
        let separator = regex::escape(&style.separator.to_string());
        let path = match mode {
            MatchMode::Strict => regex::escape(filename),
            MatchMode::Loose => loose_path_pattern(filename, style, &separator),
        };
        let pattern = format!(r"\{{[\s%]*(?:\.{separator})?{path}[\s%]*\}}");

        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// Byte range of the first reference in `corpus`.
    pub fn find(&self, corpus: &str) -> Option<std::ops::Range<usize>> {
        self.regex.find(corpus).map(|m| m.range())
    }

    pub fn is_match(&self, corpus: &str) -> bool {
        self.regex.is_match(corpus)
    }
}

/// Builds `(((a/)?b/)?c/)?name(\.ext)?` for `a/b/c/name.ext`.
fn loose_path_pattern(filename: &str, style: PathStyle, separator: &str) -> String {
    let (directories, name) = style.split(filename);
    let (stem, extension) = split_extension(name);

    let mut prefix = String::new();
    for directory in directories {
        prefix = format!("(?:{prefix}{}{separator})?", regex::escape(directory));
    }

    let extension = if extension.is_empty() {
        String::new()
    } else {
        format!("(?:{})?", regex::escape(extension))
    };
    format!("{prefix}{}{extension}", regex::escape(stem))
}

/// Whether `filename` is referenced anywhere in `corpus`.
pub fn is_referenced(filename: &str, corpus: &str, mode: MatchMode, style: PathStyle) -> bool {
    ReferencePattern::new(filename, mode, style).map_or(false, |p| p.is_match(corpus))
}

/// Byte range of the first reference to `filename` in `corpus`.
pub fn search_reference(
    filename: &str,
    corpus: &str,
    mode: MatchMode,
    style: PathStyle,
) -> Option<std::ops::Range<usize>> {
    ReferencePattern::new(filename, mode, style)
        .ok()
        .and_then(|p| p.find(corpus))
}

/// Every filename referenced from `corpus`, in input order.
///
/// Several files may match the same reference in loose mode; all of them are
/// returned.
pub fn keep_only_referenced(
    filenames: &[String],
    corpus: &str,
    mode: MatchMode,
    style: PathStyle,
) -> Vec<String> {
    filenames
        .iter()
        .filter(|f| is_referenced(f, corpus, mode, style))
        .cloned()
        .collect()
}
