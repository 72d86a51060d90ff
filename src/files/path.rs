//! Separator-aware helpers for the relative paths the cleaner works with.
//!
//! All paths handled by the engine are plain strings relative to the input
//! folder. Which character separates their components is an explicit
//! [`PathStyle`] passed down by the caller, never a process-wide setting.

use std::path::{Component, Path};

/// The separator used for relative paths and in-document references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStyle {
    pub separator: char,
}

impl PathStyle {
    /// Forward slashes, as LaTeX expects on every platform.
    pub const POSIX: PathStyle = PathStyle { separator: '/' };

    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Joins path components with this style's separator.
    pub fn join<'a>(&self, parts: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for part in parts {
            if !out.is_empty() {
                out.push(self.separator);
            }
            out.push_str(part);
        }
        out
    }

    /// Renders a relative filesystem path with this style's separator.
    pub fn render(&self, path: &Path) -> String {
        let parts: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::CurDir => Some(".".to_string()),
                _ => None,
            })
            .collect();
        self.join(parts.iter().map(String::as_str))
    }

    /// Splits `path` into its directory components and its file name.
    pub fn split<'a>(&self, path: &'a str) -> (Vec<&'a str>, &'a str) {
        let mut parts: Vec<&str> = path.split(self.separator).collect();
        let name = parts.pop().unwrap_or("");
        parts.retain(|p| !p.is_empty());
        (parts, name)
    }

    /// The last component of `path`.
    pub fn file_name<'a>(&self, path: &'a str) -> &'a str {
        self.split(path).1
    }

    /// `path` with the extension of its last component removed.
    pub fn without_extension<'a>(&self, path: &'a str) -> &'a str {
        let (_, extension) = split_extension(self.file_name(path));
        &path[..path.len() - extension.len()]
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle::POSIX
    }
}

/// Splits a file name into stem and extension (including the dot).
///
/// Leading dots do not start an extension: `.gitignore` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(dot) => name.split_at(leading_dots + dot),
        None => (name, ""),
    }
}
