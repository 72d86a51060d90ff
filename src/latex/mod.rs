//! LaTeX source transformations.
//!
//! Everything in this module is a pure text transform: no file access, no
//! shared state between files. The orchestrator reads sources, runs them
//! through a [`SourceCleaner`] and writes the result.
//!
//! # Pipeline
//!
//! Per file, in order:
//! 1. [`StripComments`] - line comments
//! 2. [`RemoveEnvironment`] for `comment`
//! 3. [`SimplifyConditionals`] - `\iffalse`, `\iftrue`, ...
//! 4. [`RemoveEnvironment`] for each configured environment
//! 5. [`RemoveCommand`] keeping text, then deleting text, per configured name
//!
//! # Module Structure
//!
//! - [`delimiters`] - balanced brace matching
//! - [`spans`] - right-to-left span application shared by the strippers
//! - [`comments`], [`commands`], [`environments`], [`conditionals`] - the strippers
//! - [`figures`], [`patterns`] - post-cleaning rewrites

pub mod commands;
pub mod comments;
pub mod conditionals;
pub mod delimiters;
pub mod environments;
pub mod figures;
pub mod patterns;
mod pipeline;
pub mod spans;

pub use commands::strip_command;
pub use comments::{strip_comments, strip_line_comment};
pub use conditionals::{
    simplify_conditionals, ConditionalError, ConditionalKind, ConditionalTree, MalformedKind,
};
pub use environments::strip_environment;
pub use figures::{replace_includesvg, replace_tikzpictures};
pub use patterns::{find_and_replace_patterns, PatternError, PatternInsertion};
pub use pipeline::{
    CleanOptions, RemoveCommand, RemoveEnvironment, SimplifyConditionals, SourceCleaner,
    StripComments,
};

/// A TeX source file being cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the input folder.
    pub path: String,
    pub body: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }
}

/// A single in-place rewrite of a source file.
pub trait Transform {
    fn transform(&mut self, source: &mut SourceFile);
}
