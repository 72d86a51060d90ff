//! Finding which files the LaTeX sources actually use.
//!
//! - [`resolver`] - does a corpus reference a given file?
//! - [`closure`] - which TeX files are reachable from the roots?

pub mod closure;
pub mod resolver;

pub use closure::transitive_closure;
pub use resolver::{
    is_referenced, keep_only_referenced, search_reference, MatchMode, ReferencePattern,
};
