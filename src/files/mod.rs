//! File listing, classification and copying for a LaTeX project tree.
//!
//! Paths are handled as strings relative to the input folder, rendered with
//! an explicit [`PathStyle`]. The engine only ever sees those strings; the
//! helpers here translate them back to filesystem paths when reading or
//! writing.
//!
//! # Module Structure
//!
//! - [`path`] - separator policy and extension helpers
//! - [`walk`] - recursive listing
//! - [`split`] - sorting files into the buckets the cleaner acts on
//! - [`copy`] - copying, with optional PDF compression

pub mod copy;
pub mod path;
pub mod split;
pub mod walk;

pub use copy::{copy_figure, copy_file, PdfCompression};
pub use path::{split_extension, PathStyle};
pub use split::{keep_pattern, remove_pattern, FileSplit, PatternSet, SplitRules};
pub use walk::{list_all_files, list_root_files};

/// Errors raised while listing or classifying files.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
