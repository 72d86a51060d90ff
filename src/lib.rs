//! texclean - prepare a LaTeX project for arXiv submission.
//!
//! The library is split into a pure text engine and the file plumbing
//! around it:
//!
//! - [`latex`] - comment, command, environment and conditional stripping
//! - [`references`] - which files the sources actually use
//! - [`files`] - listing, classifying and copying project files
//! - [`config`] and [`cli`] - run settings
//! - [`cleaner`] - the end-to-end run

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod files;
pub mod latex;
pub mod references;

pub use cleaner::{run, RunSummary};
pub use config::{Config, ConfigError};
