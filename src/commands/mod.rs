//! Command handlers for the binary.

pub mod clean;
