//! Integration tests for texclean.

mod cli_test;
mod helpers;
mod pipeline_test;
