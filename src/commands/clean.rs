//! The clean command handler

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};
use tracing::warn;

use texclean::cli::Cli;
use texclean::Config;

/// Load the config file if any and apply the command line on top.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    Ok(config.merge_cli(cli))
}

/// Run the cleaner and report what it wrote.
pub fn handle(config: &Config) -> Result<()> {
    let summary = texclean::run(config)?;

    if summary.diagnostics > 0 {
        warn!(
            "{} file(s) were left unsimplified (malformed conditionals or not UTF-8)",
            summary.diagnostics
        );
    }
    println!(
        "Wrote {} TeX files and copied {} files ({}) to {}",
        summary.tex_files_written,
        summary.files_copied,
        format_size(summary.bytes_written, DECIMAL),
        summary.output_folder.display()
    );
    Ok(())
}
