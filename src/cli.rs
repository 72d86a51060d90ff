//! Command-line interface definition.
//!
//! Lives in the library so the man page generator can render it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_SVG_INKSCAPE;

/// Clean a LaTeX project before submitting it to arXiv.
///
/// Comments, dead conditionals, configured commands and environments are
/// stripped from every TeX file. Only referenced figures and sources are
/// copied to the output folder.
#[derive(Debug, Parser)]
#[command(name = "texclean", version, about, long_about)]
pub struct Cli {
    /// Folder holding the LaTeX project
    pub input_folder: PathBuf,

    /// Where to write the cleaned project [default: <INPUT_FOLDER>_arXiv]
    #[arg(long, alias = "output_folder", value_name = "DIR")]
    pub output_folder: Option<PathBuf>,

    /// Ship .bib files instead of dropping them
    #[arg(long, alias = "keep_bib")]
    pub keep_bib: bool,

    /// Commands to remove together with their argument (e.g. todo)
    #[arg(long, alias = "commands_to_delete", value_name = "NAME", num_args = 1..)]
    pub commands_to_delete: Vec<String>,

    /// Commands to remove while keeping their argument (e.g. red)
    #[arg(long, alias = "commands_only_to_delete", value_name = "NAME", num_args = 1..)]
    pub commands_only_to_delete: Vec<String>,

    /// Environments to remove entirely
    #[arg(long, alias = "environments_to_delete", value_name = "NAME", num_args = 1..)]
    pub environments_to_delete: Vec<String>,

    /// Additional \if commands that are not closed by \fi
    #[arg(long, alias = "if_exceptions", value_name = "NAME", num_args = 1..)]
    pub if_exceptions: Vec<String>,

    /// Folder of externalised TikZ PDFs replacing tikzpicture blocks
    #[arg(long, alias = "use_external_tikz", value_name = "DIR")]
    pub use_external_tikz: Option<String>,

    /// Folder of Inkscape exports replacing \includesvg
    #[arg(
        long,
        alias = "svg_inkscape",
        value_name = "DIR",
        num_args = 0..=1,
        default_missing_value = DEFAULT_SVG_INKSCAPE
    )]
    pub svg_inkscape: Option<String>,

    /// Recompress referenced PDF figures with Ghostscript
    #[arg(long, alias = "compress_pdf")]
    pub compress_pdf: bool,

    /// Resolution in DPI for compressed PDFs [default: 500]
    #[arg(long, alias = "pdf_im_resolution", value_name = "DPI")]
    pub pdf_im_resolution: Option<u32>,

    /// Per-figure resolutions as JSON, e.g. '{"figs/a.pdf": 300}'
    #[arg(
        long,
        alias = "images_allowlist",
        alias = "images_whitelist",
        value_name = "JSON",
        value_parser = parse_allowlist
    )]
    pub images_allowlist: Option<BTreeMap<String, u32>>,

    /// Read settings from a YAML, TOML or JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log each step
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_allowlist(value: &str) -> Result<BTreeMap<String, u32>, String> {
    serde_json::from_str(value).map_err(|e| format!("expected a JSON object of DPI values: {e}"))
}
