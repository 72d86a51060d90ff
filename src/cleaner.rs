//! End-to-end cleaning of a project folder.
//!
//! [`run`] reads the input tree, cleans every TeX source, works out which
//! sources and figures are actually used, and writes the result to a fresh
//! output folder.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use humansize::{format_size, DECIMAL};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::files::{
    copy_figure, copy_file, list_all_files, list_root_files, FileSplit, PathStyle,
    PdfCompression, SplitRules,
};
use crate::latex::comments::{truncate_after_marker, END_DOCUMENT};
use crate::latex::{
    find_and_replace_patterns, replace_includesvg, replace_tikzpictures, SourceCleaner,
    SourceFile,
};
use crate::references::{keep_only_referenced, transitive_closure, MatchMode};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output_folder: PathBuf,
    /// Cleaned TeX sources written.
    pub tex_files_written: usize,
    /// Other files copied, figures included.
    pub files_copied: usize,
    pub bytes_written: u64,
    /// Files whose conditionals could not be simplified, plus TeX files
    /// that were not valid UTF-8 and were copied unchanged.
    pub diagnostics: usize,
}

impl RunSummary {
    fn record(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_written += bytes;
    }
}

/// Cleans `config.input_folder` into [`Config::output_folder`].
///
/// The output folder is erased first if it already exists. It may neither
/// contain the input folder nor sit inside it.
pub fn run(config: &Config) -> Result<RunSummary> {
    let input = config.input_folder.as_path();
    if !input.is_dir() {
        bail!("Input folder {} is not a directory", input.display());
    }

    let output = config.output_folder();
    prepare_output_folder(input, &output)?;

    let style = PathStyle::POSIX;
    info!("Collecting file structure");
    let split = split_files(config, input, style)?;
    debug!(
        "{} files, {} TeX sources, {} figures",
        split.all.len(),
        split.tex_in_root.len() + split.tex_not_in_root.len(),
        split.figures.len()
    );

    info!("Reading all tex files");
    let (mut sources, undecodable) = read_sources(input, &split.tex_files())?;

    let cleaner = SourceCleaner::new(config.clean_options());
    let diagnostics: usize = sources
        .par_iter_mut()
        .map(|source| {
            info!("Removing comments in file {}", source.path);
            usize::from(cleaner.clean(source).is_some())
        })
        .sum();

    for source in &mut sources {
        if config.use_external_tikz.is_some() {
            info!("Replacing Tikz Pictures in file {}", source.path);
            source.body =
                replace_tikzpictures(&source.body, &split.external_tikz_figures, style.separator);
        }
        if config.svg_inkscape.is_some() {
            info!("Replacing svg includes in file {}", source.path);
            source.body =
                replace_includesvg(&source.body, &split.svg_inkscape_files, style.separator);
        }
    }

    let bodies: HashMap<String, String> = sources
        .into_iter()
        .map(|source| (source.path, source.body))
        .collect();
    let used = transitive_closure(&bodies, &split.tex_in_root, style);

    let mut summary = RunSummary {
        output_folder: output.clone(),
        diagnostics: diagnostics + undecodable.len(),
        ..RunSummary::default()
    };

    for path in &undecodable {
        warn!("{} is not valid UTF-8, copying it unchanged", path);
        summary.record(copy_file(input, &output, path)?);
    }

    let mut written = Vec::with_capacity(used.len());
    for path in &used {
        let Some(body) = bodies.get(path) else {
            continue;
        };
        info!("Replacing patterns in file {}", path);
        let body = find_and_replace_patterns(body, &config.patterns_and_insertions)
            .with_context(|| format!("Failed to apply patterns to {path}"))?;

        let target = output.join(path);
        info!("Writing modified contents to {}", target.display());
        write_source(&target, &body)?;
        summary.tex_files_written += 1;
        summary.bytes_written += body.len() as u64;
        written.push(body);
    }
    let corpus = written.join("\n");

    for path in keep_only_referenced(&split.non_tex_not_in_root, &corpus, MatchMode::Strict, style)
    {
        debug!("Copying referenced file {}", path);
        summary.record(copy_file(input, &output, &path)?);
    }
    for path in &split.non_tex_in_root {
        info!("Copying non-tex file {}", path);
        summary.record(copy_file(input, &output, path)?);
    }
    for path in keep_only_referenced(&split.figures, &corpus, MatchMode::Loose, style) {
        let compression = config
            .compress_pdf
            .then(|| PdfCompression::new(config.pdf_resolution_for(&path)));
        debug!("Copying figure {}", path);
        summary.record(copy_figure(input, &output, &path, compression)?);
    }

    info!(
        "Outputs written to {} ({} TeX files, {} other files, {})",
        output.display(),
        summary.tex_files_written,
        summary.files_copied,
        format_size(summary.bytes_written, DECIMAL)
    );
    Ok(summary)
}

fn prepare_output_folder(input: &Path, output: &Path) -> Result<()> {
    let input_path = resolve(input)?;
    let output_path = resolve(output)?;
    if input_path.starts_with(&output_path) {
        bail!(
            "Refusing to erase output folder {}: it contains the input folder",
            output.display()
        );
    }
    if output_path.starts_with(&input_path) {
        bail!(
            "Output folder {} is inside the input folder {}",
            output.display(),
            input.display()
        );
    }

    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to erase {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))
}

/// Absolute form of `path` with symlinks resolved as far as it exists.
fn resolve(path: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Ok(resolved);
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the current directory")?
            .join(path)
    };

    let mut missing = Vec::new();
    let mut cursor = absolute.as_path();
    while let (Some(parent), Some(name)) = (cursor.parent(), cursor.file_name()) {
        missing.push(name.to_os_string());
        if let Ok(mut resolved) = parent.canonicalize() {
            resolved.extend(missing.iter().rev());
            return Ok(resolved);
        }
        cursor = parent;
    }
    Ok(absolute)
}

fn split_files(config: &Config, input: &Path, style: PathStyle) -> Result<FileSplit> {
    let rules = SplitRules::new(
        config.keep_bib,
        config.use_external_tikz.as_deref(),
        config.svg_inkscape.as_deref(),
    )?;
    let all = list_all_files(input, style)?;
    let in_root = list_root_files(input)?;
    Ok(FileSplit::new(all, in_root, &rules))
}

/// Reads TeX sources, dropping everything after `\end{document}`.
///
/// Files that are not valid UTF-8 are not decoded; their paths are returned
/// separately.
fn read_sources(input: &Path, paths: &[String]) -> Result<(Vec<SourceFile>, Vec<String>)> {
    let mut sources = Vec::with_capacity(paths.len());
    let mut undecodable = Vec::new();

    for path in paths {
        let full = input.join(path);
        let bytes =
            fs::read(&full).with_context(|| format!("Failed to read {}", full.display()))?;
        let Ok(text) = String::from_utf8(bytes) else {
            undecodable.push(path.clone());
            continue;
        };
        let lines = text.split_inclusive('\n').map(str::to_string).collect();
        let body = truncate_after_marker(lines, END_DOCUMENT).concat();
        sources.push(SourceFile::new(path.as_str(), body));
    }

    Ok((sources, undecodable))
}

fn write_source(target: &Path, body: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(target, body).with_context(|| format!("Failed to write {}", target.display()))
}
