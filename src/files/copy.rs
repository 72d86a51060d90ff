//! Copying files into the output tree.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Ghostscript executable used to recompress PDF figures.
pub const GHOSTSCRIPT: &str = "gs";

/// Ghostscript gets this long per figure before falling back to a copy.
pub const COMPRESSION_TIMEOUT: Duration = Duration::from_secs(10);

/// How PDF figures are recompressed, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfCompression {
    /// Downsampling resolution in DPI.
    pub resolution: u32,
    pub timeout: Duration,
}

impl PdfCompression {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            timeout: COMPRESSION_TIMEOUT,
        }
    }

    fn arguments(&self, input: &Path, output: &Path) -> Vec<String> {
        let resolution = self.resolution;
        vec![
            "-sDEVICE=pdfwrite".to_string(),
            "-dCompatibilityLevel=1.4".to_string(),
            "-dNOPAUSE".to_string(),
            "-dQUIET".to_string(),
            "-dBATCH".to_string(),
            "-dDownsampleColorImages=true".to_string(),
            format!("-dColorImageResolution={resolution}"),
            "-dColorImageDownsampleThreshold=1.0".to_string(),
            "-dAutoRotatePages=/None".to_string(),
            format!("-sOutputFile={}", output.display()),
            input.display().to_string(),
        ]
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Copies `relative` from `input` to the same place under `output`.
///
/// Returns the number of bytes written.
pub fn copy_file(input: &Path, output: &Path, relative: &str) -> Result<u64> {
    let from = input.join(relative);
    let to = output.join(relative);
    ensure_parent(&to)?;
    fs::copy(&from, &to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))
}

/// Copies a figure, recompressing PDFs with Ghostscript when asked to.
///
/// A missing Ghostscript, a failed run or a timeout all fall back to a plain
/// copy, so the figure is always shipped.
pub fn copy_figure(
    input: &Path,
    output: &Path,
    relative: &str,
    compression: Option<PdfCompression>,
) -> Result<u64> {
    let is_pdf = Path::new(relative)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if let (true, Some(compression)) = (is_pdf, compression) {
        let from = input.join(relative);
        let to = output.join(relative);
        ensure_parent(&to)?;

        match compress_pdf(&from, &to, compression) {
            Ok(()) => {
                debug!("Compressed {} at {} dpi", relative, compression.resolution);
                return fs::metadata(&to)
                    .map(|m| m.len())
                    .with_context(|| format!("Failed to stat {}", to.display()));
            }
            Err(err) => warn!("PDF compression failed for {}: {:#}", relative, err),
        }
    }

    copy_file(input, output, relative)
}

fn compress_pdf(input: &Path, output: &Path, compression: PdfCompression) -> Result<()> {
    let mut child = Command::new(GHOSTSCRIPT)
        .args(compression.arguments(input, output))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to start {GHOSTSCRIPT}"))?;

    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait()? {
            Some(status) if status.success() && output.is_file() => return Ok(()),
            Some(status) => anyhow::bail!("{GHOSTSCRIPT} exited with {status}"),
            None if start.elapsed() >= compression.timeout => {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!("{GHOSTSCRIPT} timed out after {:?}", compression.timeout);
            }
            None => thread::sleep(poll_interval),
        }
    }
}
