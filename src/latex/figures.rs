//! Swapping figure sources for their pre-rendered outputs.
//!
//! Externalised TikZ pictures and Inkscape-exported SVGs already exist as
//! files next to the sources; shipping those avoids needing the generating
//! packages at compile time.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TIKZ_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\tikzsetnextfilename\{[\s\S]*?\\end\{tikzpicture\}")
        .expect("valid tikz block regex")
});

static TIKZ_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\tikzsetnextfilename\{(.*?)\}").expect("valid tikz name regex")
});

static INCLUDESVG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\includesvg(\[.*?\])?\{(.*?)\}").expect("valid includesvg regex")
});

/// Returns the single candidate whose path ends with `needle`.
fn unique_match<'a>(candidates: &'a [String], needle: &str) -> Option<&'a str> {
    let mut matches = candidates.iter().filter(|c| c.ends_with(needle));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.as_str()),
        _ => None,
    }
}

/// Replaces externalised `tikzpicture` blocks with `\includegraphics`.
///
/// A block starting at `\tikzsetnextfilename{NAME}` is swapped only when
/// exactly one of `figures` ends in `/NAME.pdf`.
pub fn replace_tikzpictures(content: &str, figures: &[String], separator: char) -> String {
    TIKZ_BLOCK_REGEX
        .replace_all(content, |caps: &Captures<'_>| {
            let block = &caps[0];
            let name = TIKZ_NAME_REGEX
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str());

            match name.and_then(|name| unique_match(figures, &format!("{separator}{name}.pdf"))) {
                Some(path) => format!("\\includegraphics{{{path}}}"),
                None => block.to_string(),
            }
        })
        .into_owned()
}

/// Replaces `\includesvg[opts]{path}` with `\includeinkscape[opts]{file}`.
///
/// `file` is the single Inkscape export named `BASENAME-tex.pdf_tex`; when
/// there is none, or more than one, the command is left as is.
pub fn replace_includesvg(content: &str, svg_files: &[String], separator: char) -> String {
    INCLUDESVG_REGEX
        .replace_all(content, |caps: &Captures<'_>| {
            let svg_path = &caps[2];
            let basename = svg_path.rsplit(separator).next().unwrap_or(svg_path);
            let needle = format!("{separator}{basename}-tex.pdf_tex");

            match unique_match(svg_files, &needle) {
                Some(path) => {
                    let options = caps.get(1).map_or("", |m| m.as_str());
                    format!("\\includeinkscape{options}{{{path}}}")
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
