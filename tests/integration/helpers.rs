//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Writes `content` to `root/relative`, creating parent folders.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("relative path has a parent"))
        .expect("Failed to create fixture directory");
    fs::write(path, content).expect("Failed to write fixture file");
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read output file")
}

pub const MAIN_TEX: &str = "\\documentclass{article}
% a full-line comment
\\begin{document}
\\input{sections/intro}
\\includegraphics[width=\\linewidth]{figs/used}
\\todo{remove me}
\\iffalse
\\input{sections/dead}
\\fi
See \\url{http://example.org/100%done} % trailing note
\\begin{comment}
hidden
\\end{comment}
\\end{document}
Everything after the end is dropped.
";

/// A small paper with used and unused sources, figures and data files.
///
/// Returns the temp dir and the project folder inside it.
pub fn sample_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path().join("paper");

    write(&root, "main.tex", MAIN_TEX);
    write(
        &root,
        "sections/intro.tex",
        "Intro\\red{ highlighted}\n\\input{sections/deep.tex}\n\\csvreader{data/table.csv}{}{}\n",
    );
    write(&root, "sections/deep.tex", "Deep\n");
    write(&root, "sections/dead.tex", "Dead\n");
    write(&root, "sections/orphan.tex", "Orphan\n");
    write(&root, "figs/used.png", "png");
    write(&root, "figs/unused.png", "png");
    write(&root, "data/table.csv", "a,b\n");
    write(&root, "data/other.csv", "c,d\n");
    write(&root, "main.aux", "aux");
    write(&root, "refs.bib", "@misc{x}");
    write(&root, "style.sty", "% style");
    write(&root, ".git/HEAD", "ref: refs/heads/main");

    (dir, root)
}
