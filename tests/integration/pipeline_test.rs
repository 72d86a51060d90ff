//! End-to-end runs of the cleaner over a temporary project.

use std::path::Path;

use texclean::latex::PatternInsertion;
use texclean::Config;

use crate::helpers::{read, sample_project, write};

fn config(input: &Path, output: &Path) -> Config {
    Config {
        input_folder: input.to_path_buf(),
        output_folder: Some(output.to_path_buf()),
        commands_to_delete: vec!["todo".to_string()],
        commands_only_to_delete: vec!["red".to_string()],
        ..Config::default()
    }
}

// ============================================================================
// TeX Cleaning
// ============================================================================

#[test]
fn main_file_is_cleaned() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    texclean::run(&config(&input, &output)).unwrap();

    assert_eq!(
        read(&output, "main.tex"),
        "\\documentclass{article}\n\
         \\begin{document}\n\
         \\input{sections/intro}\n\
         \\includegraphics[width=\\linewidth]{figs/used}\n\
         %\n\
         See \\url{http://example.org/100%done} %\n\
         \n\
         \\end{document}\n"
    );
}

#[test]
fn commands_only_to_delete_keep_their_text() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    texclean::run(&config(&input, &output)).unwrap();

    assert!(read(&output, "sections/intro.tex").starts_with("Intro highlighted\n"));
}

// ============================================================================
// File Selection
// ============================================================================

#[test]
fn only_used_files_are_shipped() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    let summary = texclean::run(&config(&input, &output)).unwrap();

    for shipped in [
        "main.tex",
        "sections/intro.tex",
        "sections/deep.tex",
        "figs/used.png",
        "data/table.csv",
        "style.sty",
    ] {
        assert!(output.join(shipped).is_file(), "{shipped} should be shipped");
    }
    for dropped in [
        "sections/dead.tex",
        "sections/orphan.tex",
        "figs/unused.png",
        "data/other.csv",
        "main.aux",
        "refs.bib",
        ".git/HEAD",
    ] {
        assert!(!output.join(dropped).exists(), "{dropped} should be dropped");
    }

    assert_eq!(summary.tex_files_written, 3);
    assert_eq!(summary.files_copied, 3);
    assert_eq!(summary.diagnostics, 0);
    assert_eq!(summary.output_folder, output);
}

#[test]
fn keep_bib_ships_bibliography() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    let config = Config {
        keep_bib: true,
        ..config(&input, &output)
    };
    texclean::run(&config).unwrap();

    assert!(output.join("refs.bib").is_file());
}

#[test]
fn default_output_folder_sits_next_to_input() {
    let (dir, input) = sample_project();
    let config = Config {
        input_folder: input.clone(),
        ..Config::default()
    };

    let summary = texclean::run(&config).unwrap();

    assert!(summary.output_folder.ends_with("paper_arXiv"));
    assert!(dir.path().join("paper_arXiv/main.tex").is_file());
}

#[test]
fn existing_output_is_replaced() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");
    write(&output, "stale.txt", "old");

    texclean::run(&config(&input, &output)).unwrap();

    assert!(!output.join("stale.txt").exists());
    assert!(output.join("main.tex").is_file());
}

// ============================================================================
// Rewrites
// ============================================================================

#[test]
fn patterns_are_applied_to_written_sources() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");

    let config = Config {
        patterns_and_insertions: vec![PatternInsertion {
            pattern: r"\\input\{(?P<name>[^}]*)\}".to_string(),
            insertion: r"\include{{{name}}}".to_string(),
            description: "input to include".to_string(),
            strip_whitespace: true,
        }],
        ..config(&input, &output)
    };
    texclean::run(&config).unwrap();

    assert!(read(&output, "main.tex").contains("\\include{sections/intro}"));
    assert!(read(&output, "sections/intro.tex").contains("\\include{sections/deep.tex}"));
}

#[test]
fn external_tikz_replaces_pictures() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");
    write(
        &input,
        "main.tex",
        "\\begin{document}\n\
         \\tikzsetnextfilename{plot}\n\
         \\begin{tikzpicture}\n\\node {x};\n\\end{tikzpicture}\n\
         \\end{document}\n",
    );
    write(&input, "ext_tikz/plot.pdf", "pdf");

    let config = Config {
        use_external_tikz: Some("ext_tikz".to_string()),
        ..config(&input, &output)
    };
    texclean::run(&config).unwrap();

    assert_eq!(
        read(&output, "main.tex"),
        "\\begin{document}\n\\includegraphics{ext_tikz/plot.pdf}\n\\end{document}\n"
    );
    assert!(output.join("ext_tikz/plot.pdf").is_file());
}

#[test]
fn malformed_conditionals_are_kept_and_counted() {
    let (dir, input) = sample_project();
    let output = dir.path().join("out");
    write(&input, "sections/deep.tex", "\\iffalse\nDeep\n");

    let summary = texclean::run(&config(&input, &output)).unwrap();

    assert_eq!(summary.diagnostics, 1);
    assert_eq!(read(&output, "sections/deep.tex"), "\\iffalse\nDeep\n");
}
