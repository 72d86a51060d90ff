//! Sorting the project's files into what gets cleaned, copied or dropped.

use regex::RegexSet;

use super::FilesError;

/// Build artefacts and editor files never shipped.
pub const DELETION_PATTERNS: &[&str] = &[
    r"\.aux$",
    r"\.sh$",
    r"\.blg$",
    r"\.brf$",
    r"\.log$",
    r"\.out$",
    r"\.ps$",
    r"\.dvi$",
    r"\.synctex\.gz$",
    r"~$",
    r"\.backup$",
    r"\.gitignore$",
    r"\.DS_Store$",
    r"\.svg$",
    r"^\.idea",
    r"\.dpth$",
    r"\.md5$",
    r"\.dep$",
    r"\.auxlock$",
];

pub const BIB_PATTERN: &str = r"\.bib$";

/// Figures are copied only when referenced.
pub const FIGURE_PATTERNS: &[&str] = &[r"\.png$", r"\.jpg$", r"\.jpeg$", r"\.pdf$"];

pub const TEX_PATTERNS: &[&str] = &[r"\.tex$", r"\.tikz$"];

/// A compiled list of path patterns; a path matches if any pattern does.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: RegexSet,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, FilesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();
        match RegexSet::new(&patterns) {
            Ok(set) => Ok(Self { set }),
            Err(source) => {
                // Report the first pattern that fails on its own.
                let pattern = patterns
                    .iter()
                    .find(|p| regex::Regex::new(p).is_err())
                    .cloned()
                    .unwrap_or_default();
                Err(FilesError::InvalidPattern { pattern, source })
            }
        }
    }

    /// Matches a single literal substring, as used for folder names.
    pub fn literal(text: &str) -> Self {
        let escaped = regex::escape(text);
        Self {
            set: RegexSet::new([escaped.as_str()]).unwrap_or_else(|_| RegexSet::empty()),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}

/// The items of `haystack` matching any of `patterns`.
pub fn keep_pattern(haystack: &[String], patterns: &PatternSet) -> Vec<String> {
    haystack
        .iter()
        .filter(|item| patterns.is_match(item))
        .cloned()
        .collect()
}

/// The items of `haystack` matching none of `patterns`.
pub fn remove_pattern(haystack: &[String], patterns: &PatternSet) -> Vec<String> {
    haystack
        .iter()
        .filter(|item| !patterns.is_match(item))
        .cloned()
        .collect()
}

/// The compiled patterns used to build a [`FileSplit`].
#[derive(Debug, Clone)]
pub struct SplitRules {
    /// Files never copied as-is: deletion patterns plus figures.
    pub not_copied: PatternSet,
    pub figures: PatternSet,
    pub tex: PatternSet,
    /// Folder holding externalised TikZ figures.
    pub external_tikz: Option<PatternSet>,
    /// Folder holding Inkscape SVG exports.
    pub svg_inkscape: Option<PatternSet>,
}

impl SplitRules {
    pub fn new(
        keep_bib: bool,
        external_tikz: Option<&str>,
        svg_inkscape: Option<&str>,
    ) -> Result<Self, FilesError> {
        let mut not_copied: Vec<&str> = DELETION_PATTERNS.to_vec();
        if !keep_bib {
            not_copied.push(BIB_PATTERN);
        }
        not_copied.extend_from_slice(FIGURE_PATTERNS);

        Ok(Self {
            not_copied: PatternSet::new(not_copied)?,
            figures: PatternSet::new(FIGURE_PATTERNS)?,
            tex: PatternSet::new(TEX_PATTERNS)?,
            external_tikz: external_tikz.map(PatternSet::literal),
            svg_inkscape: svg_inkscape.map(PatternSet::literal),
        })
    }
}

/// The project's files, bucketed by location and kind.
///
/// Every bucket holds relative paths in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSplit {
    pub all: Vec<String>,
    pub in_root: Vec<String>,
    pub not_in_root: Vec<String>,
    pub to_copy_in_root: Vec<String>,
    pub to_copy_not_in_root: Vec<String>,
    pub figures: Vec<String>,
    pub tex_in_root: Vec<String>,
    pub tex_not_in_root: Vec<String>,
    pub non_tex_in_root: Vec<String>,
    pub non_tex_not_in_root: Vec<String>,
    pub external_tikz_figures: Vec<String>,
    pub svg_inkscape_files: Vec<String>,
}

impl FileSplit {
    /// Buckets `all` given the subset of it that sits in the root folder.
    pub fn new(all: Vec<String>, in_root: Vec<String>, rules: &SplitRules) -> Self {
        let not_in_root: Vec<String> = all
            .iter()
            .filter(|f| !in_root.contains(f))
            .cloned()
            .collect();

        let to_copy_in_root = remove_pattern(&in_root, &rules.not_copied);
        let to_copy_not_in_root = remove_pattern(&not_in_root, &rules.not_copied);
        let figures = keep_pattern(&all, &rules.figures);

        let tex_in_root = keep_pattern(&to_copy_in_root, &rules.tex);
        let tex_not_in_root = keep_pattern(&to_copy_not_in_root, &rules.tex);
        let non_tex_in_root = remove_pattern(&to_copy_in_root, &rules.tex);
        let non_tex_not_in_root = remove_pattern(&to_copy_not_in_root, &rules.tex);

        let external_tikz_figures = rules
            .external_tikz
            .as_ref()
            .map(|p| keep_pattern(&all, p))
            .unwrap_or_default();
        let svg_inkscape_files = rules
            .svg_inkscape
            .as_ref()
            .map(|p| keep_pattern(&all, p))
            .unwrap_or_default();

        Self {
            all,
            in_root,
            not_in_root,
            to_copy_in_root,
            to_copy_not_in_root,
            figures,
            tex_in_root,
            tex_not_in_root,
            non_tex_in_root,
            non_tex_not_in_root,
            external_tikz_figures,
            svg_inkscape_files,
        }
    }

    /// All TeX sources, root files first.
    pub fn tex_files(&self) -> Vec<String> {
        self.tex_in_root
            .iter()
            .chain(&self.tex_not_in_root)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn split(keep_bib: bool) -> FileSplit {
        let all = strings(&[
            "ext_tikz/fig1.pdf",
            "figs/a.png",
            "figs/notes.txt",
            "main.aux",
            "main.tex",
            "refs.bib",
            "sections/intro.tex",
            "style.sty",
            "svg-inkscape/x-tex.pdf_tex",
            "teaser.jpg",
        ]);
        let in_root = strings(&["main.aux", "main.tex", "refs.bib", "style.sty", "teaser.jpg"]);
        let rules = SplitRules::new(keep_bib, Some("ext_tikz/"), Some("svg-inkscape")).unwrap();
        FileSplit::new(all, in_root, &rules)
    }

    #[test]
    fn buckets_by_location_and_kind() {
        let split = split(false);
        assert_eq!(split.to_copy_in_root, strings(&["main.tex", "style.sty"]));
        assert_eq!(split.tex_in_root, strings(&["main.tex"]));
        assert_eq!(split.non_tex_in_root, strings(&["style.sty"]));
        assert_eq!(split.tex_not_in_root, strings(&["sections/intro.tex"]));
        assert_eq!(
            split.non_tex_not_in_root,
            strings(&["figs/notes.txt", "svg-inkscape/x-tex.pdf_tex"])
        );
        assert_eq!(
            split.figures,
            strings(&["ext_tikz/fig1.pdf", "figs/a.png", "teaser.jpg"])
        );
        assert_eq!(split.external_tikz_figures, strings(&["ext_tikz/fig1.pdf"]));
        assert_eq!(split.svg_inkscape_files, strings(&["svg-inkscape/x-tex.pdf_tex"]));
        assert_eq!(split.tex_files(), strings(&["main.tex", "sections/intro.tex"]));
    }

    #[test]
    fn keep_bib_ships_bibliography() {
        assert!(split(true).non_tex_in_root.contains(&"refs.bib".to_string()));
        assert!(!split(false).non_tex_in_root.contains(&"refs.bib".to_string()));
    }

    #[test]
    fn keep_and_remove_partition_the_haystack() {
        let haystack = strings(&["a.tex", "b.png", "c.tikz", "d.aux"]);
        let tex = PatternSet::new(TEX_PATTERNS).unwrap();
        assert_eq!(keep_pattern(&haystack, &tex), strings(&["a.tex", "c.tikz"]));
        assert_eq!(remove_pattern(&haystack, &tex), strings(&["b.png", "d.aux"]));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = PatternSet::new(["ok$", "(unclosed"]).unwrap_err();
        match err {
            FilesError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn literal_folder_names_are_escaped() {
        let set = PatternSet::literal("ext.tikz");
        assert!(set.is_match("ext.tikz/a.pdf"));
        assert!(!set.is_match("extxtikz/a.pdf"));
    }
}
