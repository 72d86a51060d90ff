//! Run configuration.
//!
//! A run is described by a [`Config`], read from an optional YAML, TOML or
//! JSON file and then overridden by command-line arguments.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::latex::{CleanOptions, PatternInsertion};

/// Suffix appended to the input folder when no output folder is given.
pub const OUTPUT_SUFFIX: &str = "_arXiv";

/// Folder name used when `--svg-inkscape` is passed without a value.
pub const DEFAULT_SVG_INKSCAPE: &str = "svg-inkscape";

pub const DEFAULT_PDF_IM_RESOLUTION: u32 = 500;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported config format for {path} (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a cleaning run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_folder: PathBuf,
    /// Defaults to the input folder with `_arXiv` appended.
    pub output_folder: Option<PathBuf>,
    /// Ship `.bib` files instead of dropping them.
    pub keep_bib: bool,
    /// Commands removed together with their argument.
    pub commands_to_delete: Vec<String>,
    /// Commands removed while keeping their argument.
    pub commands_only_to_delete: Vec<String>,
    pub environments_to_delete: Vec<String>,
    /// Extra `\if...` commands that are not closed by `\fi`.
    pub if_exceptions: Vec<String>,
    /// Folder of externalised TikZ PDFs to substitute for `tikzpicture`s.
    pub use_external_tikz: Option<String>,
    /// Folder of Inkscape SVG exports to substitute for `\includesvg`.
    pub svg_inkscape: Option<String>,
    /// Recompress referenced PDF figures with Ghostscript.
    pub compress_pdf: bool,
    pub pdf_im_resolution: u32,
    /// Per-figure resolution overrides.
    #[serde(alias = "images_whitelist")]
    pub images_allowlist: BTreeMap<String, u32>,
    pub patterns_and_insertions: Vec<PatternInsertion>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::new(),
            output_folder: None,
            keep_bib: false,
            commands_to_delete: Vec::new(),
            commands_only_to_delete: Vec::new(),
            environments_to_delete: Vec::new(),
            if_exceptions: Vec::new(),
            use_external_tikz: None,
            svg_inkscape: None,
            compress_pdf: false,
            pdf_im_resolution: DEFAULT_PDF_IM_RESOLUTION,
            images_allowlist: BTreeMap::new(),
            patterns_and_insertions: Vec::new(),
            verbose: false,
        }
    }
}

impl Config {
    /// Reads a config file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            Some("json") => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Applies command-line arguments on top of this configuration.
    ///
    /// Values given on the command line replace scalars, switch flags on,
    /// go in front of list entries and win over map entries.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        self.input_folder = cli.input_folder.clone();

        if let Some(output) = &cli.output_folder {
            self.output_folder = Some(output.clone());
        }
        if let Some(tikz) = &cli.use_external_tikz {
            self.use_external_tikz = Some(tikz.clone());
        }
        if let Some(svg) = &cli.svg_inkscape {
            self.svg_inkscape = Some(svg.clone());
        }
        if let Some(resolution) = cli.pdf_im_resolution {
            self.pdf_im_resolution = resolution;
        }

        self.keep_bib |= cli.keep_bib;
        self.compress_pdf |= cli.compress_pdf;
        self.verbose |= cli.verbose;

        prepend(&mut self.commands_to_delete, &cli.commands_to_delete);
        prepend(&mut self.commands_only_to_delete, &cli.commands_only_to_delete);
        prepend(&mut self.environments_to_delete, &cli.environments_to_delete);
        prepend(&mut self.if_exceptions, &cli.if_exceptions);

        if let Some(allowlist) = &cli.images_allowlist {
            self.images_allowlist
                .extend(allowlist.iter().map(|(k, v)| (k.clone(), *v)));
        }

        self
    }

    /// Where the cleaned tree is written.
    pub fn output_folder(&self) -> PathBuf {
        if let Some(output) = &self.output_folder {
            return output.clone();
        }
        let input = self
            .input_folder
            .canonicalize()
            .unwrap_or_else(|_| self.input_folder.clone());
        let mut name = input.into_os_string();
        name.push(OUTPUT_SUFFIX);
        PathBuf::from(name)
    }

    /// Resolution for a figure, honouring the allowlist.
    pub fn pdf_resolution_for(&self, figure: &str) -> u32 {
        self.images_allowlist
            .get(figure)
            .copied()
            .unwrap_or(self.pdf_im_resolution)
    }

    /// The per-file cleaning settings.
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            commands_to_delete: self.commands_to_delete.clone(),
            commands_only_to_delete: self.commands_only_to_delete.clone(),
            environments_to_delete: self.environments_to_delete.clone(),
            if_exceptions: self.if_exceptions.clone(),
        }
    }
}

fn prepend(list: &mut Vec<String>, front: &[String]) {
    let rest = std::mem::take(list);
    *list = front.iter().cloned().chain(rest).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.pdf_im_resolution, 500);
        assert!(!config.keep_bib);
        assert!(config.svg_inkscape.is_none());
        assert!(config.patterns_and_insertions.is_empty());
    }

    #[test]
    fn loads_yaml_with_legacy_allowlist_key() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cleaner_config.yaml",
            r#"
input_folder: paper
commands_to_delete:
  - todo
images_whitelist:
  images/im.png: 200
patterns_and_insertions:
  - pattern: 'a(?P<x>b)'
    insertion: '{x}'
    description: demo
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.input_folder, PathBuf::from("paper"));
        assert_eq!(config.commands_to_delete, vec!["todo"]);
        assert_eq!(config.images_allowlist.get("images/im.png"), Some(&200));
        assert_eq!(config.patterns_and_insertions.len(), 1);
        assert!(config.patterns_and_insertions[0].strip_whitespace);
        assert_eq!(config.pdf_im_resolution, 500);
    }

    #[test]
    fn loads_toml_and_json() {
        let dir = TempDir::new().unwrap();
        let toml_path = write(&dir, "c.toml", "keep_bib = true\npdf_im_resolution = 300\n");
        let json_path = write(&dir, "c.json", r#"{"environments_to_delete": ["note"]}"#);

        let from_toml = Config::load(&toml_path).unwrap();
        assert!(from_toml.keep_bib);
        assert_eq!(from_toml.pdf_im_resolution, 300);

        let from_json = Config::load(&json_path).unwrap();
        assert_eq!(from_json.environments_to_delete, vec!["note"]);
    }

    #[test]
    fn rejects_unknown_extension_and_bad_content() {
        let dir = TempDir::new().unwrap();
        let ini = write(&dir, "c.ini", "keep_bib=true");
        let bad = write(&dir, "c.json", "{not json");

        assert!(matches!(
            Config::load(&ini),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert!(matches!(Config::load(&bad), Err(ConfigError::Json { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.yaml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn command_line_wins_and_lists_concatenate() {
        let file = Config {
            input_folder: PathBuf::from("from_file"),
            commands_to_delete: vec!["file_cmd".to_string()],
            pdf_im_resolution: 300,
            images_allowlist: BTreeMap::from([
                ("a.pdf".to_string(), 100),
                ("b.pdf".to_string(), 100),
            ]),
            ..Config::default()
        };
        let cli = Cli::parse_from([
            "texclean",
            "paper",
            "--commands-to-delete",
            "cli_cmd",
            "--pdf-im-resolution",
            "150",
            "--keep-bib",
            "--images-allowlist",
            r#"{"b.pdf": 50}"#,
        ]);

        let merged = file.merge_cli(&cli);

        assert_eq!(merged.input_folder, PathBuf::from("paper"));
        assert_eq!(merged.commands_to_delete, vec!["cli_cmd", "file_cmd"]);
        assert_eq!(merged.pdf_im_resolution, 150);
        assert!(merged.keep_bib);
        assert_eq!(merged.pdf_resolution_for("a.pdf"), 100);
        assert_eq!(merged.pdf_resolution_for("b.pdf"), 50);
        assert_eq!(merged.pdf_resolution_for("c.pdf"), 150);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let file = Config {
            compress_pdf: true,
            ..Config::default()
        };
        let merged = file.merge_cli(&Cli::parse_from(["texclean", "paper"]));
        assert!(merged.compress_pdf);
        assert!(merged.svg_inkscape.is_none());
    }

    #[test]
    fn output_folder_defaults_next_to_input() {
        let config = Config {
            input_folder: PathBuf::from("does/not/exist"),
            ..Config::default()
        };
        assert_eq!(config.output_folder(), PathBuf::from("does/not/exist_arXiv"));

        let explicit = Config {
            output_folder: Some(PathBuf::from("out")),
            ..config
        };
        assert_eq!(explicit.output_folder(), PathBuf::from("out"));
    }

    #[test]
    fn clean_options_follow_config() {
        let config = Config {
            if_exceptions: vec!["ifmine".to_string()],
            ..Config::default()
        };
        assert_eq!(config.clean_options().if_exceptions, vec!["ifmine"]);
    }
}
