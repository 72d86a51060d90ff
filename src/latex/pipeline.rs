//! The per-file cleaning pipeline.

use tracing::{debug, warn};

use super::commands::strip_command;
use super::comments::strip_comments;
use super::conditionals::{simplify_conditionals, ConditionalError};
use super::environments::{strip_environment, COMMENT_ENVIRONMENT};
use super::{SourceFile, Transform};

/// Removes line comments.
pub struct StripComments;

impl Transform for StripComments {
    fn transform(&mut self, source: &mut SourceFile) {
        source.body = strip_comments(&source.body);
    }
}

/// Removes every block of one environment.
pub struct RemoveEnvironment {
    name: String,
}

impl RemoveEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transform for RemoveEnvironment {
    fn transform(&mut self, source: &mut SourceFile) {
        source.body = strip_environment(&source.body, &self.name);
    }
}

/// Removes a command, optionally keeping its argument.
pub struct RemoveCommand {
    name: String,
    keep_text: bool,
}

impl RemoveCommand {
    /// Deletes `\name{...}` including its argument.
    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keep_text: false,
        }
    }

    /// Replaces `\name{...}` with its argument.
    pub fn unwrap(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keep_text: true,
        }
    }
}

impl Transform for RemoveCommand {
    fn transform(&mut self, source: &mut SourceFile) {
        source.body = strip_command(&source.body, &self.name, self.keep_text);
    }
}

/// Resolves static conditionals.
///
/// Files with malformed nesting are left untouched; the failures are kept
/// for the caller to report.
pub struct SimplifyConditionals {
    exceptions: Vec<String>,
    failures: Vec<(String, ConditionalError)>,
}

impl SimplifyConditionals {
    pub fn new(exceptions: Vec<String>) -> Self {
        Self {
            exceptions,
            failures: Vec::new(),
        }
    }

    /// Files that could not be simplified, with the reason.
    pub fn failures(&self) -> &[(String, ConditionalError)] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<(String, ConditionalError)> {
        self.failures
    }
}

impl Transform for SimplifyConditionals {
    fn transform(&mut self, source: &mut SourceFile) {
        match simplify_conditionals(&source.body, &self.exceptions) {
            Ok(body) => source.body = body,
            Err(err) => {
                warn!("Skipping conditionals in {}: {}", source.path, err);
                self.failures.push((source.path.clone(), err));
            }
        }
    }
}

/// What to strip from each file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Commands removed together with their argument.
    pub commands_to_delete: Vec<String>,
    /// Commands removed while keeping their argument.
    pub commands_only_to_delete: Vec<String>,
    pub environments_to_delete: Vec<String>,
    /// Extra `\if...` commands that are not closed by `\fi`.
    pub if_exceptions: Vec<String>,
}

/// Runs the full cleaning pipeline over source files.
pub struct SourceCleaner {
    options: CleanOptions,
}

impl SourceCleaner {
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    /// Cleans `source` in place.
    ///
    /// Returns the conditional nesting error if that stage had to be skipped.
    pub fn clean(&self, source: &mut SourceFile) -> Option<ConditionalError> {
        debug!("Cleaning {}", source.path);

        StripComments.transform(source);
        RemoveEnvironment::new(COMMENT_ENVIRONMENT).transform(source);

        let mut conditionals = SimplifyConditionals::new(self.options.if_exceptions.clone());
        conditionals.transform(source);

        for name in &self.options.environments_to_delete {
            RemoveEnvironment::new(name.as_str()).transform(source);
        }
        for name in &self.options.commands_only_to_delete {
            RemoveCommand::unwrap(name.as_str()).transform(source);
        }
        for name in &self.options.commands_to_delete {
            RemoveCommand::delete(name.as_str()).transform(source);
        }

        conditionals.into_failures().pop().map(|(_, err)| err)
    }

    /// Convenience wrapper around [`SourceCleaner::clean`] for plain text.
    pub fn clean_text(&self, text: &str) -> String {
        let mut source = SourceFile::new("<text>", text);
        self.clean(&mut source);
        source.body
    }
}
