//! User-defined regex substitutions.
//!
//! Each rule pairs a regex with named groups and an insertion template such as
//! `\includegraphics{{figures/{first}}}`, where `{name}` is replaced by the
//! group of that name and `{{`/`}}` stand for literal braces.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// A find-and-replace rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInsertion {
    pub pattern: String,
    pub insertion: String,
    #[serde(default)]
    pub description: String,
    /// Remove all whitespace from the rendered insertion.
    #[serde(default = "default_strip_whitespace")]
    pub strip_whitespace: bool,
}

fn default_strip_whitespace() -> bool {
    true
}

/// Errors raised while applying substitution rules.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Insertion template refers to unknown group '{name}'")]
    UnknownGroup { name: String },

    #[error("Unbalanced brace in insertion template '{template}'")]
    UnbalancedBrace { template: String },
}

/// Removes every whitespace character from `text`.
pub fn strip_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, "").into_owned()
}

/// Applies each rule in order, replacing every match.
///
/// After a replacement the search resumes behind the inserted text, so an
/// insertion that matches its own pattern is not rewritten again.
pub fn find_and_replace_patterns(
    content: &str,
    rules: &[PatternInsertion],
) -> Result<String, PatternError> {
    let mut content = content.to_string();

    for rule in rules {
        info!("Processing pattern: {}", rule.description);
        let re = Regex::new(&rule.pattern).map_err(|source| PatternError::InvalidRegex {
            pattern: rule.pattern.clone(),
            source,
        })?;

        let mut from = 0;
        while let Some(caps) = re.captures_at(&content, from) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = whole.range();

            let mut insertion = render_template(&rule.insertion, &re, &caps)?;
            if rule.strip_whitespace {
                insertion = strip_whitespace(&insertion);
            }
            debug!("Found {:<70}", whole.as_str());
            debug!("Replacing with {:<30}", insertion);

            content.replace_range(range.clone(), &insertion);
            from = range.start + insertion.len();
            if range.is_empty() {
                // Step past zero-width matches.
                match content[from..].chars().next() {
                    Some(c) => from += c.len_utf8(),
                    None => break,
                }
            }
        }
        info!("Finished pattern: {}", rule.description);
    }

    Ok(content)
}

/// Fills `{name}` placeholders from named capture groups.
///
/// Groups that exist in the pattern but did not participate in the match
/// render as empty text.
fn render_template(
    template: &str,
    re: &Regex,
    caps: &Captures<'_>,
) -> Result<String, PatternError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(PatternError::UnbalancedBrace {
                                template: template.to_string(),
                            })
                        }
                    }
                }
                match caps.name(&name) {
                    Some(m) => out.push_str(m.as_str()),
                    None if re.capture_names().flatten().any(|n| n == name) => {}
                    None => return Err(PatternError::UnknownGroup { name }),
                }
            }
            '}' => {
                return Err(PatternError::UnbalancedBrace {
                    template: template.to_string(),
                })
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
