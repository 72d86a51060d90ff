//! Static evaluation of primitive TeX conditionals.
//!
//! `\iffalse`/`\if0` and `\iftrue`/`\if1` blocks are resolved at cleaning
//! time: dead branches are deleted and the delimiters of live branches are
//! dropped. Every other `\if...` is kept as written, but the conditionals
//! nested inside it are still resolved.
//!
//! The text is first tokenised into `\if<word>`, `\else` and `\fi`, then
//! parsed into a tree with an explicit cursor instead of recursion, so deeply
//! nested documents cannot exhaust the stack. Malformed nesting aborts the
//! whole transform for that text.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::spans::{absorb_trailing_whitespace, apply_spans, DeletionSpan};

/// Commands that start with `\if` but are not closed by `\fi`.
///
/// `\iff` is the math symbol; the rest take their branches as brace
/// arguments (ifthen, etoolbox, babel).
pub const DEFAULT_IF_EXCEPTIONS: &[&str] = &[
    "iff",
    "ifthenelse",
    "iflanguage",
    "ifbool",
    "iftoggle",
    "ifdef",
    "ifndef",
    "ifcsdef",
    "ifcsndef",
    "ifundef",
    "ifcsundef",
    "ifdefmacro",
    "ifdefempty",
    "ifdefstring",
    "ifdefstrequal",
    "ifstrequal",
    "ifstrempty",
    "ifblank",
    "ifnumcomp",
    "ifnumequal",
    "ifdimcomp",
    "ifboolexpr",
];

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:if\s*(\w+)|else|fi)").expect("valid conditional token regex"));

/// Index of a node in a [`ConditionalTree`].
pub type NodeId = usize;

/// How a conditional is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalKind {
    /// `\iftrue` or `\if1`: the first branch always wins.
    ResolvedTrue,
    /// `\iffalse` or `\if0`: the `\else` branch (if any) always wins.
    ResolvedFalse,
    /// Any other conditional; both branches are kept.
    Unknown,
}

/// One `\if ... [\else ...] \fi` construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalNode {
    pub kind: ConditionalKind,
    /// Span of the opening `\if...` token.
    pub open: Range<usize>,
    /// Span of the `\else` token, once seen.
    pub else_token: Option<Range<usize>>,
    /// Span of the closing `\fi`, once seen.
    pub close: Option<Range<usize>>,
    pub then_branch: Vec<NodeId>,
    pub else_branch: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl ConditionalNode {
    fn is_closed(&self) -> bool {
        self.close.is_some()
    }
}

/// What went wrong while parsing conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// `\else` outside any conditional.
    UnmatchedElse,
    /// A second `\else` in the same conditional.
    DuplicateElse,
    /// `\fi` outside any conditional.
    UnmatchedFi,
    /// A conditional still open at the end of the text.
    UnclosedIf,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedKind::UnmatchedElse => write!(f, "unmatched \\else"),
            MalformedKind::DuplicateElse => write!(f, "duplicate \\else"),
            MalformedKind::UnmatchedFi => write!(f, "unmatched \\fi"),
            MalformedKind::UnclosedIf => write!(f, "unclosed conditional"),
        }
    }
}

/// An enclosing conditional, reported for context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenConditional {
    pub token: String,
    pub line: usize,
}

/// Malformed conditional nesting.
///
/// `ancestors` lists the conditionals open at the failure point, outermost
/// first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} `{token}` at line {line}{}", describe_ancestors(.ancestors))]
pub struct ConditionalError {
    pub kind: MalformedKind,
    pub token: String,
    pub line: usize,
    pub ancestors: Vec<OpenConditional>,
}

fn describe_ancestors(ancestors: &[OpenConditional]) -> String {
    if ancestors.is_empty() {
        return String::new();
    }
    let chain: Vec<String> = ancestors
        .iter()
        .map(|a| format!("`{}` (line {})", a.token, a.line))
        .collect();
    format!(" inside {}", chain.join(" > "))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    If { word: String, compact: String },
    Else,
    Fi,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    range: Range<usize>,
}

fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let range = whole.range();

            if let Some(word) = caps.get(1) {
                // `\newif\iffoo` declares a conditional, it does not open one.
                if text[..range.start].trim_end().ends_with(r"\newif") {
                    return None;
                }
                let compact: String = whole.as_str().split_whitespace().collect();
                return Some(Token {
                    kind: TokenKind::If {
                        word: word.as_str().to_string(),
                        compact,
                    },
                    range,
                });
            }

            // `\else` and `\fi` must not be the prefix of a longer name.
            if text[range.end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                return None;
            }
            let kind = if whole.as_str() == r"\else" {
                TokenKind::Else
            } else {
                TokenKind::Fi
            };
            Some(Token { kind, range })
        })
        .collect()
}

fn classify(compact: &str) -> ConditionalKind {
    match compact {
        r"\iffalse" | r"\if0" => ConditionalKind::ResolvedFalse,
        r"\iftrue" | r"\if1" => ConditionalKind::ResolvedTrue,
        _ => ConditionalKind::Unknown,
    }
}

fn is_exception(word: &str, exceptions: &[String]) -> bool {
    let name = format!("if{word}");
    DEFAULT_IF_EXCEPTIONS.contains(&name.as_str())
        || exceptions
            .iter()
            .any(|e| e.trim_start_matches('\\') == name)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Conditionals parsed from a text, stored in an arena.
#[derive(Debug, Clone, Default)]
pub struct ConditionalTree {
    nodes: Vec<ConditionalNode>,
    roots: Vec<NodeId>,
}

impl ConditionalTree {
    /// Parses the conditionals in `text`.
    ///
    /// `exceptions` extends [`DEFAULT_IF_EXCEPTIONS`]; entries may be written
    /// with or without the leading backslash.
    pub fn parse(text: &str, exceptions: &[String]) -> Result<Self, ConditionalError> {
        let mut tree = ConditionalTree::default();
        let mut current: Option<NodeId> = None;

        for token in tokenize(text) {
            match token.kind {
                TokenKind::If { word, compact } => {
                    if is_exception(&word, exceptions) {
                        continue;
                    }
                    let id = tree.nodes.len();
                    tree.nodes.push(ConditionalNode {
                        kind: classify(&compact),
                        open: token.range,
                        else_token: None,
                        close: None,
                        then_branch: Vec::new(),
                        else_branch: Vec::new(),
                        parent: current,
                    });
                    match current {
                        None => tree.roots.push(id),
                        Some(parent) => {
                            let parent = &mut tree.nodes[parent];
                            if parent.else_token.is_some() {
                                parent.else_branch.push(id);
                            } else {
                                parent.then_branch.push(id);
                            }
                        }
                    }
                    current = Some(id);
                }
                TokenKind::Else => match current {
                    None => {
                        return Err(tree.error(
                            text,
                            MalformedKind::UnmatchedElse,
                            token.range,
                            None,
                        ))
                    }
                    Some(id) if tree.nodes[id].else_token.is_some() => {
                        return Err(tree.error(
                            text,
                            MalformedKind::DuplicateElse,
                            token.range,
                            Some(id),
                        ))
                    }
                    Some(id) => tree.nodes[id].else_token = Some(token.range),
                },
                TokenKind::Fi => match current {
                    None => {
                        return Err(tree.error(
                            text,
                            MalformedKind::UnmatchedFi,
                            token.range,
                            None,
                        ))
                    }
                    Some(id) => {
                        tree.nodes[id].close = Some(token.range);
                        current = tree.nodes[id].parent;
                    }
                },
            }
        }

        if let Some(id) = current {
            let node = &tree.nodes[id];
            return Err(tree.error(
                text,
                MalformedKind::UnclosedIf,
                node.open.clone(),
                node.parent,
            ));
        }

        debug_assert!(tree.nodes.iter().all(ConditionalNode::is_closed));
        Ok(tree)
    }

    fn error(
        &self,
        text: &str,
        kind: MalformedKind,
        offending: Range<usize>,
        innermost: Option<NodeId>,
    ) -> ConditionalError {
        let mut ancestors = Vec::new();
        let mut cursor = innermost;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            ancestors.push(OpenConditional {
                token: text[node.open.clone()].to_string(),
                line: line_of(text, node.open.start),
            });
            cursor = node.parent;
        }
        ancestors.reverse();

        ConditionalError {
            kind,
            line: line_of(text, offending.start),
            token: text[offending].to_string(),
            ancestors,
        }
    }

    /// Top-level conditionals in source order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &ConditionalNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Spans to delete so that resolved conditionals disappear.
    ///
    /// Each deletion also takes one whitespace character following it.
    pub fn deletion_spans(&self, text: &str) -> Vec<DeletionSpan> {
        let delete = |start: usize, end: usize| {
            DeletionSpan::delete(start..absorb_trailing_whitespace(text, end))
        };

        let mut spans = Vec::new();
        let mut pending: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = pending.pop() {
            let node = &self.nodes[id];
            let Some(close) = node.close.clone() else {
                continue;
            };

            match (node.kind, node.else_token.clone()) {
                (ConditionalKind::ResolvedFalse, None) => {
                    spans.push(delete(node.open.start, close.end));
                }
                (ConditionalKind::ResolvedFalse, Some(else_token)) => {
                    spans.push(delete(node.open.start, else_token.end));
                    pending.extend(node.else_branch.iter().rev());
                    spans.push(delete(close.start, close.end));
                }
                (ConditionalKind::ResolvedTrue, None) => {
                    spans.push(delete(node.open.start, node.open.end));
                    pending.extend(node.then_branch.iter().rev());
                    spans.push(delete(close.start, close.end));
                }
                (ConditionalKind::ResolvedTrue, Some(else_token)) => {
                    spans.push(delete(node.open.start, node.open.end));
                    pending.extend(node.then_branch.iter().rev());
                    spans.push(delete(else_token.start, close.end));
                }
                (ConditionalKind::Unknown, _) => {
                    pending.extend(node.else_branch.iter().rev());
                    pending.extend(node.then_branch.iter().rev());
                }
            }
        }
        spans
    }
}

/// Resolves `\iftrue`/`\iffalse` style blocks in `text`.
///
/// Returns an error, and leaves the text to the caller, when the
/// conditionals are not properly nested.
pub fn simplify_conditionals(text: &str, exceptions: &[String]) -> Result<String, ConditionalError> {
    let tree = ConditionalTree::parse(text, exceptions)?;
    Ok(apply_spans(text, tree.deletion_spans(text)))
}
