//! Which TeX files are reachable from the root documents.
//!
//! A file counts as used when its path, minus the extension, appears in a
//! used file followed by `.` or `}`: that covers `\input{sec/intro}`,
//! `\include{sec/intro.tex}` and friends. Root files (those at the top of the
//! input folder) are always used.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use tracing::debug;

use crate::files::path::PathStyle;

fn references(body: &str, stem: &str) -> bool {
    body.match_indices(stem).any(|(at, _)| {
        matches!(body.as_bytes().get(at + stem.len()), Some(b'.') | Some(b'}'))
    })
}

/// Least set containing `roots` and closed under "is referenced by".
///
/// `bodies` maps each candidate path to its (already cleaned) contents.
/// Roots missing from `bodies` are still part of the result, but contribute
/// no references.
pub fn transitive_closure(
    bodies: &HashMap<String, String>,
    roots: &[String],
    style: PathStyle,
) -> BTreeSet<String> {
    let mut reachable: BTreeSet<String> = roots.iter().cloned().collect();
    let mut frontier: Vec<&str> = roots.iter().map(String::as_str).collect();

    let candidates: Vec<(&str, &str)> = bodies
        .keys()
        .map(|path| (path.as_str(), style.without_extension(path)))
        .collect();

    while !frontier.is_empty() {
        let found: Vec<&str> = candidates
            .par_iter()
            .filter(|(path, _)| !reachable.contains(*path))
            .filter(|(_, stem)| {
                frontier
                    .iter()
                    .filter_map(|used| bodies.get(*used))
                    .any(|body| references(body, stem))
            })
            .map(|(path, _)| *path)
            .collect();

        debug!("Closure pass found {} new files", found.len());
        for path in &found {
            reachable.insert((*path).to_string());
        }
        frontier = found;
    }

    reachable
}
