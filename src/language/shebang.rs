//! Shebang-based language detection for interpreter scripts.
//!
//! Every registered `(language, pattern)` pair is tried against the head of
//! the document. Patterns may reach past the first line, so wrapper idioms like
//!
//! ```text
//! #!/bin/sh
//! # the next line restarts using tclsh \
//! exec tclsh "$0" "$@"
//! ```
//!
//! can be attributed to the language that actually runs.

use super::definition::ShebangPattern;

/// Outcome of testing a head against the shebang patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShebangMatch {
    None,
    Unique(String),
    /// More than one language claims the head; never guess between them.
    Ambiguous(Vec<String>),
}

/// Detect language from the shebang line(s) at the start of `head`.
///
/// Languages are reported in pattern registration order, each once.
pub fn detect_from_shebang(head: &str, patterns: &[(String, ShebangPattern)]) -> ShebangMatch {
    if !head.starts_with("#!") {
        return ShebangMatch::None;
    }

    let mut languages: Vec<String> = Vec::new();
    for (language, pattern) in patterns {
        if pattern.is_match(head) && !languages.contains(language) {
            languages.push(language.clone());
        }
    }

    match languages.len() {
        0 => ShebangMatch::None,
        1 => ShebangMatch::Unique(languages.remove(0)),
        _ => ShebangMatch::Ambiguous(languages),
    }
}
