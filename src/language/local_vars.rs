//! Emacs-style local variable parsing.
//!
//! Two forms are recognized:
//!
//! ```text
//! # -*- mode: tcl; tab-width: 4 -*-        (one-liner, searched in the head)
//!
//! PREFIX Local Variables: SUFFIX          (block, searched in the tail)
//! PREFIX mode: tcl SUFFIX
//! PREFIX End: SUFFIX
//! ```
//!
//! One-liner variable names are lowercased; block variable names are kept
//! verbatim, so only an exact `mode` key selects a mode there. When both forms
//! set a variable the block wins.

use crate::error::{SnifferError, SnifferResult};
use std::collections::BTreeMap;

/// Variables parsed from one document.
pub type LocalVariableMap = BTreeMap<String, String>;

const ONE_LINER_DELIMITER: &str = "-*-";
const BLOCK_START: &str = "local variables:";
const BLOCK_END: &str = "end:";

/// Parse both local variable forms.
///
/// Any malformed form fails the whole parse with `LocalVariableParse`.
pub fn parse_local_variables(head: &str, tail: &str) -> SnifferResult<LocalVariableMap> {
    let mut vars = parse_one_liner(head)?;
    vars.extend(parse_block(tail)?);
    Ok(vars)
}

/// Parse a `-*- ... -*-` one-liner from the head.
pub fn parse_one_liner(head: &str) -> SnifferResult<LocalVariableMap> {
    let mut vars = LocalVariableMap::new();

    let Some(start) = head.find(ONE_LINER_DELIMITER) else {
        return Ok(vars);
    };
    let rest = &head[start + ONE_LINER_DELIMITER.len()..];
    let Some(end) = rest.find(ONE_LINER_DELIMITER) else {
        return Ok(vars);
    };
    let content = &rest[..end];
    if content.contains(['\n', '\r']) {
        return Err(SnifferError::local_variables(
            "-*- not terminated before end of line",
        ));
    }

    let entries: Vec<&str> = content
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    // `-*- Tcl -*-` is an implicit mode, allowed only as the sole entry.
    if let [only] = entries.as_slice() {
        if !only.contains(':') {
            vars.insert("mode".to_string(), only.to_string());
            return Ok(vars);
        }
    }

    for entry in entries {
        let (variable, value) = entry
            .split_once(':')
            .ok_or_else(|| SnifferError::local_variables("malformed -*- line"))?;
        // Emacs accepts "Mode", "MODE", ...
        vars.insert(variable.trim().to_lowercase(), value.trim().to_string());
    }
    Ok(vars)
}

/// Parse a `Local Variables:` ... `End:` block from the tail.
pub fn parse_block(tail: &str) -> SnifferResult<LocalVariableMap> {
    let mut vars = LocalVariableMap::new();
    let lines: Vec<&str> = tail.lines().collect();

    // A marker without a matching `End:` line (prose, code) is skipped in
    // favour of a later one.
    let Some((start, end, prefix, suffix)) =
        lines.iter().enumerate().find_map(|(start, line)| {
            let pos = find_ignore_ascii_case(line, BLOCK_START)?;
            let prefix = &line[..pos];
            let suffix = line[pos + BLOCK_START.len()..].trim_start_matches([' ', '\t']);
            let end = lines
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, line)| is_block_end(line, prefix))
                .map(|(i, _)| i)?;
            Some((start, end, prefix, suffix))
        })
    else {
        return Ok(vars);
    };

    // Validate everything before parsing anything. The suffix on the `End:`
    // line itself is not checked.
    let interior = &lines[start + 1..end];
    let mut stripped = Vec::with_capacity(interior.len());
    for line in interior {
        let Some(rest) = line.strip_prefix(prefix) else {
            return Err(SnifferError::local_variables(format!(
                "line '{}' does not use proper prefix '{}'",
                line, prefix
            )));
        };
        let Some(body) = rest.strip_suffix(suffix) else {
            return Err(SnifferError::local_variables(format!(
                "line '{}' does not use proper suffix '{}'",
                line, suffix
            )));
        };
        stripped.push(body.trim());
    }

    for entry in stripped {
        let (variable, value) = entry.split_once(':').ok_or_else(|| {
            SnifferError::local_variables(format!(
                "missing colon in local variables entry: '{}'",
                entry
            ))
        })?;
        // Not lowercased: Emacs only honours "mode" in this form.
        vars.insert(variable.trim().to_string(), value.trim().to_string());
    }
    Ok(vars)
}

fn is_block_end(line: &str, prefix: &str) -> bool {
    line.strip_prefix(prefix)
        .map(|rest| starts_with_ignore_ascii_case(rest.trim_start(), BLOCK_END))
        .unwrap_or(false)
}

fn starts_with_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .get(..needle.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(needle))
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| starts_with_ignore_ascii_case(&haystack[i..], needle))
}
