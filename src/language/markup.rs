//! Markup signatures: root namespace and DOCTYPE of an XML-ish document.
//!
//! Producing a signature is the job of an external XML service; the engine
//! only depends on [`SignatureProvider`]. [`PrologScanner`] is a lightweight
//! regex-based provider good enough for document heads.

use crate::error::{SnifferError, SnifferResult};
use regex::Regex;
use std::sync::LazyLock;

/// DOCTYPE declaration: `<!DOCTYPE name PUBLIC "public-id" "system-id">`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSignature {
    pub root_namespace: Option<String>,
    pub doctype: Option<Doctype>,
}

/// Source of document signatures.
///
/// Failures are never propagated past the content sniffer; they only mean
/// "no signature".
pub trait SignatureProvider: Send + Sync {
    fn document_signature(&self, head: &str) -> SnifferResult<DocumentSignature>;
}

/// Provider that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignature;

impl SignatureProvider for NoSignature {
    fn document_signature(&self, _head: &str) -> SnifferResult<DocumentSignature> {
        Ok(DocumentSignature::default())
    }
}

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex for comments"));

static PROCESSING_INSTRUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<\?.*?\?>").expect("valid regex for processing instructions")
});

static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<!DOCTYPE\s+([^\s>\[]+)(?:\s+(?:PUBLIC\s+(?:"([^"]*)"|'([^']*)')(?:\s+(?:"([^"]*)"|'([^']*)'))?|SYSTEM\s+(?:"([^"]*)"|'([^']*)')))?"#,
    )
    .expect("valid regex for doctype")
});

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][\w.:\-]*)([^<>]*)>").expect("valid regex for start tags")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w.:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex for attributes")
});

/// Regex-based signature provider for document heads.
///
/// Reads the DOCTYPE declaration and the namespace bound to the root
/// element's prefix (or the default namespace). Comments and processing
/// instructions are skipped. An unterminated comment is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrologScanner;

impl SignatureProvider for PrologScanner {
    fn document_signature(&self, head: &str) -> SnifferResult<DocumentSignature> {
        let without_comments = COMMENT_RE.replace_all(head, "");
        if without_comments.contains("<!--") {
            return Err(SnifferError::signature("unterminated comment"));
        }
        let text = PROCESSING_INSTRUCTION_RE.replace_all(&without_comments, "");

        Ok(DocumentSignature {
            root_namespace: root_namespace(&text),
            doctype: doctype(&text),
        })
    }
}

fn doctype(text: &str) -> Option<Doctype> {
    let caps = DOCTYPE_RE.captures(text)?;
    let group = |indices: &[usize]| {
        indices
            .iter()
            .find_map(|&i| caps.get(i))
            .map(|m| m.as_str().to_string())
    };
    Some(Doctype {
        name: caps[1].to_string(),
        public_id: group(&[2, 3]),
        system_id: group(&[4, 5, 6, 7]),
    })
}

fn root_namespace(text: &str) -> Option<String> {
    let caps = START_TAG_RE.captures(text)?;
    let name = &caps[1];
    let attributes = caps.get(2).map_or("", |m| m.as_str());

    let wanted = match name.split_once(':') {
        Some((prefix, _)) => format!("xmlns:{prefix}"),
        None => "xmlns".to_string(),
    };
    ATTRIBUTE_RE
        .captures_iter(attributes)
        .find(|attr| &attr[1] == wanted)
        .and_then(|attr| attr.get(2).or_else(|| attr.get(3)))
        .map(|m| m.as_str().to_string())
}
