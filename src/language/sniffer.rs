//! Content-based language guessing.
//!
//! Detectors run in fixed precedence:
//! 1. Emacs-style local variables (`mode`), which settle the question;
//! 2. markup signatures, when nothing is known yet or only the generic `XML`
//!    hint is;
//! 3. shebang patterns, only for documents starting with `#!` that nothing
//!    else matched.
//!
//! Detector failures degrade to "no candidate" plus a status event.

use super::catalog::LanguageCatalog;
use super::events::ContentGuess;
use super::local_vars::parse_local_variables;
use super::markup::SignatureProvider;
use super::shebang::{ShebangMatch, detect_from_shebang};
use crate::config::DetectionSettings;
use crate::error::SnifferError;
use log::{debug, warn};
use std::sync::Arc;

pub const XML: &str = "XML";
pub const HTML: &str = "HTML";
pub const HTML5: &str = "HTML5";

/// Runs the content detectors against a catalog snapshot.
#[derive(Clone)]
pub struct ContentSniffer {
    detection: DetectionSettings,
    signatures: Arc<dyn SignatureProvider>,
}

impl std::fmt::Debug for ContentSniffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSniffer")
            .field("detection", &self.detection)
            .field("signatures", &"Arc<dyn SignatureProvider>")
            .finish()
    }
}

impl ContentSniffer {
    pub fn new(detection: DetectionSettings, signatures: Arc<dyn SignatureProvider>) -> Self {
        Self {
            detection,
            signatures,
        }
    }

    /// Guess the language of a document from excerpts of its start and end.
    pub fn guess(&self, catalog: &LanguageCatalog, head: &str, tail: &str) -> ContentGuess {
        let mut guess = ContentGuess::default();
        let mut languages = Vec::new();

        if self.detection.local_variables {
            match parse_local_variables(head, tail) {
                Ok(vars) => {
                    if let Some(mode) = vars.get("mode") {
                        match catalog.language_for_mode(mode) {
                            Some(language) => languages.push(language.to_string()),
                            None => warn!("unknown emacs mode: '{}'", mode),
                        }
                    }
                }
                Err(e) => guess.report(&e),
            }
        }

        let only_xml_hint = languages.len() == 1 && languages[0] == XML;
        if self.detection.xml_declaration && (languages.is_empty() || only_xml_hint) {
            languages = self.markup_candidates(catalog, head, languages);
        }

        if self.detection.shebang && languages.is_empty() && head.starts_with("#!") {
            match detect_from_shebang(head, catalog.shebang_patterns()) {
                ShebangMatch::Unique(language) => languages.push(language),
                ShebangMatch::Ambiguous(all) => guess.report(&SnifferError::ambiguous_shebang(all)),
                ShebangMatch::None => {}
            }
        }

        guess.languages = languages;
        for event in &guess.events {
            event.log();
        }
        guess
    }

    fn markup_candidates(
        &self,
        catalog: &LanguageCatalog,
        head: &str,
        prior: Vec<String>,
    ) -> Vec<String> {
        // Collected least specific first, reversed at the end.
        let mut found: Vec<String> = Vec::new();

        if head
            .get(..5)
            .is_some_and(|start| start.eq_ignore_ascii_case("<?xml"))
        {
            found.push(XML.to_string());
        }

        match self.signatures.document_signature(head) {
            Ok(signature) => {
                match &signature.doctype {
                    Some(doctype) if doctype.name.eq_ignore_ascii_case("html") => {
                        found.push(HTML.to_string());
                    }
                    Some(_) => {}
                    // Only reached when the provider reports no DOCTYPE at all.
                    None if head.to_lowercase().contains("<!doctype html>") => {
                        found.push(HTML5.to_string());
                    }
                    None => {}
                }
                if let Some(language) = signature
                    .root_namespace
                    .as_deref()
                    .and_then(|ns| catalog.language_for_namespace(ns))
                {
                    found.push(language.to_string());
                }
                if let Some(doctype) = &signature.doctype {
                    if let Some(language) = doctype
                        .system_id
                        .as_deref()
                        .and_then(|id| catalog.language_for_system_id(id))
                    {
                        found.push(language.to_string());
                    }
                    if let Some(language) = doctype
                        .public_id
                        .as_deref()
                        .and_then(|id| catalog.language_for_public_id(id))
                    {
                        found.push(language.to_string());
                    }
                }
            }
            Err(e) => debug!("no document signature: {}", e),
        }

        found.reverse();
        let mut languages: Vec<String> = Vec::with_capacity(found.len() + prior.len());
        for language in found.into_iter().chain(prior) {
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        languages
    }
}
