//! Registry of language definitions and their detection tables.

use super::definition::{LanguageDefinition, ShebangPattern};
use super::folded::FoldedMap;
use crate::error::{SnifferError, SnifferResult};
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Name used when a lookup asks for the empty language name.
pub const DEFAULT_LANGUAGE: &str = "Text";

/// Catalog of registered languages.
///
/// Populated once at startup via [`LanguageCatalog::register`]. Besides the
/// definitions themselves it keeps the lookup tables the content sniffer
/// consults: mode aliases, shebang patterns in registration order, and
/// namespace / DOCTYPE id maps.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    default_language: String,
    languages: BTreeMap<String, LanguageDefinition>,
    mode_aliases: FoldedMap<String>,
    primary: BTreeSet<String>,
    internal: BTreeSet<String>,
    shebang_patterns: Vec<(String, ShebangPattern)>,
    namespaces: HashMap<String, String>,
    public_ids: HashMap<String, String>,
    system_ids: HashMap<String, String>,
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl LanguageCatalog {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            languages: BTreeMap::new(),
            mode_aliases: FoldedMap::new(),
            primary: BTreeSet::new(),
            internal: BTreeSet::new(),
            shebang_patterns: Vec::new(),
            namespaces: HashMap::new(),
            public_ids: HashMap::new(),
            system_ids: HashMap::new(),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Register a language definition.
    ///
    /// Fails with `DuplicateLanguage` if the name is taken; the catalog is left
    /// untouched in that case.
    pub fn register(&mut self, definition: LanguageDefinition) -> SnifferResult<()> {
        let name = definition.name.clone();
        if self.languages.contains_key(&name) {
            return Err(SnifferError::duplicate_language(name));
        }
        info!("registering language [{}]", name);

        // `-*- mode: javascript -*-` means "JavaScript"
        if definition.mode_names.is_empty() {
            self.mode_aliases.insert(&name, name.clone());
        } else {
            for mode in &definition.mode_names {
                self.mode_aliases.insert(mode, name.clone());
            }
        }
        if definition.primary {
            self.primary.insert(name.clone());
        }
        if definition.internal {
            self.internal.insert(name.clone());
        }
        for pattern in &definition.shebang_patterns {
            self.shebang_patterns.push((name.clone(), pattern.clone()));
        }
        for ns in &definition.namespaces {
            self.namespaces.insert(ns.clone(), name.clone());
        }
        for id in &definition.public_ids {
            self.public_ids.insert(id.clone(), name.clone());
        }
        for id in &definition.system_ids {
            self.system_ids.insert(id.clone(), name.clone());
        }

        self.languages.insert(name, definition);
        Ok(())
    }

    /// Look up a language by name.
    ///
    /// The empty name means the default language. An unknown name is retried
    /// once as the default language; if that is unknown too, `None`.
    pub fn get_language(&self, name: &str) -> Option<&LanguageDefinition> {
        let name = if name.is_empty() {
            self.default_language.as_str()
        } else {
            name
        };
        if let Some(definition) = self.languages.get(name) {
            return Some(definition);
        }

        warn!("Asked for unknown language: {:?}", name);
        if name == self.default_language {
            return None;
        }
        let fallback = self.languages.get(&self.default_language);
        if fallback.is_none() {
            warn!(
                "Default language {:?} is not registered",
                self.default_language
            );
        }
        fallback
    }

    /// Exact lookup without the default-language fallback.
    pub fn get_exact(&self, name: &str) -> Option<&LanguageDefinition> {
        self.languages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.languages.contains_key(name)
    }

    /// Mark a language as primary (or not).
    pub fn change_language_status(&mut self, name: &str, primary: bool) -> SnifferResult<()> {
        let definition = self
            .languages
            .get_mut(name)
            .ok_or_else(|| SnifferError::unknown_language(name))?;
        definition.primary = primary;
        if primary {
            self.primary.insert(name.to_string());
        } else {
            self.primary.remove(name);
        }
        Ok(())
    }

    /// All user-visible language names, sorted.
    pub fn language_names(&self) -> Vec<String> {
        self.languages
            .keys()
            .filter(|name| !self.internal.contains(*name))
            .cloned()
            .collect()
    }

    /// Every registered definition, internal ones included, in name order.
    pub fn languages(&self) -> impl Iterator<Item = &LanguageDefinition> {
        self.languages.values()
    }

    pub fn is_primary(&self, name: &str) -> bool {
        self.primary.contains(name)
    }

    /// Resolve a local-variable mode value, ignoring case.
    pub fn language_for_mode(&self, mode: &str) -> Option<&str> {
        self.mode_aliases.get(mode).map(String::as_str)
    }

    /// `(language, pattern)` pairs in registration order.
    pub fn shebang_patterns(&self) -> &[(String, ShebangPattern)] {
        &self.shebang_patterns
    }

    pub fn language_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(String::as_str)
    }

    pub fn language_for_public_id(&self, id: &str) -> Option<&str> {
        self.public_ids.get(id).map(String::as_str)
    }

    pub fn language_for_system_id(&self, id: &str) -> Option<&str> {
        self.system_ids.get(id).map(String::as_str)
    }

    /// Two-tier grouping for language pickers: primary languages first, then
    /// every other non-internal language. Both tiers sorted by name.
    pub fn language_hierarchy(&self) -> LanguageHierarchy {
        let mut hierarchy = LanguageHierarchy::default();
        for (name, definition) in &self.languages {
            if self.internal.contains(name) {
                continue;
            }
            let item = LanguageItem {
                name: name.clone(),
                access_key: definition.access_key.clone(),
            };
            if self.primary.contains(name) {
                hierarchy.primary.push(item);
            } else {
                hierarchy.other.push(item);
            }
        }
        hierarchy
    }
}

/// One entry of the language picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LanguageItem {
    pub name: String,
    pub access_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LanguageHierarchy {
    pub primary: Vec<LanguageItem>,
    pub other: Vec<LanguageItem>,
}
