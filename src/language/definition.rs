//! Language definitions and their detection metadata.

use crate::error::{SnifferError, SnifferResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A compiled pattern tested against the head of a document.
///
/// The pattern is anchored at the start of the head. It may use `(?m)` and
/// `(?s)` to reach past the first physical line, which is how shell-wrapper
/// re-exec idioms (`#!/bin/sh` followed by `exec tclsh "$0"`) are recognized.
#[derive(Debug, Clone)]
pub struct ShebangPattern {
    source: String,
    regex: Regex,
}

impl ShebangPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"\A(?:{source})"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, head: &str) -> bool {
        self.regex.is_match(head)
    }
}

impl PartialEq for ShebangPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for ShebangPattern {}

/// Declarative record describing one recognized language.
///
/// Identity is `name`. Everything except `primary` is fixed once the
/// definition has been registered with a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDefinition {
    pub name: String,
    /// Aliases accepted in a local-variable `mode` directive. When empty the
    /// name itself is the only alias.
    pub mode_names: Vec<String>,
    /// Fallback association, e.g. `.py`. Must begin with a dot.
    pub default_extension: Option<String>,
    pub shebang_patterns: Vec<ShebangPattern>,
    pub namespaces: BTreeSet<String>,
    pub public_ids: BTreeSet<String>,
    pub system_ids: BTreeSet<String>,
    pub primary: bool,
    pub internal: bool,
    pub access_key: Option<String>,
}

impl LanguageDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode_names: Vec::new(),
            default_extension: None,
            shebang_patterns: Vec::new(),
            namespaces: BTreeSet::new(),
            public_ids: BTreeSet::new(),
            system_ids: BTreeSet::new(),
            primary: false,
            internal: false,
            access_key: None,
        }
    }

    pub fn with_mode_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mode_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = Some(extension.into());
        self
    }

    /// Compile and append shebang patterns, keeping their order.
    pub fn with_shebang_patterns<I, S>(mut self, patterns: I) -> SnifferResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for source in patterns {
            let pattern = ShebangPattern::new(source.as_ref()).map_err(|source| {
                SnifferError::InvalidShebangPattern {
                    language: self.name.clone(),
                    source,
                }
            })?;
            self.shebang_patterns.push(pattern);
        }
        Ok(self)
    }

    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces.extend(namespaces.into_iter().map(Into::into));
        self
    }

    pub fn with_public_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_system_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }
}

/// Serialized form of a language definition, as found in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub name: String,
    #[serde(default)]
    pub mode_names: Vec<String>,
    #[serde(default)]
    pub default_extension: Option<String>,
    #[serde(default)]
    pub shebang_patterns: Vec<String>,
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub public_ids: Vec<String>,
    #[serde(default)]
    pub system_ids: Vec<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub access_key: Option<String>,
}

impl TryFrom<&LanguageSpec> for LanguageDefinition {
    type Error = SnifferError;

    fn try_from(spec: &LanguageSpec) -> SnifferResult<Self> {
        let mut definition = LanguageDefinition::new(spec.name.clone())
            .with_mode_names(spec.mode_names.iter().cloned())
            .with_namespaces(spec.namespaces.iter().cloned())
            .with_public_ids(spec.public_ids.iter().cloned())
            .with_system_ids(spec.system_ids.iter().cloned())
            .primary(spec.primary)
            .internal(spec.internal)
            .with_shebang_patterns(&spec.shebang_patterns)?;
        definition.default_extension = spec.default_extension.clone();
        definition.access_key = spec.access_key.clone();
        Ok(definition)
    }
}
