//! Filename to language associations.
//!
//! The association table is assembled in layers:
//! 1. the factory table shipped with the host;
//! 2. each registered language's `default_extension`, only where the
//!    `*<ext>` pattern is still unmapped;
//! 3. a snapshot of the result (the [`FactorySnapshot`]), used to compute
//!    user diffs later;
//! 4. the user's [`DiffEntry`] list, applied in order.
//!
//! Lookup tries the exact extension, then the exact basename (both
//! case-insensitive), then every pattern as a glob, longest pattern first.

use super::catalog::LanguageCatalog;
use super::folded::FoldedMap;
use crate::error::{LockResultExt, SnifferError, SnifferResult};
use arc_swap::{ArcSwap, ArcSwapOption};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Persisted form of one association change: `(action, pattern, language)`
/// where `action` is `"+"` or `"-"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry(pub String, pub String, pub String);

impl DiffEntry {
    pub fn new(
        action: impl Into<String>,
        pattern: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self(action.into(), pattern.into(), language.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiffOp {
    Add,
    Remove,
}

impl DiffOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffOp::Add => "+",
            DiffOp::Remove => "-",
        }
    }
}

/// A validated association change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationChange {
    pub op: DiffOp,
    pub pattern: String,
    pub language: String,
}

impl AssociationChange {
    pub fn add(pattern: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Add,
            pattern: pattern.into(),
            language: language.into(),
        }
    }

    pub fn remove(pattern: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Remove,
            pattern: pattern.into(),
            language: language.into(),
        }
    }

    pub fn to_entry(&self) -> DiffEntry {
        DiffEntry::new(self.op.as_str(), self.pattern.clone(), self.language.clone())
    }
}

impl TryFrom<&DiffEntry> for AssociationChange {
    type Error = SnifferError;

    fn try_from(entry: &DiffEntry) -> SnifferResult<Self> {
        let DiffEntry(action, pattern, language) = entry;
        let op = match action.as_str() {
            "+" => DiffOp::Add,
            "-" => DiffOp::Remove,
            _ => {
                return Err(SnifferError::association_parse(
                    action,
                    pattern,
                    language,
                    "unexpected action",
                ));
            }
        };
        if pattern.is_empty() {
            return Err(SnifferError::association_parse(
                action,
                pattern,
                language,
                "empty pattern",
            ));
        }
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(SnifferError::association_parse(
                action,
                pattern,
                language,
                e.to_string(),
            ));
        }
        Ok(Self {
            op,
            pattern: pattern.clone(),
            language: language.clone(),
        })
    }
}

/// Ordered list of changes relative to the factory snapshot.
pub type AssociationDiff = Vec<AssociationChange>;

/// The association table as it stood before user diffs were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorySnapshot(BTreeMap<String, String>);

impl FactorySnapshot {
    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.0.get(pattern).map(String::as_str)
    }

    /// Diff a complete association set against this snapshot.
    ///
    /// Additions (sorted) come first, then deletions (sorted).
    pub fn diff(&self, current: &[(String, String)]) -> AssociationDiff {
        let current: BTreeSet<(&str, &str)> = current
            .iter()
            .map(|(p, l)| (p.as_str(), l.as_str()))
            .collect();

        let additions = current
            .iter()
            .filter(|(p, l)| self.get(p) != Some(*l))
            .map(|(p, l)| AssociationChange::add(*p, *l));
        let deletions = self
            .0
            .iter()
            .filter(|(p, l)| !current.contains(&(p.as_str(), l.as_str())))
            .map(|(p, l)| AssociationChange::remove(p.clone(), l.clone()));

        additions.chain(deletions).collect()
    }

    /// Apply a diff on top of this snapshot.
    pub fn apply(&self, diff: &[AssociationChange]) -> BTreeMap<String, String> {
        let mut patterns = self.0.clone();
        for change in diff {
            apply_change(&mut patterns, change);
        }
        patterns
    }
}

fn apply_change(patterns: &mut BTreeMap<String, String>, change: &AssociationChange) {
    match change.op {
        DiffOp::Add => {
            debug!(
                "add '{}' -> '{}' file association",
                change.pattern, change.language
            );
            patterns.insert(change.pattern.clone(), change.language.clone());
        }
        DiffOp::Remove => {
            if patterns.get(&change.pattern) == Some(&change.language) {
                debug!(
                    "remove '{}' -> '{}' file association",
                    change.pattern, change.language
                );
                patterns.remove(&change.pattern);
            }
        }
    }
}

enum PatternKind<'a> {
    /// `*.ext`, possibly multi-dotted (`*.django.html`)
    Extension(&'a str),
    /// A literal filename such as `Makefile`
    Basename,
    Glob,
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

fn classify(pattern: &str) -> PatternKind<'_> {
    if let Some(ext) = pattern.strip_prefix("*.") {
        if !ext.is_empty() && !has_glob_meta(ext) {
            return PatternKind::Extension(ext);
        }
        return PatternKind::Glob;
    }
    if has_glob_meta(pattern) {
        PatternKind::Glob
    } else {
        PatternKind::Basename
    }
}

/// Longest pattern first; equal lengths in lexical order.
fn glob_order(a: &str, b: &str) -> Ordering {
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}

/// One published generation of association lookup tables.
///
/// The pattern table and the derived fast-lookup maps are always computed
/// together from the same inputs.
#[derive(Debug, Clone)]
pub struct AssociationTables {
    patterns: BTreeMap<String, String>,
    factory: FactorySnapshot,
    extensions: FoldedMap<String>,
    basenames: FoldedMap<String>,
    globs: Vec<(glob::Pattern, String)>,
}

impl AssociationTables {
    /// Build tables from the factory table, the catalog's fallback
    /// extensions and the user diff list.
    ///
    /// Malformed diff entries are skipped with a warning.
    pub fn build(
        factory: &BTreeMap<String, String>,
        catalog: &LanguageCatalog,
        diffs: &[DiffEntry],
    ) -> Self {
        let mut patterns = factory.clone();

        for language in catalog.languages() {
            let Some(extension) = language.default_extension.as_deref() else {
                continue;
            };
            if !extension.starts_with('.') {
                warn!(
                    "'{}': skipping unexpected default extension for language '{}': it must begin with '.'",
                    extension, language.name
                );
                continue;
            }
            let pattern = format!("*{extension}");
            if let Some(existing) = patterns.get(&pattern) {
                debug!(
                    "not using default '{}' pattern for '{}' language (already mapped to '{}')",
                    pattern, language.name, existing
                );
                continue;
            }
            patterns.insert(pattern, language.name.clone());
        }

        let factory = FactorySnapshot(patterns.clone());

        for entry in diffs {
            match AssociationChange::try_from(entry) {
                Ok(change) => apply_change(&mut patterns, &change),
                Err(e) => warn!("skipping file association diff entry: {}", e),
            }
        }

        Self::derive(patterns, factory)
    }

    fn derive(patterns: BTreeMap<String, String>, factory: FactorySnapshot) -> Self {
        let mut extensions = FoldedMap::new();
        let mut basenames = FoldedMap::new();
        let mut globs = Vec::with_capacity(patterns.len());

        for (pattern, language) in &patterns {
            match classify(pattern) {
                PatternKind::Extension(ext) => {
                    extensions.insert(ext, language.clone());
                }
                PatternKind::Basename => {
                    basenames.insert(pattern, language.clone());
                }
                PatternKind::Glob => {}
            }
            match glob::Pattern::new(pattern) {
                Ok(compiled) => globs.push((compiled, language.clone())),
                Err(e) => warn!("ignoring unparsable association pattern {:?}: {}", pattern, e),
            }
        }
        globs.sort_by(|(a, _), (b, _)| glob_order(a.as_str(), b.as_str()));

        Self {
            patterns,
            factory,
            extensions,
            basenames,
            globs,
        }
    }

    /// Suggest a language for a file basename.
    pub fn resolve(&self, basename: &str) -> Option<&str> {
        // Everything after the first dot, so `*.django.html` can be an exact hit.
        // A leading dot (`.bashrc`) does not start an extension.
        let extension = match basename.find('.') {
            Some(pos) if pos > 0 => Some(&basename[pos + 1..]),
            _ => None,
        };
        if let Some(language) = extension
            .filter(|ext| !ext.is_empty())
            .and_then(|ext| self.extensions.get(ext))
        {
            return Some(language.as_str());
        }
        if let Some(language) = self.basenames.get(basename) {
            return Some(language.as_str());
        }

        self.globs
            .iter()
            .find(|(pattern, _)| pattern.matches(basename))
            .map(|(_, language)| language.as_str())
    }

    /// All `(pattern, language)` pairs, sorted.
    pub fn associations(&self) -> Vec<(String, String)> {
        self.patterns
            .iter()
            .map(|(p, l)| (p.clone(), l.clone()))
            .collect()
    }

    pub fn patterns_for_language(&self, language: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, l)| l.as_str() == language)
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn factory(&self) -> &FactorySnapshot {
        &self.factory
    }

    pub fn compute_diff(&self, current: &[(String, String)]) -> AssociationDiff {
        self.factory.diff(current)
    }
}

/// Owner of the association inputs and the currently published tables.
///
/// Readers get an `Arc` to a complete generation. Rebuilds happen into fresh
/// containers and are published with a single swap.
pub struct AssociationIndex {
    factory: BTreeMap<String, String>,
    diffs: ArcSwap<Vec<DiffEntry>>,
    tables: ArcSwapOption<AssociationTables>,
    rebuild_lock: Mutex<()>,
}

impl std::fmt::Debug for AssociationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssociationIndex")
            .field("factory", &self.factory.len())
            .field("diffs", &self.diffs.load().len())
            .field("published", &self.tables.load().is_some())
            .finish()
    }
}

impl AssociationIndex {
    pub fn new(factory: BTreeMap<String, String>, diffs: Vec<DiffEntry>) -> Self {
        Self {
            factory,
            diffs: ArcSwap::new(Arc::new(diffs)),
            tables: ArcSwapOption::empty(),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Current tables, built on first use after an invalidation.
    pub fn tables(&self, catalog: &LanguageCatalog) -> Arc<AssociationTables> {
        if let Some(tables) = self.tables.load_full() {
            return tables;
        }
        let _guard = self.rebuild_lock.lock().recover_poison("associations::tables");
        if let Some(tables) = self.tables.load_full() {
            return tables;
        }
        self.publish(catalog)
    }

    /// Rebuild unconditionally and publish the result.
    pub fn rebuild(&self, catalog: &LanguageCatalog) -> Arc<AssociationTables> {
        let _guard = self.rebuild_lock.lock().recover_poison("associations::rebuild");
        self.publish(catalog)
    }

    fn publish(&self, catalog: &LanguageCatalog) -> Arc<AssociationTables> {
        let diffs = self.diffs.load();
        let tables = Arc::new(AssociationTables::build(&self.factory, catalog, &diffs));
        self.tables.store(Some(Arc::clone(&tables)));
        tables
    }

    /// Replace the user diff list (a configuration change event).
    pub fn set_diffs(&self, diffs: Vec<DiffEntry>) {
        let _guard = self.rebuild_lock.lock().recover_poison("associations::set_diffs");
        self.diffs.store(Arc::new(diffs));
        self.tables.store(None);
    }

    pub fn diffs(&self) -> Vec<DiffEntry> {
        self.diffs.load().as_ref().clone()
    }
}
