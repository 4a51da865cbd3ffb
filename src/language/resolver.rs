//! Entry points for callers: filename resolution and content guessing.

use super::associations::{AssociationIndex, AssociationTables, DiffEntry};
use super::catalog::{LanguageCatalog, LanguageHierarchy};
use super::definition::LanguageDefinition;
use super::events::ContentGuess;
use super::markup::{PrologScanner, SignatureProvider};
use super::sniffer::ContentSniffer;
use crate::config::{SnifferSettings, builtin_languages};
use crate::error::{LockResultExt, SnifferError, SnifferResult};
use arc_swap::ArcSwap;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Language identification service.
///
/// Owns one catalog, one association index and one content sniffer. Reads go
/// against the currently published catalog snapshot without locking; writers
/// serialize on an internal mutex and publish a fresh snapshot.
pub struct LanguageResolver {
    catalog: ArcSwap<LanguageCatalog>,
    write_lock: Mutex<()>,
    associations: AssociationIndex,
    sniffer: ContentSniffer,
    /// Persisted `primary` preferences, applied whenever a language registers
    language_status: BTreeMap<String, bool>,
}

impl std::fmt::Debug for LanguageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageResolver")
            .field("languages", &self.catalog.load().language_names().len())
            .field("associations", &self.associations)
            .field("sniffer", &self.sniffer)
            .finish()
    }
}

impl LanguageResolver {
    /// Assemble a resolver from already-built parts.
    pub fn new(
        catalog: LanguageCatalog,
        associations: AssociationIndex,
        sniffer: ContentSniffer,
    ) -> Self {
        Self {
            catalog: ArcSwap::from_pointee(catalog),
            write_lock: Mutex::new(()),
            associations,
            sniffer,
            language_status: BTreeMap::new(),
        }
    }

    /// Built-in languages, factory associations and the regex prolog scanner.
    pub fn with_defaults() -> Self {
        Self::from_settings(&SnifferSettings::default(), Arc::new(PrologScanner))
    }

    /// Build a resolver from settings.
    ///
    /// Built-in languages register first (unless disabled), then configured
    /// ones. A configured language that fails to compile or collides with an
    /// existing name is skipped with a warning.
    pub fn from_settings(
        settings: &SnifferSettings,
        signatures: Arc<dyn SignatureProvider>,
    ) -> Self {
        let mut catalog = LanguageCatalog::new(settings.default_language());

        let builtins = if settings.include_builtin_languages() {
            builtin_languages()
        } else {
            Vec::new()
        };
        for spec in builtins.iter().chain(&settings.languages) {
            let registered = LanguageDefinition::try_from(spec).and_then(|definition| {
                catalog.register(apply_status(definition, &settings.language_status))
            });
            if let Err(e) = registered {
                warn!("skipping language '{}': {}", spec.name, e);
            }
        }
        for name in settings.language_status.keys() {
            if !catalog.contains(name) {
                debug!("language_status names unregistered language '{}'", name);
            }
        }

        let associations = AssociationIndex::new(
            settings.factory_associations(),
            settings.association_diffs.clone(),
        );
        let sniffer = ContentSniffer::new(settings.detection(), signatures);

        let mut resolver = Self::new(catalog, associations, sniffer);
        resolver.language_status = settings.language_status.clone();
        resolver
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<LanguageCatalog> {
        self.catalog.load_full()
    }

    pub fn sniffer(&self) -> &ContentSniffer {
        &self.sniffer
    }

    fn associations(&self) -> Arc<AssociationTables> {
        self.associations.tables(&self.catalog.load())
    }

    /// Register one more language.
    ///
    /// On `DuplicateLanguage` nothing is published. On success the association
    /// tables are rebuilt so the language's default extension takes part.
    pub fn register_language(&self, definition: LanguageDefinition) -> SnifferResult<()> {
        let _guard = self.write_lock.lock().recover_poison("resolver::register_language");
        let mut catalog = LanguageCatalog::clone(&self.catalog.load());
        catalog.register(apply_status(definition, &self.language_status))?;

        let catalog = Arc::new(catalog);
        self.catalog.store(Arc::clone(&catalog));
        self.associations.rebuild(&catalog);
        Ok(())
    }

    /// Look up a language, falling back once to the default language.
    pub fn get_language(&self, name: &str) -> Option<LanguageDefinition> {
        self.catalog.load().get_language(name).cloned()
    }

    /// User-visible language names, sorted.
    pub fn get_language_names(&self) -> Vec<String> {
        self.catalog.load().language_names()
    }

    pub fn change_language_status(&self, name: &str, primary: bool) -> SnifferResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .recover_poison("resolver::change_language_status");
        let mut catalog = LanguageCatalog::clone(&self.catalog.load());
        catalog.change_language_status(name, primary)?;
        self.catalog.store(Arc::new(catalog));
        info!("language '{}' primary status set to {}", name, primary);
        Ok(())
    }

    pub fn language_hierarchy(&self) -> LanguageHierarchy {
        self.catalog.load().language_hierarchy()
    }

    /// Suggest a language for a file basename; `""` when nothing matches.
    pub fn suggest_language_for_file(&self, basename: &str) -> String {
        self.associations()
            .resolve(basename)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Candidate languages for a document, most likely first.
    pub fn guess_language_from_contents(&self, head: &str, tail: &str) -> Vec<String> {
        self.guess_with_events(head, tail).languages
    }

    /// Like [`Self::guess_language_from_contents`], keeping the diagnostics.
    pub fn guess_with_events(&self, head: &str, tail: &str) -> ContentGuess {
        self.sniffer.guess(&self.catalog.load(), head, tail)
    }

    /// Parallel `(patterns, languages)` lists, sorted by pattern.
    pub fn get_file_associations(&self) -> (Vec<String>, Vec<String>) {
        self.associations().associations().into_iter().unzip()
    }

    /// Replace the whole association set.
    ///
    /// The new set is diffed against the factory snapshot; the diff becomes the
    /// active diff list and is returned for the host to persist.
    pub fn save_file_associations(
        &self,
        patterns: &[String],
        languages: &[String],
    ) -> SnifferResult<Vec<DiffEntry>> {
        if patterns.len() != languages.len() {
            return Err(SnifferError::config(format!(
                "{} patterns but {} languages",
                patterns.len(),
                languages.len()
            )));
        }
        let current: Vec<(String, String)> = patterns
            .iter()
            .cloned()
            .zip(languages.iter().cloned())
            .collect();

        let entries: Vec<DiffEntry> = self
            .associations()
            .compute_diff(&current)
            .iter()
            .map(|change| change.to_entry())
            .collect();
        debug!("saving {} file association changes", entries.len());
        self.associations.set_diffs(entries.clone());
        Ok(entries)
    }

    /// Replace the user diff list; tables rebuild on the next lookup.
    pub fn set_association_diffs(&self, diffs: Vec<DiffEntry>) {
        self.associations.set_diffs(diffs);
    }

    pub fn association_diffs(&self) -> Vec<DiffEntry> {
        self.associations.diffs()
    }

    pub fn rebuild_associations(&self) {
        self.associations.rebuild(&self.catalog.load());
    }

    /// Patterns currently mapped to `language`, sorted.
    pub fn patterns_for_language(&self, language: &str) -> Vec<String> {
        self.associations().patterns_for_language(language)
    }
}

fn apply_status(
    mut definition: LanguageDefinition,
    status: &BTreeMap<String, bool>,
) -> LanguageDefinition {
    if let Some(primary) = status.get(&definition.name) {
        definition.primary = *primary;
    }
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionSettings;
    use crate::language::NoSignature;
    use std::collections::BTreeMap;

    fn factory(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(p, l)| (p.to_string(), l.to_string()))
            .collect()
    }

    fn small_resolver() -> LanguageResolver {
        let mut catalog = LanguageCatalog::default();
        catalog
            .register(LanguageDefinition::new("Text").with_default_extension(".txt"))
            .unwrap();
        catalog
            .register(
                LanguageDefinition::new("Perl")
                    .with_default_extension(".pl")
                    .with_shebang_patterns([r"(?im)#!.*perl.*$"])
                    .unwrap(),
            )
            .unwrap();
        catalog.register(LanguageDefinition::new("HTML")).unwrap();

        LanguageResolver::new(
            catalog,
            AssociationIndex::new(factory(&[("*.html", "HTML")]), Vec::new()),
            ContentSniffer::new(DetectionSettings::default(), Arc::new(NoSignature)),
        )
    }

    #[test]
    fn suggest_uses_factory_and_fallback_extensions() {
        let resolver = small_resolver();
        assert_eq!(resolver.suggest_language_for_file("index.html"), "HTML");
        assert_eq!(resolver.suggest_language_for_file("script.pl"), "Perl");
        assert_eq!(resolver.suggest_language_for_file("unknown.xyz"), "");
    }

    #[test]
    fn registering_a_language_adds_its_extension() {
        let resolver = small_resolver();
        assert_eq!(resolver.suggest_language_for_file("main.nim"), "");

        resolver
            .register_language(LanguageDefinition::new("Nim").with_default_extension(".nim"))
            .unwrap();

        assert_eq!(resolver.suggest_language_for_file("main.nim"), "Nim");
        assert!(resolver.get_language_names().contains(&"Nim".to_string()));
    }

    #[test]
    fn duplicate_registration_changes_nothing() {
        let resolver = small_resolver();
        let before = resolver.get_language_names();

        let err = resolver
            .register_language(LanguageDefinition::new("Perl").with_default_extension(".perl"))
            .unwrap_err();

        assert!(matches!(err, SnifferError::DuplicateLanguage { .. }));
        assert_eq!(resolver.get_language_names(), before);
        assert_eq!(resolver.suggest_language_for_file("x.perl"), "");
    }

    #[test]
    fn save_returns_diff_and_applies_it() {
        let resolver = small_resolver();
        let (mut patterns, mut languages) = resolver.get_file_associations();
        assert_eq!(patterns, vec!["*.html", "*.pl", "*.txt"]);

        patterns.push("*.inc".to_string());
        languages.push("Perl".to_string());
        let pos = patterns.iter().position(|p| p == "*.txt").unwrap();
        patterns.remove(pos);
        languages.remove(pos);

        let diffs = resolver.save_file_associations(&patterns, &languages).unwrap();

        assert_eq!(
            diffs,
            vec![
                DiffEntry::new("+", "*.inc", "Perl"),
                DiffEntry::new("-", "*.txt", "Text"),
            ]
        );
        assert_eq!(resolver.association_diffs(), diffs);
        assert_eq!(resolver.suggest_language_for_file("config.inc"), "Perl");
        assert_eq!(resolver.suggest_language_for_file("notes.txt"), "");
    }

    #[test]
    fn save_rejects_mismatched_lists() {
        let resolver = small_resolver();
        let err = resolver
            .save_file_associations(&["*.x".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, SnifferError::Config { .. }));
    }

    #[test]
    fn setting_diffs_takes_effect_on_next_lookup() {
        let resolver = small_resolver();
        resolver.set_association_diffs(vec![DiffEntry::new("-", "*.html", "HTML")]);
        assert_eq!(resolver.suggest_language_for_file("index.html"), "");

        resolver.set_association_diffs(Vec::new());
        assert_eq!(resolver.suggest_language_for_file("index.html"), "HTML");
    }

    #[test]
    fn change_status_publishes_new_hierarchy() {
        let resolver = small_resolver();
        assert!(resolver.language_hierarchy().primary.is_empty());

        resolver.change_language_status("Perl", true).unwrap();
        let hierarchy = resolver.language_hierarchy();
        assert_eq!(hierarchy.primary.len(), 1);
        assert_eq!(hierarchy.primary[0].name, "Perl");

        assert!(matches!(
            resolver.change_language_status("Cobol", true),
            Err(SnifferError::UnknownLanguage { .. })
        ));
    }

    #[test]
    fn get_language_falls_back_to_default() {
        let resolver = small_resolver();
        assert_eq!(resolver.get_language("").unwrap().name, "Text");
        assert_eq!(resolver.get_language("Cobol").unwrap().name, "Text");
        assert_eq!(resolver.get_language("Perl").unwrap().name, "Perl");
    }

    #[test]
    fn from_settings_skips_bad_languages_and_applies_status() {
        let mut settings = SnifferSettings::from_toml_str(
            r#"
            include_builtin_languages = false

            [language_status]
            Nim = true

            [[languages]]
            name = "Nim"
            default_extension = ".nim"

            [[languages]]
            name = "Broken"
            shebang_patterns = ["(unclosed"]

            [[languages]]
            name = "nim-dup"
            "#,
        )
        .unwrap();
        settings.languages[2].name = "Nim".to_string();

        let resolver = LanguageResolver::from_settings(&settings, Arc::new(NoSignature));

        assert_eq!(resolver.get_language_names(), vec!["Nim"]);
        assert!(resolver.catalog().is_primary("Nim"));
        assert_eq!(resolver.suggest_language_for_file("a.nim"), "Nim");
    }

    #[test]
    fn guess_reads_the_published_catalog() {
        let resolver = small_resolver();
        assert_eq!(resolver.guess_language_from_contents("#!/bin/perl", ""), vec!["Perl"]);
        assert!(resolver.guess_language_from_contents("#!/bin/erl", "").is_empty());
    }
}
