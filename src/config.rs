pub mod defaults;
pub mod settings;
pub mod user;

pub use defaults::{builtin_languages, default_factory_associations};
pub use settings::{DetectionSettings, SnifferSettings};
pub use user::{load_config_file, load_user_config, save_config_file, user_config_path};

use crate::language::LanguageSpec;
use std::collections::BTreeMap;

/// Merge multiple SnifferSettings layers in order.
/// Later configs in the slice have higher precedence (override earlier ones).
/// Use this for layered config: `merge_all(&[user, explicit_file])`
pub fn merge_all(configs: &[Option<SnifferSettings>]) -> Option<SnifferSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two SnifferSettings, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<SnifferSettings>,
    primary: Option<SnifferSettings>,
) -> Option<SnifferSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => {
            let merged = SnifferSettings {
                default_language: primary.default_language.or(fallback.default_language),
                detection: primary.detection.or(fallback.detection),
                include_builtin_languages: primary
                    .include_builtin_languages
                    .or(fallback.include_builtin_languages),
                factory_associations: primary
                    .factory_associations
                    .or(fallback.factory_associations),

                // Diffs replay in order, so the primary layer's changes land last
                association_diffs: fallback
                    .association_diffs
                    .into_iter()
                    .chain(primary.association_diffs)
                    .collect(),

                language_status: merge_status(fallback.language_status, primary.language_status),
                languages: merge_languages(fallback.languages, primary.languages),
            };
            Some(merged)
        }
    }
}

fn merge_status(
    mut fallback: BTreeMap<String, bool>,
    primary: BTreeMap<String, bool>,
) -> BTreeMap<String, bool> {
    fallback.extend(primary);
    fallback
}

fn merge_languages(mut fallback: Vec<LanguageSpec>, primary: Vec<LanguageSpec>) -> Vec<LanguageSpec> {
    // Same name (case-insensitive): primary replaces in place
    for spec in primary {
        match fallback
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&spec.name))
        {
            Some(existing) => *existing = spec,
            None => fallback.push(spec),
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::DiffEntry;

    fn language(name: &str, extension: &str) -> LanguageSpec {
        LanguageSpec {
            name: name.to_string(),
            default_extension: Some(extension.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_settings_with_none() {
        assert!(merge_settings(None, None).is_none());
    }

    #[test]
    fn test_merge_settings_single_side() {
        let settings = SnifferSettings {
            default_language: Some("Plain".to_string()),
            ..Default::default()
        };
        assert_eq!(
            merge_settings(Some(settings.clone()), None),
            Some(settings.clone())
        );
        assert_eq!(merge_settings(None, Some(settings.clone())), Some(settings));
    }

    #[test]
    fn test_merge_settings_prefer_primary() {
        let fallback = SnifferSettings {
            default_language: Some("Plain".to_string()),
            include_builtin_languages: Some(false),
            languages: vec![language("Nim", ".nim"), language("Zig", ".zig")],
            ..Default::default()
        };
        let primary = SnifferSettings {
            default_language: Some("Text".to_string()),
            languages: vec![language("nim", ".nims")],
            ..Default::default()
        };

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();

        assert_eq!(merged.default_language(), "Text");
        // Unset in primary, kept from fallback
        assert!(!merged.include_builtin_languages());
        assert_eq!(merged.languages.len(), 2);
        assert_eq!(merged.languages[0].name, "nim");
        assert_eq!(merged.languages[0].default_extension.as_deref(), Some(".nims"));
        assert_eq!(merged.languages[1].name, "Zig");
    }

    #[test]
    fn test_merge_diffs_and_status() {
        let mut fallback = SnifferSettings {
            association_diffs: vec![DiffEntry::new("+", "*.inc", "PHP")],
            ..Default::default()
        };
        fallback.language_status.insert("Tcl".to_string(), true);
        fallback.language_status.insert("Perl".to_string(), true);

        let mut primary = SnifferSettings {
            association_diffs: vec![DiffEntry::new("-", "*.inc", "PHP")],
            ..Default::default()
        };
        primary.language_status.insert("Perl".to_string(), false);

        let merged = merge_all(&[Some(fallback), None, Some(primary)]).unwrap();

        assert_eq!(
            merged.association_diffs,
            vec![
                DiffEntry::new("+", "*.inc", "PHP"),
                DiffEntry::new("-", "*.inc", "PHP"),
            ]
        );
        assert_eq!(merged.language_status["Tcl"], true);
        assert_eq!(merged.language_status["Perl"], false);
    }
}
