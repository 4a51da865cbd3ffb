use crate::error::{SnifferError, SnifferResult};
use crate::language::{DiffEntry, LanguageSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Switches for the individual content detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Emacs-style `-*- mode: ... -*-` and `Local Variables:` blocks
    pub local_variables: bool,
    /// `<?xml` declarations, namespaces and DOCTYPEs
    pub xml_declaration: bool,
    /// `#!` interpreter lines
    pub shebang: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            local_variables: true,
            xml_declaration: true,
            shebang: true,
        }
    }
}

/// Top-level configuration.
///
/// ```toml
/// default_language = "Text"
/// association_diffs = [["+", "*.inc", "PHP"], ["-", "*.t", "Perl"]]
///
/// [detection]
/// shebang = false
///
/// [language_status]
/// Tcl = true
///
/// [[languages]]
/// name = "Nim"
/// default_extension = ".nim"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnifferSettings {
    /// Language returned for empty or unknown lookups (default `Text`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionSettings>,
    /// Register the built-in language table before `languages` (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_builtin_languages: Option<bool>,
    /// Factory `pattern -> language` table; the built-in table when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_associations: Option<BTreeMap<String, String>>,
    /// User changes relative to the factory associations, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub association_diffs: Vec<DiffEntry>,
    /// Per-language override of the `primary` flag
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub language_status: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageSpec>,
}

impl SnifferSettings {
    pub fn from_toml_str(text: &str) -> SnifferResult<Self> {
        toml::from_str(text).map_err(|e| SnifferError::config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SnifferResult<String> {
        toml::to_string(self).map_err(|e| SnifferError::config(e.to_string()))
    }

    pub fn default_language(&self) -> &str {
        self.default_language
            .as_deref()
            .unwrap_or(crate::language::DEFAULT_LANGUAGE)
    }

    pub fn detection(&self) -> DetectionSettings {
        self.detection.unwrap_or_default()
    }

    pub fn include_builtin_languages(&self) -> bool {
        self.include_builtin_languages.unwrap_or(true)
    }

    pub fn factory_associations(&self) -> BTreeMap<String, String> {
        self.factory_associations
            .clone()
            .unwrap_or_else(super::defaults::default_factory_associations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = SnifferSettings::from_toml_str("").unwrap();
        assert_eq!(settings.default_language(), "Text");
        assert_eq!(settings.detection(), DetectionSettings::default());
        assert!(settings.include_builtin_languages());
        assert!(settings.factory_associations().contains_key("*.py"));
    }

    #[test]
    fn association_diffs_are_typed_triples() {
        let settings = SnifferSettings::from_toml_str(
            r#"association_diffs = [["+", "*.inc", "PHP"], ["-", "*.t", "Perl"]]"#,
        )
        .unwrap();
        assert_eq!(
            settings.association_diffs,
            vec![
                DiffEntry::new("+", "*.inc", "PHP"),
                DiffEntry::new("-", "*.t", "Perl"),
            ]
        );
    }

    #[test]
    fn malformed_diff_shape_is_rejected() {
        let err = SnifferSettings::from_toml_str(r#"association_diffs = [["+", "*.inc"]]"#)
            .unwrap_err();
        assert!(matches!(err, SnifferError::Config { .. }));
    }

    #[test]
    fn partial_detection_table_keeps_other_switches_on() {
        let settings = SnifferSettings::from_toml_str("[detection]\nshebang = false\n").unwrap();
        assert_eq!(
            settings.detection(),
            DetectionSettings {
                local_variables: true,
                xml_declaration: true,
                shebang: false,
            }
        );
    }

    #[test]
    fn settings_survive_a_toml_round_trip() {
        let mut settings = SnifferSettings {
            default_language: Some("Plain".to_string()),
            association_diffs: vec![DiffEntry::new("+", "*.inc", "PHP")],
            ..Default::default()
        };
        settings.language_status.insert("Tcl".to_string(), true);

        let text = settings.to_toml_string().unwrap();
        assert_eq!(SnifferSettings::from_toml_str(&text).unwrap(), settings);
    }
}
