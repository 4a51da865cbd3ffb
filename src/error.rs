//! Error handling types for language-sniffer
//!
//! Registration and configuration loading report errors to the caller.
//! Detection paths never do: their failures degrade to an empty guess plus a
//! diagnostic event (see `language::events`).

use std::sync::PoisonError;
use thiserror::Error;

/// Comprehensive error type for catalog, association and detection operations
#[derive(Debug, Error)]
pub enum SnifferError {
    /// A language with the same name is already registered
    #[error("Language '{name}' already registered")]
    DuplicateLanguage { name: String },

    /// Lookup of a language name that is not registered
    #[error("Unknown language: {name}")]
    UnknownLanguage { name: String },

    /// A file association diff entry could not be understood
    #[error("Invalid file association entry ({action:?}, {pattern:?}, {language:?}): {reason}")]
    AssociationParse {
        action: String,
        pattern: String,
        language: String,
        reason: String,
    },

    /// Malformed Emacs-style local variables
    #[error("local variables error: {message}")]
    LocalVariableParse { message: String },

    /// More than one language claims the shebang line
    #[error("language determination error: ambiguous shebang (#!) line: indicates all of '{}'", .languages.join("', '"))]
    AmbiguousShebang { languages: Vec<String> },

    /// A shebang pattern failed to compile at registration time
    #[error("Invalid shebang pattern for language '{language}': {source}")]
    InvalidShebangPattern {
        language: String,
        #[source]
        source: regex::Error,
    },

    /// The markup collaborator could not produce a document signature
    #[error("Document signature unavailable: {message}")]
    Signature { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sniffer operations
pub type SnifferResult<T> = Result<T, SnifferError>;

/// Helper trait to recover a guard from a poisoned lock
pub trait LockResultExt<T> {
    /// Recover from a poisoned lock, logging which operation hit it.
    ///
    /// Writers only publish fully built snapshots, so the data behind a
    /// poisoned writer lock is still consistent.
    fn recover_poison(self, context: &str) -> T;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> T {
        match self {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!(
                    target: "language_sniffer::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                poisoned.into_inner()
            }
        }
    }
}

/// Helper functions for common error patterns
impl SnifferError {
    pub fn duplicate_language(name: impl Into<String>) -> Self {
        SnifferError::DuplicateLanguage { name: name.into() }
    }

    pub fn unknown_language(name: impl Into<String>) -> Self {
        SnifferError::UnknownLanguage { name: name.into() }
    }

    pub fn association_parse(
        action: impl Into<String>,
        pattern: impl Into<String>,
        language: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SnifferError::AssociationParse {
            action: action.into(),
            pattern: pattern.into(),
            language: language.into(),
            reason: reason.into(),
        }
    }

    pub fn local_variables(message: impl Into<String>) -> Self {
        SnifferError::LocalVariableParse {
            message: message.into(),
        }
    }

    pub fn ambiguous_shebang(languages: Vec<String>) -> Self {
        SnifferError::AmbiguousShebang { languages }
    }

    pub fn signature(message: impl Into<String>) -> Self {
        SnifferError::Signature {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SnifferError::Config {
            message: message.into(),
        }
    }
}
