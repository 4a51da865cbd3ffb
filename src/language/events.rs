use crate::error::SnifferError;

/// Category attached to every status message from the engine
pub const STATUS_CATEGORY: &str = "language_registry";

/// How long a host should show a status message, in milliseconds
pub const DEFAULT_STATUS_TIMEOUT_MS: u32 = 3000;

/// Events emitted while guessing a document's language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageEvent {
    /// A short message for the host's status bar
    Status {
        level: LanguageLogLevel,
        message: String,
        timeout_ms: u32,
    },
}

impl LanguageEvent {
    pub fn status(level: LanguageLogLevel, message: impl Into<String>) -> Self {
        Self::Status {
            level,
            message: message.into(),
            timeout_ms: DEFAULT_STATUS_TIMEOUT_MS,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. } => message,
        }
    }

    /// Forward the event to the `log` facade.
    pub fn log(&self) {
        match self {
            Self::Status { level, message, .. } => match level {
                LanguageLogLevel::Error => log::error!(target: STATUS_CATEGORY, "{}", message),
                LanguageLogLevel::Warning => log::warn!(target: STATUS_CATEGORY, "{}", message),
                LanguageLogLevel::Info => log::info!(target: STATUS_CATEGORY, "{}", message),
            },
        }
    }
}

impl From<&SnifferError> for LanguageEvent {
    fn from(error: &SnifferError) -> Self {
        LanguageEvent::status(LanguageLogLevel::Warning, error.to_string())
    }
}

/// Log levels abstracted from any particular host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageLogLevel {
    Error,
    Warning,
    Info,
}

/// Result of guessing a document's language from its contents
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentGuess {
    /// Candidate languages, most likely first. Empty means undetermined.
    pub languages: Vec<String>,
    pub events: Vec<LanguageEvent>,
}

impl ContentGuess {
    pub fn push_event(&mut self, event: LanguageEvent) {
        self.events.push(event);
    }

    pub fn report(&mut self, error: &SnifferError) {
        self.push_event(LanguageEvent::from(error));
    }

    pub fn is_undetermined(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_become_warning_status_messages() {
        let mut guess = ContentGuess::default();
        guess.report(&SnifferError::local_variables("malformed -*- line"));

        assert_eq!(
            guess.events,
            vec![LanguageEvent::Status {
                level: LanguageLogLevel::Warning,
                message: "local variables error: malformed -*- line".to_string(),
                timeout_ms: DEFAULT_STATUS_TIMEOUT_MS,
            }]
        );
        assert!(guess.is_undetermined());
    }
}
