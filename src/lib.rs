pub mod config;
pub mod error;
pub mod language;

pub use config::{DetectionSettings, SnifferSettings};
pub use error::{SnifferError, SnifferResult};
pub use language::{
    ContentGuess, DiffEntry, LanguageDefinition, LanguageEvent, LanguageHierarchy,
    LanguageResolver, SignatureProvider,
};
