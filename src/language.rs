pub mod associations;
pub mod catalog;
pub mod definition;
pub mod events;
pub mod folded;
pub mod local_vars;
pub mod markup;
pub mod resolver;
pub mod shebang;
pub mod sniffer;

pub use associations::{
    AssociationChange, AssociationDiff, AssociationIndex, AssociationTables, DiffEntry, DiffOp,
    FactorySnapshot,
};
pub use catalog::{DEFAULT_LANGUAGE, LanguageCatalog, LanguageHierarchy, LanguageItem};
pub use definition::{LanguageDefinition, LanguageSpec, ShebangPattern};
pub use events::{ContentGuess, LanguageEvent, LanguageLogLevel};
pub use folded::FoldedMap;
pub use local_vars::{LocalVariableMap, parse_local_variables};
pub use markup::{Doctype, DocumentSignature, NoSignature, PrologScanner, SignatureProvider};
pub use resolver::LanguageResolver;
pub use shebang::{ShebangMatch, detect_from_shebang};
pub use sniffer::ContentSniffer;
