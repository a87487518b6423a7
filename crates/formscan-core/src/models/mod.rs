//! Data models: field vocabulary, records, configuration.

pub mod config;
pub mod record;
pub mod vocab;

pub use config::{ExtractionConfig, FormscanConfig, LanguageHint, ModelConfig, OcrConfig};
pub use record::{Extraction, FieldValue, Record, RuleKind, StrategyKind};
pub use vocab::Field;
