//! Core library for intake form OCR processing.
//!
//! This crate provides:
//! - The OCR adapter boundary (image in, full-document text out)
//! - Heuristic record parsing over line-oriented OCR text (segmentation,
//!   line classification, field disambiguation)
//! - The fixed field vocabulary and record data model
//! - CSV export of extracted records

pub mod error;
pub mod export;
pub mod models;
pub mod ocr;
pub mod parser;

pub use error::{ExportError, FormscanError, OcrError, Result};
pub use export::{EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE};
pub use models::{
    Extraction, Field, FieldValue, FormscanConfig, LanguageHint, Record, RuleKind, StrategyKind,
};
pub use ocr::OcrAdapter;
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use parser::{HeuristicParser, RecordParser};
