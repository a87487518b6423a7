//! Error types for the formscan-core library.

use thiserror::Error;

/// Main error type for the formscan library.
#[derive(Error, Debug)]
pub enum FormscanError {
    /// OCR acquisition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR text acquisition.
///
/// Acquisition is the only step of the pipeline that can fail hard: the
/// parser downstream of it is total over arbitrary text.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to the CSV export boundary.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization/deserialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The produced bytes were not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A row did not match the vocabulary header.
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// I/O error while writing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the formscan library.
pub type Result<T> = std::result::Result<T, FormscanError>;
