//! OCR adapter boundary.
//!
//! The parser consumes a single newline-delimited text string; everything
//! about how that string is produced lives behind [`OcrAdapter`]. Any
//! adapter failure is terminal for the run and is never retried here; the
//! caller's only recovery path is supplying a new image.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::LanguageHint;

/// Maps an image to a full-document transcription.
pub trait OcrAdapter {
    /// Recognize all text in the image, returned as one newline-delimited
    /// string in reading order.
    fn recognize(
        &self,
        image: &DynamicImage,
        language: LanguageHint,
    ) -> Result<String, OcrError>;
}
