//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the formscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// Language hint passed to the OCR adapter. Fixed to English for the
/// documents this pipeline handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageHint {
    English,
}

impl Default for LanguageHint {
    fn default() -> Self {
        Self::English
    }
}

/// OCR adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language hint for recognition.
    pub language: LanguageHint,

    /// Minimum recognition confidence for keeping a text region.
    pub min_confidence: f32,

    /// Keep `[UNK]` placeholder tokens in recognized text.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: LanguageHint::English,
            min_confidence: 0.0, // CTC confidence scores are inherently low
            keep_unk: false,
        }
    }
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum line length for the unlabeled date rule. Longer lines are
    /// treated as prose even when they contain a date-like token.
    pub date_max_line_len: usize,

    /// Confidence below which a field is reported as low-confidence.
    pub low_confidence_threshold: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_max_line_len: 30,
            low_confidence_threshold: 0.5,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl FormscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Get the full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormscanConfig::default();
        assert_eq!(config.extraction.date_max_line_len, 30);
        assert_eq!(config.ocr.language, LanguageHint::English);
        assert_eq!(config.models.detection_model, "det.onnx");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: FormscanConfig =
            serde_json::from_str(r#"{"extraction": {"date_max_line_len": 40}}"#).unwrap();
        assert_eq!(config.extraction.date_max_line_len, 40);
        assert_eq!(config.extraction.low_confidence_threshold, 0.5);
    }
}
