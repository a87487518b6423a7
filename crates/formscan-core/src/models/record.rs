//! Record data model produced by the parser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vocab::Field;

/// The detection rule that produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Email token shape.
    Email,
    /// Numeric date token or month name.
    Date,
    /// `$`-prefixed amount with keyword resolution.
    Currency,
    /// Explicit vocabulary header mention.
    Header,
    /// "male"/"female" token.
    Gender,
    /// Bare YES/NO line, assigned positionally.
    BareBoolean,
    /// Street-suffix address heuristic.
    Address,
    /// `<city>, <state> <zip>` line.
    CityStateZip,
    /// Consecutive 2-3 digit number pair.
    HeightWeight,
    /// Blood type token.
    BloodGroup,
    /// Known drug name on the line.
    Medication,
    /// Known payment brand on the line.
    PaymentBrand,
}

/// An extracted value together with how it was found.
///
/// The confidence score is the ambiguity marker for heuristics that guess:
/// positionally assigned booleans and unlabeled date lines score low, exact
/// token shapes score high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The extracted string, verbatim from the source text.
    pub value: String,

    /// Detection rule that produced the value.
    pub rule: RuleKind,

    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl FieldValue {
    pub fn new(value: impl Into<String>, rule: RuleKind, confidence: f32) -> Self {
        Self {
            value: value.into(),
            rule,
            confidence,
        }
    }
}

/// One extracted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier. Literal in-document number under the numbered
    /// segmentation strategy, sequential from 1 otherwise.
    pub id: u32,

    /// Field mapping. Absent keys render as "not found".
    pub fields: BTreeMap<Field, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Get a field's extracted string, if present.
    pub fn value(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(|v| v.value.as_str())
    }

    /// Whether the record has no extracted fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose confidence falls below `threshold`.
    pub fn low_confidence_fields(&self, threshold: f32) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|(_, v)| v.confidence < threshold)
            .map(|(f, _)| *f)
            .collect()
    }
}

/// Segmentation strategy that produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Explicit `<n> ...` record markers.
    Numbered,
    /// `---`/`===` separator lines.
    Separator,
    /// Email-anchored segmentation.
    Anchor,
    /// Everything merged into one record.
    SingleRecord,
}

/// Result of one parser invocation.
///
/// The parser holds no state across invocations; this value is the entire
/// output of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted records, in boundary-detection order.
    pub records: Vec<Record>,

    /// Strategy that segmented the document. `None` when the input had no
    /// non-blank lines.
    pub strategy: Option<StrategyKind>,

    /// Number of non-blank input lines.
    pub line_count: usize,

    /// Extraction warnings.
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl Extraction {
    /// An extraction over empty input.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            strategy: None,
            line_count: 0,
            warnings: Vec::new(),
            processing_time_ms: 0,
        }
    }

    /// Whether any record carries at least one field.
    pub fn has_data(&self) -> bool {
        self.records.iter().any(|r| !r.is_empty())
    }
}
