//! Field disambiguation: turns classifier candidates into a record under
//! the first-match-wins policy.

use tracing::debug;

use crate::models::{ExtractionConfig, Field, FieldValue, Record, RuleKind};

use super::classify::{Candidate, Detection, LineContext};

/// Assignment order for bare YES/NO lines. Positional guessing: the text
/// carries no field identity, so encounter order maps onto this fixed
/// priority.
pub const BOOLEAN_FIELDS: [Field; 3] = [Field::Alcoholic, Field::Diabetic, Field::Smoker];

/// Accumulator for one in-progress record.
///
/// The builder is threaded through a single pass over a segment's lines;
/// all conflict policy lives here, the classifier stays stateless.
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
    warnings: Vec<String>,
}

impl RecordBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            record: Record::new(id),
            warnings: Vec::new(),
        }
    }

    /// Whether a field already has a value.
    pub fn contains(&self, field: Field) -> bool {
        self.record.fields.contains_key(&field)
    }

    /// Snapshot of the state the guarded classifier rules need.
    pub fn context(&self, config: &ExtractionConfig) -> LineContext {
        LineContext {
            cost_claimed: self.contains(Field::Cost),
            height_claimed: self.contains(Field::Height),
            weight_claimed: self.contains(Field::Weight),
            date_max_line_len: config.date_max_line_len,
        }
    }

    /// Apply one classifier candidate. Pending headers are consumed by the
    /// scanner, not here.
    pub fn apply(&mut self, candidate: Candidate) {
        match candidate.detection {
            Detection::Fields(pairs) => {
                self.apply_fields(candidate.rule, candidate.confidence, pairs)
            }
            Detection::BareBoolean(value) => self.apply_bare_boolean(value),
            Detection::PendingHeader(field) => {
                debug_assert!(false, "pending header for {field} reached the builder");
            }
        }
    }

    /// Assign a value line consumed for a pending header.
    pub fn assign_header_value(&mut self, field: Field, value: &str) {
        self.insert_if_absent(field, FieldValue::new(value, RuleKind::Header, 0.9));
    }

    fn apply_fields(&mut self, rule: RuleKind, confidence: f32, pairs: Vec<(Field, String)>) {
        if pairs.len() > 1 {
            // Multi-field matches are atomic: all sub-fields or none.
            if let Some((taken, _)) = pairs.iter().find(|(f, _)| self.contains(*f)) {
                self.warnings.push(format!(
                    "record {}: {:?} match discarded, {} already populated",
                    self.record.id, rule, taken
                ));
                return;
            }
        }

        for (field, value) in pairs {
            self.insert_if_absent(field, FieldValue::new(value, rule, confidence));
        }
    }

    fn apply_bare_boolean(&mut self, value: String) {
        let Some(field) = BOOLEAN_FIELDS.iter().copied().find(|f| !self.contains(*f)) else {
            self.warnings.push(format!(
                "record {}: bare {} discarded, boolean fields exhausted",
                self.record.id, value
            ));
            return;
        };

        self.insert_if_absent(field, FieldValue::new(value, RuleKind::BareBoolean, 0.3));
    }

    fn insert_if_absent(&mut self, field: Field, value: FieldValue) {
        if self.contains(field) {
            // First-match-wins: earlier evidence is trusted over later.
            debug!(record = self.record.id, %field, "dropping later candidate");
            return;
        }
        self.record.fields.insert(field, value);
    }

    /// Finalize the record.
    pub fn finish(self) -> (Record, Vec<String>) {
        (self.record, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(field: Field, value: &str) -> Candidate {
        Candidate {
            rule: RuleKind::Header,
            confidence: 0.9,
            detection: Detection::Fields(vec![(field, value.to_string())]),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut builder = RecordBuilder::new(1);
        builder.apply(single(Field::CustomerName, "A M Bibbs"));
        builder.apply(single(Field::CustomerName, "someone else"));

        let (record, _) = builder.finish();
        assert_eq!(record.value(Field::CustomerName), Some("A M Bibbs"));
    }

    #[test]
    fn test_bare_boolean_round_robin() {
        let mut builder = RecordBuilder::new(1);
        for value in ["YES", "NO", "YES"] {
            builder.apply(Candidate {
                rule: RuleKind::BareBoolean,
                confidence: 0.3,
                detection: Detection::BareBoolean(value.to_string()),
            });
        }

        let (record, warnings) = builder.finish();
        assert_eq!(record.value(Field::Alcoholic), Some("YES"));
        assert_eq!(record.value(Field::Diabetic), Some("NO"));
        assert_eq!(record.value(Field::Smoker), Some("YES"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bare_boolean_skips_populated_fields() {
        let mut builder = RecordBuilder::new(1);
        builder.apply(single(Field::Alcoholic, "NO"));
        builder.apply(Candidate {
            rule: RuleKind::BareBoolean,
            confidence: 0.3,
            detection: Detection::BareBoolean("YES".to_string()),
        });

        let (record, _) = builder.finish();
        assert_eq!(record.value(Field::Alcoholic), Some("NO"));
        assert_eq!(record.value(Field::Diabetic), Some("YES"));
    }

    #[test]
    fn test_bare_boolean_exhaustion_warns() {
        let mut builder = RecordBuilder::new(7);
        for value in ["YES", "NO", "YES", "NO"] {
            builder.apply(Candidate {
                rule: RuleKind::BareBoolean,
                confidence: 0.3,
                detection: Detection::BareBoolean(value.to_string()),
            });
        }

        let (record, warnings) = builder.finish();
        assert_eq!(record.fields.len(), 3);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("record 7"));
    }

    #[test]
    fn test_multi_field_match_is_atomic() {
        let mut builder = RecordBuilder::new(1);
        builder.apply(single(Field::State1, "CA"));
        builder.apply(Candidate {
            rule: RuleKind::CityStateZip,
            confidence: 0.85,
            detection: Detection::Fields(vec![
                (Field::City1, "Sacramento".to_string()),
                (Field::State1, "NY".to_string()),
                (Field::Zip1, "74751".to_string()),
            ]),
        });

        let (record, warnings) = builder.finish();
        // Nothing from the unit was applied, not even the free fields.
        assert_eq!(record.value(Field::City1), None);
        assert_eq!(record.value(Field::Zip1), None);
        assert_eq!(record.value(Field::State1), Some("CA"));
        assert_eq!(warnings.len(), 1);
    }
}
