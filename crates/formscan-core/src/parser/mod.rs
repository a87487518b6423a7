//! Heuristic record parser: raw OCR text in, ordered record sequence out.
//!
//! The parser is a pure, synchronous computation. It never fails: malformed
//! or unexpected text degrades to a best-effort record sequence, possibly
//! empty. Only the OCR acquisition step upstream can fail hard.

pub mod classify;
pub mod disambiguate;
pub mod patterns;
pub mod segment;

pub use classify::{Candidate, Detection, LineContext, classify_line};
pub use disambiguate::{BOOLEAN_FIELDS, RecordBuilder};
pub use segment::{BoundaryStrategy, Segment};

use std::time::Instant;

use tracing::{debug, info};

use crate::models::{Extraction, ExtractionConfig, Field, Record, StrategyKind};

/// Trait for record parsing.
pub trait RecordParser {
    /// Parse raw text into an extraction. Total over all inputs.
    fn parse(&self, text: &str) -> Extraction;
}

/// Rule-based parser over line-oriented OCR text.
pub struct HeuristicParser {
    config: ExtractionConfig,
}

impl HeuristicParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Create a parser with explicit extraction settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Classify one segment's lines into a record.
    fn scan_segment(&self, id: u32, lines: &[String], warnings: &mut Vec<String>) -> Record {
        let mut builder = RecordBuilder::new(id);
        let mut pending: Option<Field> = None;

        for line in lines {
            // A pending header owns the next line wholesale; it is not
            // classified on its own.
            if let Some(field) = pending.take() {
                builder.assign_header_value(field, line);
                continue;
            }

            let ctx = builder.context(&self.config);
            for candidate in classify_line(line, &ctx) {
                if let Detection::PendingHeader(field) = &candidate.detection {
                    pending = Some(*field);
                } else {
                    builder.apply(candidate);
                }
            }
        }

        if let Some(field) = pending {
            warnings.push(format!("record {id}: header {} had no value line", field.name()));
        }

        let (record, mut segment_warnings) = builder.finish();
        warnings.append(&mut segment_warnings);
        record
    }
}

impl Default for HeuristicParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser for HeuristicParser {
    fn parse(&self, text: &str) -> Extraction {
        let start = Instant::now();

        let lines = normalize_lines(text);
        if lines.is_empty() {
            debug!("no non-blank lines in input");
            return Extraction::empty();
        }

        info!("parsing {} lines", lines.len());

        let mut warnings = Vec::new();
        let mut chosen: Option<(StrategyKind, Vec<Record>)> = None;

        for strategy in segment::strategies() {
            let Some(segments) = strategy.segment(&lines) else {
                continue;
            };

            let mut next_id = 1u32;
            let mut records: Vec<Record> = segments
                .iter()
                .map(|seg| {
                    let id = seg.id.unwrap_or_else(|| {
                        let id = next_id;
                        next_id += 1;
                        id
                    });
                    self.scan_segment(id, &seg.lines, &mut warnings)
                })
                .collect();

            // Separator-delimited blocks with nothing classifiable are not
            // records; dropping them all sends us to the next strategy.
            if strategy.kind() == StrategyKind::Separator {
                records.retain(|r| !r.is_empty());
            }

            if !records.is_empty() {
                debug!(strategy = ?strategy.kind(), records = records.len(), "strategy selected");
                chosen = Some((strategy.kind(), records));
                break;
            }
        }

        let (strategy, records) = chosen.unwrap_or_else(|| {
            debug!("no boundary signal, merging into a single record");
            let record = self.scan_segment(1, &lines, &mut warnings);
            (StrategyKind::SingleRecord, vec![record])
        });

        Extraction {
            records,
            strategy: Some(strategy),
            line_count: lines.len(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Split raw text into trimmed, non-blank lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleKind;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Extraction {
        HeuristicParser::new().parse(text)
    }

    #[test]
    fn test_explicit_numbering_scenario() {
        let extraction = parse("1 john@x.com MALE\n2 jane@y.com FEMALE\n");

        assert_eq!(extraction.strategy, Some(StrategyKind::Numbered));
        assert_eq!(extraction.records.len(), 2);

        let first = &extraction.records[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.value(Field::EmailAddress), Some("john@x.com"));
        assert_eq!(first.value(Field::Sex1), Some("MALE"));

        let second = &extraction.records[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.value(Field::EmailAddress), Some("jane@y.com"));
        assert_eq!(second.value(Field::Sex1), Some("FEMALE"));
    }

    #[test]
    fn test_strategy_priority_numbered_beats_anchor() {
        // Both numbered markers and email anchors present; ids must be the
        // literal numbers 1 and 5, not a sequential count.
        let extraction = parse("1 john@x.com\nsome note\n5 jane@y.com\n");

        assert_eq!(extraction.strategy, Some(StrategyKind::Numbered));
        let ids: Vec<u32> = extraction.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_anchor_fallback_scenario() {
        let text = "ambibbs@aol.com\n2691 S Couns Dr\nSacramento, CA 74751\n\
                    andy2922@hotmail.com\n5180 Pinu St\nhampton bays, NY 21184\n";
        let extraction = parse(text);

        assert_eq!(extraction.strategy, Some(StrategyKind::Anchor));
        assert_eq!(extraction.records.len(), 2);

        let first = &extraction.records[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.value(Field::EmailAddress), Some("ambibbs@aol.com"));
        assert_eq!(first.value(Field::ResAddress), Some("2691 S Couns Dr"));
        assert_eq!(first.value(Field::City1), Some("Sacramento"));
        assert_eq!(first.value(Field::State1), Some("CA"));
        assert_eq!(first.value(Field::Zip1), Some("74751"));

        let second = &extraction.records[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.value(Field::EmailAddress), Some("andy2922@hotmail.com"));
        assert_eq!(second.value(Field::City1), Some("hampton bays"));
    }

    #[test]
    fn test_separator_strategy() {
        let text = "HEIGHT: 183\nBLOOD GP: A+\n---\nHEIGHT: 158\nBLOOD GP: O+\n";
        let extraction = parse(text);

        assert_eq!(extraction.strategy, Some(StrategyKind::Separator));
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].id, 1);
        assert_eq!(extraction.records[0].value(Field::Height), Some("183"));
        assert_eq!(extraction.records[1].id, 2);
        assert_eq!(extraction.records[1].value(Field::BloodGp), Some("O+"));
    }

    #[test]
    fn test_bare_booleans_scenario() {
        let text = "someone@somewhere.com\nYES\nNO\nYES\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        assert_eq!(record.value(Field::Alcoholic), Some("YES"));
        assert_eq!(record.value(Field::Diabetic), Some("NO"));
        assert_eq!(record.value(Field::Smoker), Some("YES"));
    }

    #[test]
    fn test_no_signal_scenario() {
        let extraction = parse("random unrelated prose with no recognizable pattern");

        assert_eq!(extraction.strategy, Some(StrategyKind::SingleRecord));
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].id, 1);
        assert!(extraction.records[0].is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_sequence() {
        assert!(parse("").records.is_empty());
        assert!(parse("  \n\n   \n").records.is_empty());
    }

    #[test]
    fn test_non_emptiness_guarantee() {
        for text in ["x", "???", "1", "-- --"] {
            let extraction = parse(text);
            assert_eq!(extraction.records.len(), 1, "input {text:?}");
        }
    }

    #[test]
    fn test_determinism() {
        let text = "1 john@x.com MALE\nXANAX 2 MG 30\n2 jane@y.com\nTotal $250.00\n";
        let first = parse(text);
        let second = parse(text);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_pending_header_consumes_next_line() {
        let text = "someone@somewhere.com\nCUSTOMER NAME:\nA M Bibbs\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        assert_eq!(record.value(Field::CustomerName), Some("A M Bibbs"));
    }

    #[test]
    fn test_pending_header_value_is_not_classified() {
        // "183 185" would normally be a height/weight pair; consumed as a
        // header value it must not be.
        let text = "someone@somewhere.com\nREMARK:\n183 185\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        assert_eq!(record.value(Field::Remark), Some("183 185"));
        assert_eq!(record.value(Field::Height), None);
        assert_eq!(record.value(Field::Weight), None);
    }

    #[test]
    fn test_unconsumed_pending_header_warns() {
        let text = "someone@somewhere.com\nCUSTOMER NAME:\n";
        let extraction = parse(text);

        assert_eq!(extraction.records[0].value(Field::CustomerName), None);
        assert!(extraction.warnings.iter().any(|w| w.contains("CUSTOMER NAME")));
    }

    #[test]
    fn test_first_match_wins_idempotence() {
        let text = "someone@somewhere.com\nHEIGHT: 183\nHEIGHT: 999\n";
        let extraction = parse(text);

        assert_eq!(extraction.records[0].value(Field::Height), Some("183"));
    }

    #[test]
    fn test_height_weight_pair_fills_both() {
        let text = "someone@somewhere.com\n183 185\n190 170\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        assert_eq!(record.value(Field::Height), Some("183"));
        assert_eq!(record.value(Field::Weight), Some("185"));
    }

    #[test]
    fn test_medication_line_full_unit() {
        let text = "someone@somewhere.com\nXANAX 2 MG 30\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        assert_eq!(record.value(Field::Medicine), Some("XANAX 2 MG 30"));
        assert_eq!(record.value(Field::Dosage), Some("2 MG"));
        assert_eq!(record.value(Field::Tablets), Some("30"));
    }

    #[test]
    fn test_low_confidence_markers_surface() {
        let text = "someone@somewhere.com\nYES\n09/30/1959\n";
        let extraction = parse(text);

        let record = &extraction.records[0];
        let low = record.low_confidence_fields(0.7);
        assert!(low.contains(&Field::Alcoholic));
        assert!(low.contains(&Field::Dob));
        assert_eq!(record.fields[&Field::Alcoholic].rule, RuleKind::BareBoolean);
    }

    #[test]
    fn test_vocabulary_closure_holds() {
        // Keys are Field values by construction; this asserts the weaker
        // observable property over a busy document.
        let text = "1 john@x.com MALE\n183 185\nXANAX 2 MG 30\nTotal $250.00\n\
                    2 jane@y.com\nSacramento, CA 74751\nO+\nVISA\n";
        let extraction = parse(text);

        for record in &extraction.records {
            for field in record.fields.keys() {
                assert!(Field::ALL.contains(field));
            }
        }
    }
}
