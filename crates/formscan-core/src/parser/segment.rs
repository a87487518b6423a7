//! Boundary strategy selection: splitting the line sequence into
//! per-record segments.
//!
//! Strategies form a prioritized fallthrough list. Each one either returns
//! segments or `None` for "no boundary signal here"; the parser tries them
//! in order and lands on the single-record fallback when all decline.

use crate::models::StrategyKind;

use super::patterns::{EMAIL, HEIGHT_WEIGHT, NUMBERED_BOUNDARY, SEPARATOR_LINE};

/// One record's worth of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Literal in-document record number, when the strategy found one.
    pub id: Option<u32>,

    /// The segment's lines, boundary markers stripped.
    pub lines: Vec<String>,
}

/// A record segmentation strategy.
pub trait BoundaryStrategy {
    fn kind(&self) -> StrategyKind;

    /// Split lines into segments, or `None` when the strategy's boundary
    /// signal is absent from the document.
    fn segment(&self, lines: &[String]) -> Option<Vec<Segment>>;
}

/// Strategies in priority order. The single-record fallback is not listed;
/// the parser applies it when every strategy declines.
pub fn strategies() -> [&'static dyn BoundaryStrategy; 3] {
    [&NumberedStrategy, &SeparatorStrategy, &AnchorStrategy]
}

/// Lines beginning with a small integer marker start a new record carrying
/// that literal number as its id.
pub struct NumberedStrategy;

impl BoundaryStrategy for NumberedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Numbered
    }

    fn segment(&self, lines: &[String]) -> Option<Vec<Segment>> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut prelude: Vec<String> = Vec::new();
        let mut current: Option<Segment> = None;
        let mut boundaries = 0usize;

        for line in lines {
            if let Some(marker) = boundary_marker(line) {
                let tracked = current.as_ref().and_then(|s| s.id);
                if Some(marker.id) != tracked {
                    boundaries += 1;
                    if let Some(prev) = current.take() {
                        segments.push(prev);
                    }
                    let mut seg = Segment {
                        id: Some(marker.id),
                        lines: Vec::new(),
                    };
                    if !marker.rest.is_empty() {
                        seg.lines.push(marker.rest);
                    }
                    current = Some(seg);
                    continue;
                }
            }

            match current.as_mut() {
                Some(seg) => seg.lines.push(line.clone()),
                None => prelude.push(line.clone()),
            }
        }

        if let Some(seg) = current.take() {
            segments.push(seg);
        }

        if boundaries < 2 {
            return None;
        }

        // Lines before the first marker belong to the first record.
        if !prelude.is_empty() {
            if let Some(first) = segments.first_mut() {
                prelude.append(&mut first.lines);
                first.lines = prelude;
            }
        }

        Some(segments)
    }
}

struct BoundaryMarker {
    id: u32,
    rest: String,
}

fn boundary_marker(line: &str) -> Option<BoundaryMarker> {
    // A bare 2-3 digit pair is a height/weight line, never a boundary.
    if HEIGHT_WEIGHT.is_match(line) {
        return None;
    }

    let caps = NUMBERED_BOUNDARY.captures(line)?;
    let id: u32 = caps[1].parse().ok()?;
    if id == 0 {
        return None;
    }

    Some(BoundaryMarker {
        id,
        rest: line[caps.get(0).unwrap().end()..].trim().to_string(),
    })
}

/// Lines of 3+ repeated `-` or `=` terminate the current record.
pub struct SeparatorStrategy;

impl BoundaryStrategy for SeparatorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Separator
    }

    fn segment(&self, lines: &[String]) -> Option<Vec<Segment>> {
        if !lines.iter().any(|l| SEPARATOR_LINE.is_match(l)) {
            return None;
        }

        let mut segments = Vec::new();
        let mut acc: Vec<String> = Vec::new();

        for line in lines {
            if SEPARATOR_LINE.is_match(line) {
                if !acc.is_empty() {
                    segments.push(Segment {
                        id: None,
                        lines: std::mem::take(&mut acc),
                    });
                }
            } else {
                acc.push(line.clone());
            }
        }

        if !acc.is_empty() {
            segments.push(Segment { id: None, lines: acc });
        }

        if segments.is_empty() {
            None
        } else {
            Some(segments)
        }
    }
}

/// Every email-bearing line starts a new record. Email is the anchor field:
/// the most reliably detected and most reliably unique per record.
pub struct AnchorStrategy;

impl BoundaryStrategy for AnchorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Anchor
    }

    fn segment(&self, lines: &[String]) -> Option<Vec<Segment>> {
        let anchors: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| EMAIL.is_match(l))
            .map(|(i, _)| i)
            .collect();

        if anchors.is_empty() {
            return None;
        }

        // The first segment folds in any lines before the first anchor.
        let mut starts = vec![0usize];
        starts.extend(anchors.iter().skip(1).copied());

        let segments = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(lines.len());
                Segment {
                    id: None,
                    lines: lines[start..end].to_vec(),
                }
            })
            .collect();

        Some(segments)
    }
}
