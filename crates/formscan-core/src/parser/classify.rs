//! Line classifier: maps one trimmed, non-empty line of OCR text to zero or
//! more field candidates.
//!
//! The classifier is an ordered table of independent rules. Each rule fires
//! at most once per line; several independent rules may fire on the same
//! line (an email and a payment brand, say). Conflicts between candidates
//! for the same field are resolved downstream by first-match-wins, so rule
//! order doubles as precedence.

use chrono::NaiveDate;

use crate::models::{Field, RuleKind};

use super::patterns::{
    BLOOD_GROUP, CITY_STATE_ZIP, CURRENCY, DATE_NUMERIC, DOSAGE_MG, EMAIL, HEADERS_BY_LENGTH,
    HEIGHT_WEIGHT, MEDICATIONS, MONTH_NAME, PAYMENT_BRANDS, STREET_SUFFIX, TRAILING_COUNT, YES_NO,
};

/// What a rule detected on a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Concrete field assignments, applied as one atomic unit.
    Fields(Vec<(Field, String)>),

    /// A vocabulary header with nothing after it; the value is the
    /// immediately following line.
    PendingHeader(Field),

    /// A bare YES/NO with no field identity of its own. Resolved by the
    /// disambiguator.
    BareBoolean(String),
}

/// A candidate produced by one classifier rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Rule that produced the candidate.
    pub rule: RuleKind,

    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// The detection payload.
    pub detection: Detection,
}

impl Candidate {
    fn single(rule: RuleKind, confidence: f32, field: Field, value: impl Into<String>) -> Self {
        Self {
            rule,
            confidence,
            detection: Detection::Fields(vec![(field, value.into())]),
        }
    }
}

/// Accumulator state visible to the rules that are guarded by it.
#[derive(Debug, Clone, Copy)]
pub struct LineContext {
    /// COST already has a value on the active record.
    pub cost_claimed: bool,

    /// HEIGHT already has a value on the active record.
    pub height_claimed: bool,

    /// WEIGHT already has a value on the active record.
    pub weight_claimed: bool,

    /// Maximum line length for the unlabeled date rule.
    pub date_max_line_len: usize,
}

impl Default for LineContext {
    fn default() -> Self {
        Self {
            cost_claimed: false,
            height_claimed: false,
            weight_claimed: false,
            date_max_line_len: 30,
        }
    }
}

type RuleFn = fn(&str, &LineContext) -> Option<Candidate>;

/// The rule table, in precedence order.
static RULES: &[RuleFn] = &[
    rule_email,
    rule_date,
    rule_currency,
    rule_header,
    rule_gender,
    rule_bare_boolean,
    rule_address,
    rule_city_state_zip,
    rule_height_weight,
    rule_blood_group,
    rule_medication,
    rule_payment_brand,
];

/// Classify one trimmed, non-empty line. Unmatched lines yield an empty
/// vector; that is the expected case, not an error.
pub fn classify_line(line: &str, ctx: &LineContext) -> Vec<Candidate> {
    RULES.iter().filter_map(|rule| rule(line, ctx)).collect()
}

fn rule_email(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let token = EMAIL.find(line)?;
    Some(Candidate::single(
        RuleKind::Email,
        0.95,
        Field::EmailAddress,
        token.as_str(),
    ))
}

fn rule_date(line: &str, ctx: &LineContext) -> Option<Candidate> {
    if line.len() >= ctx.date_max_line_len || EMAIL.is_match(line) {
        return None;
    }

    let numeric = DATE_NUMERIC.captures(line).is_some_and(|caps| {
        plausible_date(
            caps[1].parse().unwrap_or(0),
            caps[2].parse().unwrap_or(0),
            caps[3].parse().unwrap_or(0),
        )
    });

    if numeric || MONTH_NAME.is_match(line) {
        // Unlabeled dates all land on DOB; low confidence flags the guess.
        Some(Candidate::single(RuleKind::Date, 0.6, Field::Dob, line))
    } else {
        None
    }
}

fn rule_currency(line: &str, ctx: &LineContext) -> Option<Candidate> {
    let token = CURRENCY.find(line)?.as_str();
    let lower = line.to_lowercase();

    // "shipping" before "cost": a labeled shipping cost contains both.
    let (field, confidence) = if lower.contains("total") {
        (Field::TotalAmt, 0.85)
    } else if lower.contains("shipping") {
        (Field::ShippingCost, 0.85)
    } else if lower.contains("cost") {
        (Field::Cost, 0.85)
    } else if !ctx.cost_claimed {
        (Field::Cost, 0.5)
    } else {
        return None;
    };

    Some(Candidate::single(RuleKind::Currency, confidence, field, token))
}

fn rule_header(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let collapsed = collapse_whitespace(line);
    let upper: String = collapsed.chars().map(|c| c.to_ascii_uppercase()).collect();

    for field in HEADERS_BY_LENGTH.iter() {
        let Some(at) = upper.find(field.name()) else {
            continue;
        };

        let rest = collapsed[at + field.name().len()..]
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace());

        let detection = if rest.is_empty() {
            Detection::PendingHeader(*field)
        } else {
            Detection::Fields(vec![(*field, rest.to_string())])
        };

        return Some(Candidate {
            rule: RuleKind::Header,
            confidence: 0.9,
            detection,
        });
    }

    None
}

fn rule_gender(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let lower = line.to_lowercase();
    if !lower.contains("male") {
        return None;
    }

    let value = if lower.contains("fe") { "FEMALE" } else { "MALE" };
    Some(Candidate::single(RuleKind::Gender, 0.8, Field::Sex1, value))
}

fn rule_bare_boolean(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    if line.len() >= 5 || !YES_NO.is_match(line) {
        return None;
    }

    Some(Candidate {
        rule: RuleKind::BareBoolean,
        confidence: 0.3,
        detection: Detection::BareBoolean(line.to_ascii_uppercase()),
    })
}

fn rule_address(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    if line.len() <= 10 || EMAIL.is_match(line) || !STREET_SUFFIX.is_match(line) {
        return None;
    }

    Some(Candidate::single(
        RuleKind::Address,
        0.7,
        Field::ResAddress,
        line,
    ))
}

fn rule_city_state_zip(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let caps = CITY_STATE_ZIP.captures(line)?;

    Some(Candidate {
        rule: RuleKind::CityStateZip,
        confidence: 0.85,
        detection: Detection::Fields(vec![
            (Field::City1, caps[1].trim().to_string()),
            (Field::State1, caps[2].to_string()),
            (Field::Zip1, caps[3].to_string()),
        ]),
    })
}

fn rule_height_weight(line: &str, ctx: &LineContext) -> Option<Candidate> {
    if ctx.height_claimed || ctx.weight_claimed {
        return None;
    }
    let caps = HEIGHT_WEIGHT.captures(line)?;

    Some(Candidate {
        rule: RuleKind::HeightWeight,
        confidence: 0.75,
        detection: Detection::Fields(vec![
            (Field::Height, caps[1].to_string()),
            (Field::Weight, caps[2].to_string()),
        ]),
    })
}

fn rule_blood_group(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let token = BLOOD_GROUP.find(line)?;
    Some(Candidate::single(
        RuleKind::BloodGroup,
        0.9,
        Field::BloodGp,
        token.as_str(),
    ))
}

fn rule_medication(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let upper = line.to_ascii_uppercase();
    if !MEDICATIONS.iter().any(|drug| upper.contains(drug)) {
        return None;
    }

    let mut fields = vec![(Field::Medicine, line.to_string())];

    if let Some(caps) = DOSAGE_MG.captures(line) {
        fields.push((Field::Dosage, format!("{} MG", &caps[1])));
    }

    // A trailing bare number is the tablet count; the MG token keeps the
    // dosage number from ending the line.
    if let Some(caps) = TRAILING_COUNT.captures(line) {
        fields.push((Field::Tablets, caps[1].to_string()));
    }

    Some(Candidate {
        rule: RuleKind::Medication,
        confidence: 0.85,
        detection: Detection::Fields(fields),
    })
}

fn rule_payment_brand(line: &str, _ctx: &LineContext) -> Option<Candidate> {
    let upper = line.to_ascii_uppercase();
    let brand = PAYMENT_BRANDS.iter().find(|b| upper.contains(*b))?;

    Some(Candidate::single(
        RuleKind::PaymentBrand,
        0.85,
        Field::CardName,
        *brand,
    ))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check that the three components of a numeric date token are plausible as
/// a calendar date in some day/month order.
fn plausible_date(a: u32, b: u32, c: u32) -> bool {
    if a >= 1000 {
        // YYYY-MM-DD
        return NaiveDate::from_ymd_opt(a as i32, b, c).is_some();
    }

    let year = normalize_year(c);
    // MM/DD/YYYY or DD/MM/YYYY
    NaiveDate::from_ymd_opt(year, a, b).is_some() || NaiveDate::from_ymd_opt(year, b, a).is_some()
}

fn normalize_year(y: u32) -> i32 {
    if y < 100 {
        // Two-digit year: 00-50 => 2000s, 51-99 => 1900s
        if y <= 50 { 2000 + y as i32 } else { 1900 + y as i32 }
    } else {
        y as i32
    }
}
