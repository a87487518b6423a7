//! Regex patterns and keyword lists for line classification and
//! segmentation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Field;

lazy_static! {
    // Email token
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"
    ).unwrap();

    // Numeric date token: 09/30/1959, 30-09-59, 1959.9.30
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,4})[./\-](\d{1,2})[./\-](\d{2,4})\b"
    ).unwrap();

    // Full English month name
    pub static ref MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b"
    ).unwrap();

    // Currency token: $250.00, $1,234.5
    pub static ref CURRENCY: Regex = Regex::new(
        r"\$\d+(?:,\d{3})*(?:\.\d+)?"
    ).unwrap();

    // <city words>, <two-letter state> <5-digit zip>
    pub static ref CITY_STATE_ZIP: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z .'\-]*?),\s*([A-Za-z]{2})\s+(\d{5})$"
    ).unwrap();

    // Exactly two consecutive 2-3 digit numbers
    pub static ref HEIGHT_WEIGHT: Regex = Regex::new(
        r"^(\d{2,3})\s+(\d{2,3})$"
    ).unwrap();

    // Blood type token: A+, O-, AB+
    pub static ref BLOOD_GROUP: Regex = Regex::new(
        r"\b(?:AB|A|B|O)[+-]"
    ).unwrap();

    // Dosage: 2 MG, 50MG, 0.5 mg
    pub static ref DOSAGE_MG: Regex = Regex::new(
        r"(?i)\b(\d+(?:\.\d+)?)\s*MG\b"
    ).unwrap();

    // Trailing bare integer (tablet count)
    pub static ref TRAILING_COUNT: Regex = Regex::new(
        r"\b(\d+)\s*$"
    ).unwrap();

    // Street-suffix token for the address heuristic
    pub static ref STREET_SUFFIX: Regex = Regex::new(
        r"(?i)\b(St|Dr|Ave|Road|Lane)\b"
    ).unwrap();

    // Bare yes/no line
    pub static ref YES_NO: Regex = Regex::new(
        r"(?i)^(yes|no)$"
    ).unwrap();

    // Record boundary marker: 1-2 digit number plus separator. Street
    // numbers and RECORD NO values are longer and must not segment.
    pub static ref NUMBERED_BOUNDARY: Regex = Regex::new(
        r"^(\d{1,2})[.):\-]?\s+"
    ).unwrap();

    // Separator line: 3+ repeated - or =
    pub static ref SEPARATOR_LINE: Regex = Regex::new(
        r"^(-{3,}|={3,})$"
    ).unwrap();

    /// Vocabulary names sorted longest-first, so "SHIPPING COST" is matched
    /// before "COST" when scanning for explicit header mentions.
    pub static ref HEADERS_BY_LENGTH: Vec<Field> = {
        let mut fields: Vec<Field> = Field::ALL.to_vec();
        fields.sort_by_key(|f| std::cmp::Reverse(f.name().len()));
        fields
    };
}

/// Closed list of recognized drug names.
pub static MEDICATIONS: &[&str] = &[
    "XANAX",
    "VALIUM",
    "AMBIEN",
    "ATIVAN",
    "SOMA",
    "TRAMADOL",
    "CODEINE",
    "VICODIN",
    "PERCOCET",
    "PHENTERMINE",
];

/// Closed list of recognized payment brands, longest-first so
/// "AMERICAN EXPRESS" wins over its substrings.
pub static PAYMENT_BRANDS: &[&str] = &[
    "AMERICAN EXPRESS",
    "MASTERCARD",
    "DISCOVER",
    "MAESTRO",
    "VISA",
    "AMEX",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("write to ambibbs@aol.com today"));
        assert!(!EMAIL.is_match("no at sign here"));
    }

    #[test]
    fn test_currency_pattern() {
        assert_eq!(CURRENCY.find("Total $250.00").unwrap().as_str(), "$250.00");
        assert_eq!(CURRENCY.find("$1,234.5").unwrap().as_str(), "$1,234.5");
        assert!(!CURRENCY.is_match("250.00"));
    }

    #[test]
    fn test_city_state_zip_pattern() {
        let caps = CITY_STATE_ZIP.captures("Sacramento, CA 74751").unwrap();
        assert_eq!(&caps[1], "Sacramento");
        assert_eq!(&caps[2], "CA");
        assert_eq!(&caps[3], "74751");

        assert!(CITY_STATE_ZIP.is_match("hampton bays, NY 21184"));
        assert!(!CITY_STATE_ZIP.is_match("Sacramento CA 74751"));
    }

    #[test]
    fn test_blood_group_pattern() {
        assert!(BLOOD_GROUP.is_match("A+"));
        assert!(BLOOD_GROUP.is_match("blood O-"));
        assert!(BLOOD_GROUP.is_match("AB+"));
        // No boundary inside a word
        assert!(!BLOOD_GROUP.is_match("LAB+"));
    }

    #[test]
    fn test_numbered_boundary_pattern() {
        assert!(NUMBERED_BOUNDARY.is_match("1 john@x.com MALE"));
        assert!(NUMBERED_BOUNDARY.is_match("12. second record"));
        // Street number: too many digits
        assert!(!NUMBERED_BOUNDARY.is_match("2691 S Couns Dr"));
        // Bare number without trailing content
        assert!(!NUMBERED_BOUNDARY.is_match("123456"));
    }

    #[test]
    fn test_separator_line_pattern() {
        assert!(SEPARATOR_LINE.is_match("---"));
        assert!(SEPARATOR_LINE.is_match("========"));
        assert!(!SEPARATOR_LINE.is_match("--"));
        assert!(!SEPARATOR_LINE.is_match("-=-=-"));
    }

    #[test]
    fn test_headers_by_length_prefers_specific() {
        let cost = HEADERS_BY_LENGTH
            .iter()
            .position(|f| *f == Field::Cost)
            .unwrap();
        let shipping = HEADERS_BY_LENGTH
            .iter()
            .position(|f| *f == Field::ShippingCost)
            .unwrap();
        assert!(shipping < cost);
    }
}
