// src/resolver/charges.rs

use regex::Regex;

/// Labeled-amount patterns, most specific label first. The capture group is
/// the numeric part; separators and currency tokens (USD / INR / RS.) are
/// consumed but ignored.
const CHARGE_PATTERNS: &[&str] = &[
    r"MISCELLANEOUS\s*(?:CHARGES?)?\s*[:\-]?\s*(?:USD|INR|RS\.?)?\s*([\d,]+\.?\d*)",
    r"MISC\.?\s*(?:CHARGES?)?\s*[:\-]?\s*(?:USD|INR|RS\.?)?\s*([\d,]+\.?\d*)",
    r"OTHER\s*CHARGES?\s*[:\-]?\s*(?:USD|INR|RS\.?)?\s*([\d,]+\.?\d*)",
    r"ADDITIONAL\s*CHARGES?\s*[:\-]?\s*(?:USD|INR|RS\.?)?\s*([\d,]+\.?\d*)",
];

/// Pull the miscellaneous-charges figure out of invoice text.
///
/// Patterns are tried in order and the first parseable amount wins. A match
/// whose number fails to parse counts as no match at all, so the scan falls
/// through to the next pattern and finally to 0.
pub fn extract_misc_charges(text: &str) -> f64 {
    let upper = text.to_uppercase();

    for pattern in CHARGE_PATTERNS {
        let re = Regex::new(pattern).unwrap();
        if let Some(cap) = re.captures(&upper) {
            if let Ok(amount) = cap[1].replace(',', "").parse::<f64>() {
                return amount;
            }
        }
    }

    0.0
}
