// src/resolver/detect.rs

use super::IncotermCode;
use regex::Regex;

/// Phrase spellings that appear instead of the three-letter code.
/// Checked only after the literal-code scan finds nothing; first match wins.
const PHRASE_FALLBACKS: &[(&str, IncotermCode)] = &[
    ("C & F", IncotermCode::CAndF),
    ("C AND F", IncotermCode::CAndF),
    ("EX-WORKS", IncotermCode::Exw),
    ("EX WORKS", IncotermCode::Exw),
    ("COST AND FREIGHT", IncotermCode::Cfr),
    ("COST INSURANCE FREIGHT", IncotermCode::Cif),
    ("FREE ON BOARD", IncotermCode::Fob),
    ("FREE CARRIER", IncotermCode::Fca),
];

/// Find the trade term in extracted document text.
///
/// The text is OCR output: mixed case, noisy whitespace, the term buried
/// anywhere. Codes are matched as whole words in `SCAN_ORDER` priority, so
/// a document mentioning both FOB and DAP resolves to DAP. `None` means no
/// term was found, which is a normal outcome, not an error.
pub fn detect_term(text: &str) -> Option<IncotermCode> {
    let upper = text.to_uppercase();

    for code in IncotermCode::SCAN_ORDER {
        let pattern = format!(r"\b{}\b", regex::escape(code.token()));
        let re = Regex::new(&pattern).unwrap();
        if re.is_match(&upper) {
            return Some(code);
        }
    }

    PHRASE_FALLBACKS
        .iter()
        .find(|(phrase, _)| upper.contains(phrase))
        .map(|&(_, code)| code)
}
