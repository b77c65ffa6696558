// file: src/extractor/patterns.rs
// description: compiled regex patterns for guide field labels and part text
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Field labels, anchored at the start of a line or segment
    pub static ref FAULT_CODES_LABEL: Regex = Regex::new(
        r"(?i)^fault codes?(?:[\s:\-]+|$)"
    ).expect("FAULT_CODES_LABEL regex is valid");

    pub static ref WHY_LABEL: Regex = Regex::new(
        r"(?i)^why it happens(?:[\s:\-]+|$)"
    ).expect("WHY_LABEL regex is valid");

    pub static ref SYMPTOMS_LABEL: Regex = Regex::new(
        r"(?i)^symptoms?[\s:\-]*"
    ).expect("SYMPTOMS_LABEL regex is valid");

    pub static ref PARTS_LABEL: Regex = Regex::new(
        r"(?i)^parts to replace[\s:\-]*"
    ).expect("PARTS_LABEL regex is valid");

    pub static ref BRANDS_LABEL: Regex = Regex::new(
        r"(?i)^brands[\s:\-]*"
    ).expect("BRANDS_LABEL regex is valid");

    // Labels that end a field value captured inline
    pub static ref AFTER_FAULT_CODES: Regex = Regex::new(
        r"(?i)why it happens|symptoms|parts to replace|brands"
    ).expect("AFTER_FAULT_CODES regex is valid");

    pub static ref AFTER_WHY: Regex = Regex::new(
        r"(?i)symptoms|parts to replace|brands"
    ).expect("AFTER_WHY regex is valid");

    pub static ref AFTER_SYMPTOMS: Regex = Regex::new(
        r"(?i)parts to replace|brands"
    ).expect("AFTER_SYMPTOMS regex is valid");

    pub static ref AFTER_PARTS: Regex = Regex::new(
        r"(?i)brands"
    ).expect("AFTER_PARTS regex is valid");

    // Labels that may follow an issue title on the same line
    pub static ref TITLE_FIELD: Regex = Regex::new(
        r"(?i)(?:fault codes?|why it happens|symptoms?)[\s:\-]"
    ).expect("TITLE_FIELD regex is valid");

    // List numbering such as "1. " or "2) "
    pub static ref NUMBERING: Regex = Regex::new(
        r"^\d+[.)]\s*"
    ).expect("NUMBERING regex is valid");

    pub static ref NUMBERED_ITEM: Regex = Regex::new(
        r"^\d+[.)]"
    ).expect("NUMBERED_ITEM regex is valid");

    // Part text
    pub static ref URL_IN_PARENS: Regex = Regex::new(
        r"\s*\(\s*(https?://[^)]+)\)"
    ).expect("URL_IN_PARENS regex is valid");

    pub static ref NON_SEARCH_CHARS: Regex = Regex::new(
        r"[^a-zA-Z0-9\s]"
    ).expect("NON_SEARCH_CHARS regex is valid");
}

/// Removes a leading list number ("1. ", "2) ").
pub fn strip_numbering(text: &str) -> &str {
    match NUMBERING.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}

pub fn is_numbered(text: &str) -> bool {
    NUMBERED_ITEM.is_match(text)
}

/// Byte offset of the first match of `stops` in `text`, or its length.
pub fn value_end(text: &str, stops: &Regex) -> usize {
    stops.find(text).map(|m| m.start()).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_patterns() {
        assert!(FAULT_CODES_LABEL.is_match("Fault Codes: P0300"));
        assert!(FAULT_CODES_LABEL.is_match("fault code - P0300"));
        assert!(FAULT_CODES_LABEL.is_match("Fault Codes"));
        assert!(!FAULT_CODES_LABEL.is_match("Faulty wiring"));
        assert!(WHY_LABEL.is_match("Why it happens: wear"));
        assert!(SYMPTOMS_LABEL.is_match("Symptom:"));
        assert!(PARTS_LABEL.is_match("PARTS TO REPLACE"));
        assert!(BRANDS_LABEL.is_match("Brands: Bosch"));
        assert!(!BRANDS_LABEL.is_match("OEM brands"));
    }

    #[test]
    fn test_title_field_search() {
        let line = "Squealing brake pads Fault Codes: C1201";
        let m = TITLE_FIELD.find(line).unwrap();
        assert_eq!(&line[..m.start()], "Squealing brake pads ");
        assert!(TITLE_FIELD.find("Worn control arm bushings").is_none());
    }

    #[test]
    fn test_strip_numbering() {
        assert_eq!(strip_numbering("1. Squeal noise"), "Squeal noise");
        assert_eq!(strip_numbering("12) Grinding"), "Grinding");
        assert_eq!(strip_numbering("Vibration "), "Vibration");
        assert!(is_numbered("3. Worn pads"));
        assert!(!is_numbered("Worn pads 3."));
    }

    #[test]
    fn test_value_end() {
        let text = "C1201 Why it happens: pad wear";
        assert_eq!(&text[..value_end(text, &AFTER_FAULT_CODES)], "C1201 ");
        assert_eq!(value_end("C1201", &AFTER_FAULT_CODES), 5);
    }

    #[test]
    fn test_url_in_parens() {
        let caps = URL_IN_PARENS
            .captures("Brake Rotor ( https://eeuroparts.com/rotor ) front")
            .unwrap();
        assert_eq!(caps.get(1).unwrap().as_str().trim(), "https://eeuroparts.com/rotor");
    }
}
