// Term Normalizer
//
// Pure string helpers shared by the signal policies, the taxonomy matcher and
// the term selector. Matching is always done on case-folded text; display text
// keeps its original casing until the selector title-cases it.

/// Terms must be strictly longer than this many characters
pub const MIN_TERM_CHARS: usize = 2;

/// Case-fold for matching and deduplication
pub fn case_fold(text: &str) -> String {
    text.to_lowercase()
}

/// True when a term is long enough to keep
pub fn is_long_enough(text: &str) -> bool {
    text.chars().count() > MIN_TERM_CHARS
}

/// Title-case each whitespace-separated word ("sPORTS car" → "Sports Car")
///
/// Runs of whitespace collapse to a single space.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a classifier label of the form `"name, synonym, ..."` at the first comma
pub fn truncate_label(label: &str) -> &str {
    match label.find(',') {
        Some(idx) => label[..idx].trim(),
        None => label.trim(),
    }
}

/// ASCII punctuation plus the Latin-1, General Punctuation and CJK marks
/// OCR engines emit (curly quotes, dashes, guillemets, ideographic stops)
///
/// Symbols such as `™` or `°` are not punctuation and stay in place.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
        )
}

/// Remove punctuation from a token or label; whitespace is kept
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !is_punctuation(*c)).collect()
}

/// True when a string holds only letters, digits and whitespace
pub fn is_word_text(text: &str) -> bool {
    text.chars().all(|c| c.is_alphanumeric() || c.is_whitespace())
}

/// Normalize raw strings into candidate terms
///
/// Trims whitespace and drops entries of two characters or fewer (which
/// includes entries that are empty after trimming). Order is preserved.
pub fn normalize_terms<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|entry| {
            let trimmed = entry.as_ref().trim();
            is_long_enough(trimmed).then(|| trimmed.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_short_entries() {
        let terms = normalize_terms(["  Shoe ", "ab", "   ", "", " Red Mug"]);
        assert_eq!(terms, vec!["Shoe", "Red Mug"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_terms([" Laptop", "TV", "coffee  mug ", "\tLamp\n"]);
        let twice = normalize_terms(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn preserves_discovery_order() {
        let terms = normalize_terms(["zebra", "apple", "mango"]);
        assert_eq!(terms, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // "été" is 3 chars, 5 bytes
        assert_eq!(normalize_terms(["été", "ün"]), vec!["été"]);
    }

    #[test]
    fn title_case_lowercases_tail() {
        assert_eq!(title_case("sPORTS car"), "Sports Car");
        assert_eq!(title_case("  running   shoe "), "Running Shoe");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn truncate_label_at_first_comma() {
        assert_eq!(truncate_label("sports car, sport car"), "sports car");
        assert_eq!(truncate_label(" n04254680 , soccer ball"), "n04254680");
        assert_eq!(truncate_label("  mug "), "mug");
    }

    #[test]
    fn strip_punctuation_keeps_letters_and_digits() {
        assert_eq!(strip_punctuation("\"Nike!\""), "Nike");
        assert_eq!(strip_punctuation("4K-TV."), "4KTV");
        assert!(is_word_text("Air Max 90"));
        assert!(!is_word_text("50%"));
    }

    #[test]
    fn strip_punctuation_handles_typographic_marks() {
        assert_eq!(strip_punctuation("\u{201C}Nike\u{201D}"), "Nike");
        assert_eq!(strip_punctuation("Air\u{2014}Max"), "AirMax");
        assert_eq!(strip_punctuation("\u{00AB}Caf\u{00E9}\u{00BB}"), "Caf\u{00E9}");
        assert_eq!(strip_punctuation("potter's wheel"), "potters wheel");
    }

    #[test]
    fn symbols_are_not_punctuation() {
        assert_eq!(strip_punctuation("Brand\u{2122}"), "Brand\u{2122}");
        assert!(!is_word_text(&strip_punctuation("Brand\u{2122}")));
    }
}
