//! Fuzzy comparison keys for item names.
//!
//! Hand-edited names drift: capitalisation, accents, trailing punctuation,
//! emoji and doubled spaces. `simplify` folds all of those away so two
//! names that a person would call "the same" compare equal.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Letters that do not decompose under NFD but have an obvious base form
fn fold_letter(c: char) -> Option<&'static str> {
    match c {
        'ł' | 'Ł' => Some("l"),
        'ø' | 'Ø' => Some("o"),
        'đ' | 'Đ' => Some("d"),
        'ß' => Some("ss"),
        'æ' | 'Æ' => Some("ae"),
        'œ' | 'Œ' => Some("oe"),
        'ı' => Some("i"),
        _ => None,
    }
}

/// Canonical comparison key: lower-cased, accents stripped, everything
/// that is not a letter, digit or whitespace dropped, whitespace collapsed.
pub fn simplify(s: &str) -> String {
    // lower-case first: case mapping can itself emit combining marks ('İ')
    let lowered = s.to_lowercase();
    let mut folded = String::with_capacity(lowered.len());
    for c in lowered.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if let Some(base) = fold_letter(c) {
            folded.push_str(base);
        } else if c.is_alphanumeric() {
            folded.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            folded.push(' ');
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if both names share the same simplified key
pub fn matches_simplified(a: &str, b: &str) -> bool {
    simplify(a) == simplify(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_and_punctuation_are_ignored() {
        assert_eq!(simplify("Café!"), simplify("cafe"));
        assert_eq!(simplify("Café!"), "cafe");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(simplify("  Shopping \t list\n"), "shopping list");
    }

    #[test]
    fn non_decomposing_letters_fold() {
        assert_eq!(simplify("Łódź"), "lodz");
        assert_eq!(simplify("Straße"), "strasse");
    }

    #[test]
    fn emoji_and_symbols_are_dropped() {
        assert_eq!(simplify("Tmp 🔥"), "tmp");
        assert_eq!(simplify("#todo: (urgent)"), "todo urgent");
    }

    #[test]
    fn total_on_degenerate_input() {
        assert_eq!(simplify(""), "");
        assert_eq!(simplify("!!! ???"), "");
        assert!(matches_simplified("...", ""));
    }

    #[test]
    fn deterministic_and_idempotent() {
        let once = simplify("Ünïcödé  Näme");
        assert_eq!(once, "unicode name");
        assert_eq!(simplify(&once), once);
    }

    #[test]
    fn dotted_capital_i_folds_to_plain_i() {
        assert_eq!(simplify("İstanbul"), "istanbul");
        assert_eq!(simplify(&simplify("İ")), simplify("İ"));
        assert!(matches_simplified("İzmir", "izmir"));
    }
}
