use crate::config::PlateConfig;
use crate::core::converter::{DigitMap, LetterMap, LetterPair, LetterTable, ALIF, ALIF_HAMZA, TATWEEL};
use crate::core::types::{
    CompletenessPolicy, FieldUpdate, PlateField, Script, Segment, ValidationResult, MAX_DIGITS,
    MAX_LETTERS,
};
use std::fmt::{Display, Write};
use tracing::trace;

/// Filters, caps and transliterates raw edits of the four plate fields.
///
/// The engine is pure: it never touches field state and never fails.
/// Characters outside the permitted sets are dropped silently, and callers
/// wanting to know whether anything was dropped compare lengths themselves.
#[derive(Debug, Clone, Copy)]
pub struct PlateTransliterationEngine {
    letters: LetterMap,
    policy: CompletenessPolicy,
}

impl PlateTransliterationEngine {
    pub fn new(table: LetterTable, policy: CompletenessPolicy) -> Self {
        Self {
            letters: LetterMap::new(table),
            policy,
        }
    }

    pub fn from_config(config: &PlateConfig) -> Self {
        Self::new(config.letter_table, config.policy)
    }

    pub fn policy(&self) -> CompletenessPolicy {
        self.policy
    }

    pub fn letter_map(&self) -> &LetterMap {
        &self.letters
    }

    /// Routes an edit of `field` to the digit or letter operation.
    pub fn update(&self, field: PlateField, raw: &str) -> FieldUpdate {
        let update = match field.segment() {
            Segment::Digits => self.update_from_digits(raw, field.script()),
            Segment::Letters => self.update_from_letters(raw, field.script()),
        };
        trace!(
            field = %field,
            raw_len = raw.chars().count(),
            accepted = symbol_count(&update.source),
            "field edit filtered"
        );
        update
    }

    /// Digits of either script are accepted in either field. The edited
    /// field is re-rendered in its own script and the mirror in the other.
    pub fn update_from_digits(&self, raw: &str, source: Script) -> FieldUpdate {
        let mut source_digits = Vec::with_capacity(MAX_DIGITS);
        let mut target_digits = Vec::with_capacity(MAX_DIGITS);

        for c in raw.chars().filter(|c| !c.is_whitespace()) {
            if source_digits.len() == MAX_DIGITS {
                break;
            }
            let (latin, arabic) = if let Some(ar) = DigitMap::to_arabic(c) {
                (c, ar)
            } else if let Some(en) = DigitMap::to_latin(c) {
                (en, c)
            } else {
                continue;
            };
            let (own, other) = match source {
                Script::Arabic => (arabic, latin),
                Script::Latin => (latin, arabic),
            };
            source_digits.push(own);
            target_digits.push(other);
        }

        FieldUpdate {
            source: join_spaced(source_digits),
            target: join_spaced(target_digits),
        }
    }

    /// Letters are accepted only in the field's own script. The mirror is
    /// built by inserting each mapped letter at the front, so it reads in
    /// the reverse of the typing order.
    pub fn update_from_letters(&self, raw: &str, source: Script) -> FieldUpdate {
        let normalized = match source {
            Script::Arabic => raw.to_string(),
            Script::Latin => raw.to_uppercase(),
        };

        let mut accepted: Vec<&'static LetterPair> = Vec::with_capacity(MAX_LETTERS);
        for c in normalized.chars().filter(|c| !c.is_whitespace()) {
            if accepted.len() == MAX_LETTERS {
                break;
            }
            let pair = match source {
                Script::Arabic => self.arabic_letter(c),
                Script::Latin => self.letters.by_latin(c),
            };
            if let Some(pair) = pair {
                accepted.push(pair);
            }
        }

        let (own, other): (Vec<String>, Vec<String>) = match source {
            Script::Arabic => (
                accepted.iter().map(|p| p.arabic.to_string()).collect(),
                accepted.iter().rev().map(|p| p.latin.to_string()).collect(),
            ),
            Script::Latin => (
                accepted.iter().map(|p| p.latin.to_string()).collect(),
                accepted.iter().rev().map(|p| p.arabic.to_string()).collect(),
            ),
        };

        FieldUpdate {
            source: join_spaced(own),
            target: join_spaced(other),
        }
    }

    /// Checks a digits/letters pair against the configured policy. A full
    /// plate is `Complete` under either policy.
    pub fn validate_complete(&self, digits: &str, letters: &str) -> ValidationResult {
        let digit_count = symbol_count(digits);
        let letter_count = symbol_count(letters);

        if digit_count == MAX_DIGITS && letter_count == MAX_LETTERS {
            return ValidationResult::Complete;
        }
        match self.policy {
            CompletenessPolicy::Strict => ValidationResult::Incomplete,
            CompletenessPolicy::NonEmpty if digit_count + letter_count > 0 => {
                ValidationResult::NonEmpty
            }
            CompletenessPolicy::NonEmpty => ValidationResult::Incomplete,
        }
    }

    fn arabic_letter(&self, c: char) -> Option<&'static LetterPair> {
        match c {
            // Tatweel only ever extends the H ligature.
            TATWEEL => None,
            ALIF => self.letters.by_arabic(ALIF_HAMZA),
            _ => self.letters.by_arabic(c),
        }
    }
}

impl Default for PlateTransliterationEngine {
    fn default() -> Self {
        Self::new(LetterTable::default(), CompletenessPolicy::default())
    }
}

/// Number of plate symbols in a display value: separators and the
/// ligature's tatweel are not counted.
pub fn symbol_count(value: &str) -> usize {
    value
        .chars()
        .filter(|&c| !c.is_whitespace() && c != TATWEEL)
        .count()
}

fn join_spaced<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{item}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PlateTransliterationEngine {
        PlateTransliterationEngine::default()
    }

    #[test]
    fn latin_digits_mirror_into_arabic() {
        let update = engine().update_from_digits("1 2 3 4", Script::Latin);
        assert_eq!(update.source, "1 2 3 4");
        assert_eq!(update.target, "١ ٢ ٣ ٤");
    }

    #[test]
    fn arabic_field_converts_stray_latin_digits() {
        let update = engine().update_from_digits("١2٣", Script::Arabic);
        assert_eq!(update.source, "١ ٢ ٣");
        assert_eq!(update.target, "1 2 3");
    }

    #[test]
    fn digits_stop_at_four() {
        let update = engine().update_from_digits("123456", Script::Latin);
        assert_eq!(update.source, "1 2 3 4");
        assert_eq!(update.target, "١ ٢ ٣ ٤");
    }

    #[test]
    fn invalid_digits_do_not_use_the_cap() {
        let update = engine().update_from_digits("1a-2 b3x4", Script::Latin);
        assert_eq!(update.source, "1 2 3 4");
    }

    #[test]
    fn digit_field_reformats_separators() {
        let update = engine().update_from_digits("  12\t3\n", Script::Latin);
        assert_eq!(update.source, "1 2 3");
        assert_eq!(engine().update_from_digits("   ", Script::Latin), FieldUpdate::default());
    }

    #[test]
    fn latin_letters_front_insert_into_arabic() {
        let e = engine();
        assert_eq!(e.update_from_letters("A", Script::Latin).target, "أ");
        assert_eq!(e.update_from_letters("AB", Script::Latin).target, "ب أ");
        let full = e.update_from_letters("ABD", Script::Latin);
        assert_eq!(full.source, "A B D");
        assert_eq!(full.target, "د ب أ");
    }

    #[test]
    fn arabic_letters_front_insert_into_latin() {
        let update = engine().update_from_letters("أبد", Script::Arabic);
        assert_eq!(update.source, "أ ب د");
        assert_eq!(update.target, "D B A");
    }

    #[test]
    fn latin_letters_are_uppercased() {
        let update = engine().update_from_letters("r b x", Script::Latin);
        assert_eq!(update.source, "R B X");
        assert_eq!(update.target, "ص ب ر");
    }

    #[test]
    fn letters_outside_the_table_are_dropped() {
        let e = engine();
        // C, O and digits are not plate letters in the standard table.
        let update = e.update_from_letters("A1CO2B", Script::Latin);
        assert_eq!(update.source, "A B");
        // Latin letters typed into the Arabic field are dropped too.
        let update = e.update_from_letters("Aب", Script::Arabic);
        assert_eq!(update.source, "ب");
        assert_eq!(update.target, "B");
    }

    #[test]
    fn letters_stop_at_three() {
        let update = engine().update_from_letters("ABDRS", Script::Latin);
        assert_eq!(update.source, "A B D");
    }

    #[test]
    fn bare_alif_maps_like_hamza_alif() {
        let update = engine().update_from_letters("ا", Script::Arabic);
        assert_eq!(update.source, "أ");
        assert_eq!(update.target, "A");
    }

    #[test]
    fn h_ligature_counts_as_one_letter() {
        let e = engine();
        let typed_plain = e.update_from_letters("هبد", Script::Arabic);
        let typed_ligature = e.update_from_letters("هـبد", Script::Arabic);
        assert_eq!(typed_plain, typed_ligature);
        assert_eq!(typed_plain.source, "هـ ب د");
        assert_eq!(typed_plain.target, "D B H");

        let update = e.update_from_letters("ـ", Script::Arabic);
        assert_eq!(update, FieldUpdate::default());
    }

    #[test]
    fn latinized_table_accepts_c() {
        let e = PlateTransliterationEngine::new(LetterTable::Latinized, CompletenessPolicy::Strict);
        let update = e.update_from_letters("ABC", Script::Latin);
        assert_eq!(update.source, "A B C");
        assert_eq!(update.target, "ص ب أ");
    }

    #[test]
    fn update_dispatches_on_field() {
        let e = engine();
        assert_eq!(
            e.update(PlateField::NumbersArabic, "٥٠٦"),
            e.update_from_digits("٥٠٦", Script::Arabic)
        );
        assert_eq!(
            e.update(PlateField::LettersLatin, "bud"),
            e.update_from_letters("bud", Script::Latin)
        );
    }

    #[test]
    fn strict_policy_needs_full_plate() {
        let e = engine();
        assert_eq!(e.validate_complete("1 2 3", "A B D"), ValidationResult::Incomplete);
        assert_eq!(e.validate_complete("1 2 3 4", "A B D"), ValidationResult::Complete);
        assert_eq!(e.validate_complete("", ""), ValidationResult::Incomplete);
    }

    #[test]
    fn non_empty_policy_accepts_partial_plates() {
        let e = PlateTransliterationEngine::new(LetterTable::Latinized, CompletenessPolicy::NonEmpty);
        assert_eq!(e.validate_complete("123", "ABC"), ValidationResult::NonEmpty);
        assert!(e.validate_complete("", "A").is_pass());
        assert_eq!(e.validate_complete("1234", "ABC"), ValidationResult::Complete);
        assert_eq!(e.validate_complete(" ", ""), ValidationResult::Incomplete);
    }

    #[test]
    fn ligature_tatweel_is_not_counted() {
        assert_eq!(symbol_count("هـ ب د"), 3);
        assert_eq!(symbol_count("1 2 3 4"), 4);
    }
}
