// File: src/core/context.rs
use crate::core::engine::PlateTransliterationEngine;
use crate::core::types::{FieldUpdate, Plate, PlateField};
use serde::{Deserialize, Serialize};

/// The four mirrored buffers of the plate form.
///
/// Only [`PlateFieldState::apply_edit`] writes to them, so after every edit
/// the edited field and its mirror describe the same segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateFieldState {
    numbers_arabic: String,
    numbers_latin: String,
    letters_arabic: String,
    letters_latin: String,
}

impl PlateFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: PlateField) -> &str {
        match field {
            PlateField::NumbersArabic => &self.numbers_arabic,
            PlateField::NumbersLatin => &self.numbers_latin,
            PlateField::LettersArabic => &self.letters_arabic,
            PlateField::LettersLatin => &self.letters_latin,
        }
    }

    fn slot(&mut self, field: PlateField) -> &mut String {
        match field {
            PlateField::NumbersArabic => &mut self.numbers_arabic,
            PlateField::NumbersLatin => &mut self.numbers_latin,
            PlateField::LettersArabic => &mut self.letters_arabic,
            PlateField::LettersLatin => &mut self.letters_latin,
        }
    }

    /// Runs `raw` through the engine and stores the result in `field` and
    /// its mirror. Returns the update so the UI can write both values back.
    pub fn apply_edit(
        &mut self,
        engine: &PlateTransliterationEngine,
        field: PlateField,
        raw: &str,
    ) -> FieldUpdate {
        let update = engine.update(field, raw);
        *self.slot(field) = update.source.clone();
        *self.slot(field.mirror()) = update.target.clone();
        update
    }

    /// The plate as read off the Latin fields.
    pub fn plate(&self) -> Plate {
        Plate::from_display(&self.numbers_latin, &self.letters_latin)
    }

    pub fn is_empty(&self) -> bool {
        PlateField::ALL.iter().all(|&f| self.get(f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Re-derives every mirror from its partner and reports whether the
    /// buffers already agree.
    pub fn is_consistent(&self, engine: &PlateTransliterationEngine) -> bool {
        PlateField::ALL.iter().all(|&field| {
            let update = engine.update(field, self.get(field));
            update.source == self.get(field) && update.target == self.get(field.mirror())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_writes_field_and_mirror() {
        let engine = PlateTransliterationEngine::default();
        let mut state = PlateFieldState::new();
        state.apply_edit(&engine, PlateField::NumbersArabic, "٩٠٩٠");
        assert_eq!(state.get(PlateField::NumbersArabic), "٩ ٠ ٩ ٠");
        assert_eq!(state.get(PlateField::NumbersLatin), "9 0 9 0");
        assert_eq!(state.get(PlateField::LettersLatin), "");
    }

    #[test]
    fn settled_state_is_consistent() {
        let engine = PlateTransliterationEngine::default();
        let mut state = PlateFieldState::new();
        state.apply_edit(&engine, PlateField::NumbersLatin, "9090");
        state.apply_edit(&engine, PlateField::LettersLatin, "rbx");
        assert!(state.is_consistent(&engine));

        state.apply_edit(&engine, PlateField::LettersArabic, "أبد");
        assert!(state.is_consistent(&engine));
        assert_eq!(state.plate().query(), "9090DBA");
    }

    #[test]
    fn clear_empties_every_buffer() {
        let engine = PlateTransliterationEngine::default();
        let mut state = PlateFieldState::new();
        state.apply_edit(&engine, PlateField::LettersLatin, "HHH");
        assert!(!state.is_empty());
        state.clear();
        assert!(state.is_empty());
        assert!(state.plate().is_empty());
    }
}
