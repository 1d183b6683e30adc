// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of digits a plate carries.
pub const MAX_DIGITS: usize = 4;
/// Maximum number of letters a plate carries.
pub const MAX_LETTERS: usize = 3;

/// The writing system a field is edited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Arabic,
    Latin,
}

impl Script {
    pub fn opposite(self) -> Self {
        match self {
            Script::Arabic => Script::Latin,
            Script::Latin => Script::Arabic,
        }
    }
}

/// Which half of the plate a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Digits,
    Letters,
}

/// One of the four mirrored text inputs of the plate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateField {
    NumbersArabic,
    NumbersLatin,
    LettersArabic,
    LettersLatin,
}

impl PlateField {
    pub const ALL: [PlateField; 4] = [
        PlateField::NumbersArabic,
        PlateField::NumbersLatin,
        PlateField::LettersArabic,
        PlateField::LettersLatin,
    ];

    pub fn new(segment: Segment, script: Script) -> Self {
        match (segment, script) {
            (Segment::Digits, Script::Arabic) => PlateField::NumbersArabic,
            (Segment::Digits, Script::Latin) => PlateField::NumbersLatin,
            (Segment::Letters, Script::Arabic) => PlateField::LettersArabic,
            (Segment::Letters, Script::Latin) => PlateField::LettersLatin,
        }
    }

    pub fn segment(self) -> Segment {
        match self {
            PlateField::NumbersArabic | PlateField::NumbersLatin => Segment::Digits,
            PlateField::LettersArabic | PlateField::LettersLatin => Segment::Letters,
        }
    }

    pub fn script(self) -> Script {
        match self {
            PlateField::NumbersArabic | PlateField::LettersArabic => Script::Arabic,
            PlateField::NumbersLatin | PlateField::LettersLatin => Script::Latin,
        }
    }

    /// The field holding the same segment in the other script.
    pub fn mirror(self) -> Self {
        Self::new(self.segment(), self.script().opposite())
    }

    /// Wire name used by the line bridge (`NUM_AR`, `CHAR_EN`, ...).
    pub fn wire_name(self) -> &'static str {
        match self {
            PlateField::NumbersArabic => "NUM_AR",
            PlateField::NumbersLatin => "NUM_EN",
            PlateField::LettersArabic => "CHAR_AR",
            PlateField::LettersLatin => "CHAR_EN",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PlateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Result of one engine run: the re-rendered edited field and its mirror.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub source: String,
    pub target: String,
}

/// Which completeness rule a search submission must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessPolicy {
    /// Exactly four digits and three letters.
    #[default]
    Strict,
    /// At least one of the two segments holds something.
    NonEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Complete,
    Incomplete,
    NonEmpty,
}

impl ValidationResult {
    /// Whether a submission with this result may go on to the lookup.
    pub fn is_pass(self) -> bool {
        matches!(self, ValidationResult::Complete | ValidationResult::NonEmpty)
    }
}

/// A plate as read off the two Latin fields at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plate {
    pub digits: String,
    pub letters: String,
}

impl Plate {
    /// Builds a plate from display values, dropping the separator spaces.
    pub fn from_display(digits: &str, letters: &str) -> Self {
        Self {
            digits: digits.chars().filter(|c| !c.is_whitespace()).collect(),
            letters: letters.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty() && self.letters.is_empty()
    }

    /// Backend query key: digits then letters, no separator.
    pub fn query(&self) -> String {
        format!("{}{}", self.digits, self.letters)
    }

    /// Human display form, e.g. `1234 ABD` or `506` alone.
    pub fn display(&self) -> String {
        format!("{} {}", self.digits, self.letters).trim().to_string()
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
