// src/core/converter.rs
use serde::{Deserialize, Serialize};

pub const ALIF: char = 'ا';
pub const ALIF_HAMZA: char = 'أ';
pub const TATWEEL: char = 'ـ';

/// Latin <-> Arabic-Indic digit table.
pub struct DigitMap;

impl DigitMap {
    pub fn to_arabic(c: char) -> Option<char> {
        match c {
            '0' => Some('٠'), '1' => Some('١'), '2' => Some('٢'),
            '3' => Some('٣'), '4' => Some('٤'), '5' => Some('٥'),
            '6' => Some('٦'), '7' => Some('٧'), '8' => Some('٨'),
            '9' => Some('٩'),
            _ => None,
        }
    }

    pub fn to_latin(c: char) -> Option<char> {
        match c {
            '٠' => Some('0'), '١' => Some('1'), '٢' => Some('2'),
            '٣' => Some('3'), '٤' => Some('4'), '٥' => Some('5'),
            '٦' => Some('6'), '٧' => Some('7'), '٨' => Some('8'),
            '٩' => Some('9'),
            _ => None,
        }
    }
}

/// One plate letter in both scripts. The Arabic side is a `&str` because
/// the H letter is written with the two-glyph ligature `هـ`.
#[derive(Debug, PartialEq, Eq)]
pub struct LetterPair {
    pub arabic: &'static str,
    pub latin: char,
}

const fn pair(arabic: &'static str, latin: char) -> LetterPair {
    LetterPair { arabic, latin }
}

static STANDARD: [LetterPair; 17] = [
    pair("أ", 'A'), pair("ب", 'B'), pair("ح", 'J'), pair("د", 'D'),
    pair("ر", 'R'), pair("س", 'S'), pair("ص", 'X'), pair("ط", 'T'),
    pair("ع", 'E'), pair("ق", 'G'), pair("ك", 'K'), pair("ل", 'L'),
    pair("م", 'Z'), pair("ن", 'N'), pair("هـ", 'H'), pair("و", 'U'),
    pair("ى", 'V'),
];

static LATINIZED: [LetterPair; 17] = [
    pair("أ", 'A'), pair("ب", 'B'), pair("ج", 'J'), pair("د", 'D'),
    pair("ر", 'R'), pair("س", 'S'), pair("ص", 'C'), pair("ط", 'T'),
    pair("ع", 'E'), pair("ق", 'G'), pair("ك", 'K'), pair("ل", 'L'),
    pair("م", 'M'), pair("ن", 'N'), pair("هـ", 'H'), pair("و", 'U'),
    pair("ى", 'I'),
];

/// The named letter tables. Only one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterTable {
    /// The plate alphabet in current use (ح→J, ص→X, م→Z, ى→V).
    #[default]
    Standard,
    /// Phonetic variant (ج→J, ص→C, م→M, ى→I).
    Latinized,
}

/// Bijection between the permitted Arabic and Latin plate letters.
#[derive(Debug, Clone, Copy)]
pub struct LetterMap {
    pairs: &'static [LetterPair],
}

impl LetterMap {
    pub fn new(table: LetterTable) -> Self {
        let pairs: &'static [LetterPair] = match table {
            LetterTable::Standard => &STANDARD,
            LetterTable::Latinized => &LATINIZED,
        };
        Self { pairs }
    }

    /// Looks up a letter by its leading Arabic glyph, so both `ه` and
    /// the ligature `هـ` resolve to H.
    pub fn by_arabic(&self, glyph: char) -> Option<&'static LetterPair> {
        self.pairs
            .iter()
            .find(|p| p.arabic.chars().next() == Some(glyph))
    }

    /// Case-sensitive: callers uppercase Latin input first.
    pub fn by_latin(&self, c: char) -> Option<&'static LetterPair> {
        self.pairs.iter().find(|p| p.latin == c)
    }

    pub fn pairs(&self) -> &'static [LetterPair] {
        self.pairs
    }
}

impl Default for LetterMap {
    fn default() -> Self {
        Self::new(LetterTable::default())
    }
}
