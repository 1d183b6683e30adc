// C ABI over the transliteration engine for embedding in a native form.
// Strings returned to the caller must be released with `plate_free_string`.
use crate::core::converter::LetterTable;
use crate::core::engine::PlateTransliterationEngine;
use crate::core::types::{CompletenessPolicy, PlateField, ValidationResult};
use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::OnceLock;
use tracing::error;

static ENGINE: OnceLock<PlateTransliterationEngine> = OnceLock::new();

fn engine() -> &'static PlateTransliterationEngine {
    ENGINE.get_or_init(PlateTransliterationEngine::default)
}

fn field_from_code(code: c_int) -> Option<PlateField> {
    match code {
        0 => Some(PlateField::NumbersArabic),
        1 => Some(PlateField::NumbersLatin),
        2 => Some(PlateField::LettersArabic),
        3 => Some(PlateField::LettersLatin),
        _ => None,
    }
}

unsafe fn read_str<'a>(s: *const c_char) -> &'a str {
    if s.is_null() {
        return "";
    }
    CStr::from_ptr(s).to_str().unwrap_or("")
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).map(CString::into_raw).unwrap_or(ptr::null_mut())
}

/// Selects the letter table (0 = standard, 1 = latinized). Only the first
/// call has an effect; returns 0 when the table was already fixed.
#[no_mangle]
pub extern "C" fn plate_engine_init(letter_table: c_int) -> c_int {
    let table = match letter_table {
        1 => LetterTable::Latinized,
        _ => LetterTable::Standard,
    };
    let engine = PlateTransliterationEngine::new(table, CompletenessPolicy::Strict);
    c_int::from(ENGINE.set(engine).is_ok())
}

/// Runs an edit of field `field` (0 = NUM_AR, 1 = NUM_EN, 2 = CHAR_AR,
/// 3 = CHAR_EN) and returns `{"source": ..., "target": ...}` as JSON, or
/// null for an unknown field.
///
/// # Safety
///
/// `raw` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn plate_update_field(field: c_int, raw: *const c_char) -> *mut c_char {
    let Some(field) = field_from_code(field) else {
        return ptr::null_mut();
    };
    let raw = read_str(raw);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let update = engine().update(field, raw);
        serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string())
    }));
    match result {
        Ok(json) => into_c_string(json),
        Err(_) => {
            error!("panic in plate_update_field");
            ptr::null_mut()
        }
    }
}

/// Returns 1 for a complete plate, 2 for a partial plate accepted by the
/// non-empty policy (`policy` = 1), 0 otherwise.
///
/// # Safety
///
/// Both pointers must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn plate_validate(
    digits: *const c_char,
    letters: *const c_char,
    policy: c_int,
) -> c_int {
    let policy = match policy {
        1 => CompletenessPolicy::NonEmpty,
        _ => CompletenessPolicy::Strict,
    };
    let engine = PlateTransliterationEngine::new(LetterTable::default(), policy);
    match engine.validate_complete(read_str(digits), read_str(letters)) {
        ValidationResult::Incomplete => 0,
        ValidationResult::Complete => 1,
        ValidationResult::NonEmpty => 2,
    }
}

/// # Safety
///
/// `s` must be null or a pointer returned by this library.
#[no_mangle]
pub unsafe extern "C" fn plate_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_returns_json_pair() {
        let raw = CString::new("1 2 3 4").unwrap();
        unsafe {
            let out = plate_update_field(1, raw.as_ptr());
            assert!(!out.is_null());
            let json = CStr::from_ptr(out).to_str().unwrap().to_string();
            plate_free_string(out);
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["source"], "1 2 3 4");
            assert_eq!(value["target"], "١ ٢ ٣ ٤");
        }
    }

    #[test]
    fn unknown_field_is_null() {
        unsafe {
            assert!(plate_update_field(7, ptr::null()).is_null());
        }
    }

    #[test]
    fn validate_codes() {
        let digits = CString::new("123").unwrap();
        let letters = CString::new("ABD").unwrap();
        unsafe {
            assert_eq!(plate_validate(digits.as_ptr(), letters.as_ptr(), 0), 0);
            assert_eq!(plate_validate(digits.as_ptr(), letters.as_ptr(), 1), 2);
            assert_eq!(plate_validate(ptr::null(), ptr::null(), 1), 0);
        }
    }
}
