//! Category label cleanup

use crate::error::CategoryError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\x{1F300}-\x{1F9FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{1F1E0}-\x{1F1FF}",
        r"\x{1FA00}-\x{1FAFF}\x{2190}-\x{21FF}\x{2300}-\x{23FF}\x{2B50}-\x{2B55}",
        r"\x{3030}-\x{303F}\x{FE00}-\x{FE0F}\x{1F018}-\x{1F270}]",
    ))
    .expect("emoji pattern compiles")
});

/// Remove emoji and pictographs, then trim
#[must_use]
pub fn strip_emoji(label: &str) -> String {
    EMOJI.replace_all(label, "").trim().to_string()
}

/// Clean a category label for storage
///
/// # Errors
/// Returns [`CategoryError::EmptyLabel`] if nothing is left after cleanup
pub fn clean_label(label: &str) -> Result<String, CategoryError> {
    let cleaned = strip_emoji(label.trim());
    if cleaned.is_empty() {
        Err(CategoryError::EmptyLabel)
    } else {
        Ok(cleaned)
    }
}

/// Default description for a category label
#[inline]
#[must_use]
pub fn description_for(label: &str) -> String {
    format!("{label} 관련 문의")
}
