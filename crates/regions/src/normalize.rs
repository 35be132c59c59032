//! Region name normalization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes a region name for cross-hierarchy comparison.
///
/// Decomposes to NFD and drops combining marks, case-folds, replaces
/// punctuation with spaces and collapses runs of whitespace. Digits are
/// kept. Composed and decomposed spellings of a name normalize alike.
///
/// ```
/// use hmhews_regions::normalize_name;
///
/// assert_eq!(normalize_name("  KOTA   Bandung "), "kota bandung");
/// assert_eq!(normalize_name("Bangka-Belitung"), "bangka belitung");
/// assert_eq!(normalize_name("Pangkajene dan Kepulauan."), "pangkajene dan kepulauan");
/// assert_eq!(normalize_name("Gorontalo Utára"), "gorontalo utara");
/// ```
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    let letters = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);
    for ch in letters {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            // whitespace and punctuation both separate words
            pending_space = true;
        }
    }
    out
}
