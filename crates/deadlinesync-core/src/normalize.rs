//! Text cleanup applied before pattern matching.
//!
//! PDF extraction leaves invisible and look-alike characters in the text
//! (soft hyphens, zero-width spaces, typographic dashes). They break the date
//! and keyword patterns, so they are removed or folded here.

/// Characters removed outright.
const DROPPED: [char; 6] = [
    '\u{00AD}', // soft hyphen
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte-order mark
];

/// Dashes folded into an ASCII hyphen.
const DASHES: [char; 2] = ['\u{2013}', '\u{2014}'];

/// Removes invisible characters and folds en/em dashes into `-`.
///
/// No other change is made: case and whitespace are left alone.
///
/// # Example
///
/// ```
/// use deadlinesync_core::normalize_text;
///
/// assert_eq!(normalize_text("Mid\u{00AD}term 2\u{2013}3pm"), "Midterm 2-3pm");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !DROPPED.contains(c))
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect()
}
