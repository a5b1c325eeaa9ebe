//! Name normalization shared by the heuristics.

/// Splits a name into lowercase word tokens.
///
/// Separators (`_`, `-`, `.`, `/`, whitespace and any other punctuation)
/// break tokens, and so does a lower-to-upper case change (`finishTime`).
pub fn tokens(raw: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                spaced.push(' ');
            }
            spaced.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            spaced.push(' ');
            prev_lower = false;
        }
    }
    spaced
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Lowercases and rejoins tokens with single spaces: `"Finish_Time"` → `"finish time"`.
pub fn normalize_text(raw: &str) -> String {
    tokens(raw).join(" ")
}

/// Lowercase alphanumerics only: `"Finish_Time"` → `"finishtime"`.
pub fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case-insensitive equality of trimmed names.
pub fn names_equal(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// True when `term` occurs in `normalized` as a whole-word sequence.
///
/// Both arguments must already be normalized with [`normalize_text`].
pub fn contains_words(normalized: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    format!(" {normalized} ").contains(&format!(" {term} "))
}
