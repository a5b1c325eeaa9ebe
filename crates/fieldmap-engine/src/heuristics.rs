//! Similarity primitives used by the scoring cascade.
//!
//! Each function is pure and returns a raw similarity; the weights that turn
//! similarities into confidences live in [`ScoreWeights`](crate::ScoreWeights).

use std::collections::BTreeMap;

use fieldmap_model::ColumnType;
use rapidfuzz::distance::levenshtein;

/// Normalized Levenshtein similarity: `1 - distance / max(len)`.
///
/// Returns the similarity and the raw edit distance.
pub fn edit_similarity(a: &str, b: &str) -> (f64, usize) {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return (0.0, 0);
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    (1.0 - distance as f64 / longest as f64, distance)
}

/// Sound-alike signature: vowels and `h`/`w`/`y` dropped, consonants
/// replaced by their class digit, adjacent repeats collapsed.
///
/// `"place"` → `"142"`, `"plase"` → `"142"`.
pub fn phonetic_signature(raw: &str) -> String {
    let mut signature = String::new();
    let mut last = None;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        let code = match ch {
            'b' | 'f' | 'p' | 'v' => Some('1'),
            'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
            'd' | 't' => Some('3'),
            'l' => Some('4'),
            'm' | 'n' => Some('5'),
            'r' => Some('6'),
            _ => None,
        };
        if let Some(code) = code {
            if last != Some(code) {
                signature.push(code);
            }
            last = Some(code);
        }
    }
    signature
}

/// Shared-character mass over the longer string, on compacted names.
pub fn histogram_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    let counts = |s: &str| {
        let mut map: BTreeMap<char, usize> = BTreeMap::new();
        for ch in s.chars() {
            *map.entry(ch).or_insert(0) += 1;
        }
        map
    };
    let left = counts(a);
    let right = counts(b);
    let shared: usize = left
        .iter()
        .map(|(ch, n)| (*n).min(right.get(ch).copied().unwrap_or(0)))
        .sum();
    shared as f64 / longest as f64
}

/// Ratio of the shorter length to the longer one.
pub fn length_ratio(a: &str, b: &str) -> f64 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let longest = la.max(lb);
    if longest == 0 {
        return 0.0;
    }
    la.min(lb) as f64 / longest as f64
}

/// Multiplier for storing a column of `source` type in a field of `target` type.
///
/// Identical types and empty columns (no type evidence) multiply by 1.0.
/// Known-compatible pairs fall between 0.8 and 0.98. Every other pair gets
/// `floor`, so no combination is rejected outright.
pub fn type_compatibility(source: ColumnType, target: ColumnType, floor: f64) -> f64 {
    use ColumnType as T;

    if source == target || source == T::Empty || target == T::Empty {
        return 1.0;
    }
    let factor = match (source, target) {
        (T::Numeric, T::Integer | T::Decimal) | (T::Integer | T::Decimal, T::Numeric) => 0.98,
        (T::Integer, T::Decimal) | (T::Decimal, T::Integer) => 0.95,
        (T::Date, T::DateTime) | (T::DateTime, T::Date) => 0.95,
        (T::Categorical, T::Text) => 0.95,
        (T::Text, T::Categorical) => 0.9,
        (T::MixedNumeric, T::Text) => 0.9,
        (T::Time, T::Numeric | T::Decimal) => 0.9,
        (T::MixedNumeric, T::Numeric | T::Integer | T::Decimal) => 0.85,
        (T::Time, T::Text | T::Integer) => 0.85,
        (T::Numeric | T::Integer | T::Decimal, T::Text | T::Categorical) => 0.85,
        (T::Numeric | T::Decimal, T::Time) => 0.85,
        (T::Time, T::DateTime) => 0.8,
        (T::Date, T::Text) => 0.8,
        (T::MixedNumeric, T::Categorical) => 0.8,
        (T::Categorical, T::Numeric | T::Integer) => 0.8,
        _ => floor,
    };
    factor.max(floor)
}
