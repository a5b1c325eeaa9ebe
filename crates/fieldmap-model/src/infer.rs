//! Column type inference from a preview of raw values.

use std::collections::BTreeSet;

use crate::enums::ColumnType;

/// Share of non-blank values that must agree for a uniform type.
const UNIFORM_RATIO_MIN: f64 = 0.9;
/// Share of numeric values above which a column counts as mixed-numeric.
const MIXED_NUMERIC_RATIO_MIN: f64 = 0.5;
/// Unique-to-total ratio at or below which text is categorical.
const CATEGORICAL_UNIQUE_RATIO_MAX: f64 = 0.5;
/// Minimum number of values before cardinality is trusted.
const CATEGORICAL_MIN_VALUES: usize = 4;

impl ColumnType {
    /// Classifies a column from its sample values.
    ///
    /// Blank values are ignored. A column is numeric when more than 90% of
    /// the remaining values parse as numbers, and time or date when more than
    /// 90% look like clock times or calendar dates.
    pub fn infer<S: AsRef<str>>(samples: &[S]) -> ColumnType {
        let values: Vec<&str> = samples
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();
        if values.is_empty() {
            return ColumnType::Empty;
        }

        let total = values.len() as f64;
        let ratio =
            |pred: fn(&str) -> bool| values.iter().copied().filter(|v| pred(v)).count() as f64 / total;

        let numeric = ratio(is_numeric);
        if numeric > UNIFORM_RATIO_MIN {
            return ColumnType::Numeric;
        }
        if ratio(is_time_like) > UNIFORM_RATIO_MIN {
            return ColumnType::Time;
        }
        if ratio(is_date_like) > UNIFORM_RATIO_MIN {
            return ColumnType::Date;
        }
        if numeric >= MIXED_NUMERIC_RATIO_MIN {
            return ColumnType::MixedNumeric;
        }

        let unique: BTreeSet<String> = values.iter().map(|v| v.to_lowercase()).collect();
        if values.len() >= CATEGORICAL_MIN_VALUES
            && unique.len() as f64 / total <= CATEGORICAL_UNIQUE_RATIO_MAX
        {
            return ColumnType::Categorical;
        }
        ColumnType::Text
    }
}

fn is_numeric(value: &str) -> bool {
    value.replace(',', "").parse::<f64>().is_ok()
}

/// `m:ss`, `h:mm:ss` with optional fractional seconds.
fn is_time_like(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return false;
    }
    let Some((last, leading)) = parts.split_last() else {
        return false;
    };
    let leading_ok = leading
        .iter()
        .all(|p| !p.is_empty() && p.len() <= 2 && p.chars().all(|c| c.is_ascii_digit()));
    let (whole, fraction) = last.split_once('.').unwrap_or((*last, "0"));
    leading_ok
        && whole.len() == 2
        && whole.chars().all(|c| c.is_ascii_digit())
        && !fraction.is_empty()
        && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Three numeric parts separated by `-`, `/` or `.`, one of them a year.
fn is_date_like(value: &str) -> bool {
    let date = value.split(['T', ' ']).next().unwrap_or(value);
    let parts: Vec<&str> = date.split(['-', '/', '.']).collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 4 && p.chars().all(|c| c.is_ascii_digit()))
        && parts.iter().any(|p| p.len() == 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_preview_is_empty() {
        assert_eq!(ColumnType::infer(&["", "  "]), ColumnType::Empty);
        assert_eq!(ColumnType::infer::<&str>(&[]), ColumnType::Empty);
    }

    #[test]
    fn detects_numbers_and_mixed_numbers() {
        assert_eq!(ColumnType::infer(&["1", "2", "3.5", "1,200"]), ColumnType::Numeric);
        assert_eq!(
            ColumnType::infer(&["1", "2", "DNF", "4"]),
            ColumnType::MixedNumeric
        );
    }

    #[test]
    fn detects_times_and_dates() {
        assert_eq!(
            ColumnType::infer(&["1:02.33", "0:59.10", "1:00:01"]),
            ColumnType::Time
        );
        assert_eq!(
            ColumnType::infer(&["2024-03-01", "01/02/2023", "2022-12-31T10:00"]),
            ColumnType::Date
        );
    }

    #[test]
    fn low_cardinality_text_is_categorical() {
        assert_eq!(
            ColumnType::infer(&["F", "M", "F", "M", "F"]),
            ColumnType::Categorical
        );
        assert_eq!(
            ColumnType::infer(&["Ann", "Bob", "Cid", "Dee"]),
            ColumnType::Text
        );
    }
}
