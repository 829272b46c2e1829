//! Normalization of legacy date strings toward EDTF.
//!
//! Catalogers entered dates in a handful of textual conventions. Each
//! convention is recognized by a prefix pattern; the first pattern that
//! matches decides how the string is rewritten. When a pattern matches but
//! the string is not a real calendar date, or carries trailing text the
//! rewrite cannot account for, the input is returned unchanged. Nothing in
//! this module fails.
//!
//! | Input                  | Output       |
//! |------------------------|--------------|
//! | `1920-1930`            | `1920/1930`  |
//! | `1920-05-7`            | `1920-05-07` |
//! | `1920-5-07`            | `1920-05-07` |
//! | `March 5, 1920`        | `1920-03-05` |
//! | `1920 March 5`         | `1920-03-05` |
//! | `1920, March`          | `1920-03`    |
//! | `March 1920`           | `1920-03`    |
//! | `[1920]`               | `1920?`      |
//! | `1920-[05]`            | `1920-?05`   |
//! | `1920-05-[07]`         | `1920-05-?07`|
//!
//! Whether the result is valid EDTF is a separate question, answered by
//! [`crate::edtf::is_valid`].

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

lazy_static! {
    // Classifiers, anchored at the start only
    static ref YEAR_RANGE: Regex = Regex::new(r"^\d{4}-\d{4}").unwrap();
    static ref YEAR_RANGE_SUB: Regex = Regex::new(r"(\d{4})-(\d{4})").unwrap();
    static ref SHORT_DAY: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d)$").unwrap();
    static ref SHORT_MONTH: Regex = Regex::new(r"^\d{4}-\d-\d\d").unwrap();
    static ref SHORT_MONTH_SUB: Regex = Regex::new(r"(\d{4})-(\d)-(\d\d)").unwrap();
    static ref MDY: Regex = Regex::new(
        r"^(Jan(uary)?|Feb(ruary)?|Mar(ch)?|Apr(il)?|May|Jun(e)?|Jul(y)?|Aug(ust)?|Sep(tember)?|Oct(ober)?|Nov(ember)?|Dec(ember)?)\s+\d{1,2},\s+\d{4}"
    )
    .unwrap();
    static ref YMD: Regex = Regex::new(&format!(r"^\d{{4}}\s{}\s\d{{1,2}}", month_alternation())).unwrap();
    static ref YMD_COMMA: Regex =
        Regex::new(&format!(r"^\d{{4}},\s{}\s\d{{1,2}}", month_alternation())).unwrap();
    static ref YM: Regex = Regex::new(&format!(r"^\d{{4}}\s{}", month_alternation())).unwrap();
    static ref YM_COMMA: Regex = Regex::new(&format!(r"^\d{{4}},\s{}", month_alternation())).unwrap();
    static ref MY: Regex = Regex::new(&format!(r"^{}\s\d{{4}}", month_alternation())).unwrap();
    static ref BRACKET_YEAR: Regex = Regex::new(r"^\[\d{4}\]").unwrap();
    static ref BRACKET_MONTH: Regex = Regex::new(r"^\d{4}-\[\d{2}\]").unwrap();
    static ref BRACKET_DAY: Regex = Regex::new(r"^\d{4}-\d{2}-\[\d{2}\]").unwrap();

    // Full-string parsers used once a classifier has matched
    static ref PARSE_MDY: Regex = Regex::new(r"^([A-Za-z]+)\s+(\d{1,2}),\s+(\d{4})$").unwrap();
    static ref PARSE_YMD: Regex = Regex::new(r"^(\d{4})\s+([A-Za-z]+)\s+(\d{1,2})$").unwrap();
    static ref PARSE_YMD_COMMA: Regex =
        Regex::new(r"^(\d{4}),\s+([A-Za-z]+)\s+(\d{1,2})$").unwrap();
    static ref PARSE_YM: Regex = Regex::new(r"^(\d{4})\s+([A-Za-z]+)$").unwrap();
    static ref PARSE_YM_COMMA: Regex = Regex::new(r"^(\d{4}),\s+([A-Za-z]+)$").unwrap();
    static ref PARSE_MY: Regex = Regex::new(r"^([A-Za-z]+)\s+(\d{4})$").unwrap();
}

fn month_alternation() -> String {
    let names: Vec<String> = MONTHS
        .iter()
        .map(|m| {
            let mut chars = m.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();
    format!("({})", names.join("|"))
}

/// Month number for a full English month name, case-insensitive.
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .and_then(|i| u32::try_from(i + 1).ok())
}

fn ymd_string(year: &str, month: &str, day: &str) -> Option<String> {
    let year: i32 = year.parse().ok()?;
    let month = month_number(month)?;
    let day: u32 = day.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn ym_string(year: &str, month: &str) -> Option<String> {
    let year: i32 = year.parse().ok()?;
    let month = month_number(month)?;
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(format!("{year:04}-{month:02}"))
}

/// Parse `cell` with `parser` and build the canonical form from its captures
/// in `(year, month, day)` order given by `order`.
fn reparse(cell: &str, parser: &Regex, order: [usize; 3]) -> Option<String> {
    let caps = parser.captures(cell)?;
    let [y, m, d] = order;
    let year = caps.get(y)?.as_str();
    let month = caps.get(m)?.as_str();
    if d == 0 {
        ym_string(year, month)
    } else {
        ymd_string(year, month, caps.get(d)?.as_str())
    }
}

/// Rewrite a legacy date string into EDTF form where a known convention
/// applies. Returns the input unchanged otherwise.
///
/// # Examples
///
/// ```
/// use diglib_migrate::date::normalize_date;
///
/// assert_eq!(normalize_date("March 5, 1920"), "1920-03-05");
/// assert_eq!(normalize_date("1920 March"), "1920-03");
/// assert_eq!(normalize_date("1920-03-05"), "1920-03-05");
/// assert_eq!(normalize_date("circa 1920"), "circa 1920");
/// ```
#[must_use]
pub fn normalize_date(cell: &str) -> String {
    if YEAR_RANGE.is_match(cell) {
        return YEAR_RANGE_SUB.replace_all(cell, "$1/$2").into_owned();
    }
    if let Some(caps) = SHORT_DAY.captures(cell) {
        return format!("{}-{}-0{}", &caps[1], &caps[2], &caps[3]);
    }
    if SHORT_MONTH.is_match(cell) {
        return SHORT_MONTH_SUB.replace_all(cell, "$1-0$2-$3").into_owned();
    }

    let written = if MDY.is_match(cell) {
        Some(reparse(cell, &PARSE_MDY, [3, 1, 2]))
    } else if YMD.is_match(cell) {
        Some(reparse(cell, &PARSE_YMD, [1, 2, 3]))
    } else if YMD_COMMA.is_match(cell) {
        Some(reparse(cell, &PARSE_YMD_COMMA, [1, 2, 3]))
    } else if YM.is_match(cell) {
        Some(reparse(cell, &PARSE_YM, [1, 2, 0]))
    } else if YM_COMMA.is_match(cell) {
        Some(reparse(cell, &PARSE_YM_COMMA, [1, 2, 0]))
    } else if MY.is_match(cell) {
        Some(reparse(cell, &PARSE_MY, [2, 1, 0]))
    } else {
        None
    };
    if let Some(parsed) = written {
        return parsed.unwrap_or_else(|| cell.to_string());
    }

    if BRACKET_YEAR.is_match(cell) {
        return cell.replace('[', "").replace(']', "?");
    }
    if BRACKET_MONTH.is_match(cell) || BRACKET_DAY.is_match(cell) {
        return cell.replace('[', "?").replace(']', "");
    }
    cell.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_year_range() {
        assert_eq!(normalize_date("1920-1930"), "1920/1930");
        assert_eq!(normalize_date("1920-1930, 1940-1950"), "1920/1930, 1940/1950");
    }

    #[test]
    fn test_short_day_padded() {
        assert_eq!(normalize_date("1920-05-7"), "1920-05-07");
    }

    #[test]
    fn test_short_month_padded() {
        assert_eq!(normalize_date("1920-5-07"), "1920-05-07");
    }

    #[test]
    fn test_short_month_and_day_untouched() {
        assert_eq!(normalize_date("1920-5-7"), "1920-5-7");
    }

    #[test]
    fn test_month_day_year() {
        assert_eq!(normalize_date("March 5, 1920"), "1920-03-05");
        assert_eq!(normalize_date("December 25, 1999"), "1999-12-25");
    }

    #[test]
    fn test_abbreviated_month_day_year_unchanged() {
        // Recognized as the written-month convention but not a full month name
        assert_eq!(normalize_date("Mar 5, 1920"), "Mar 5, 1920");
    }

    #[test]
    fn test_impossible_calendar_date_unchanged() {
        assert_eq!(normalize_date("February 30, 1920"), "February 30, 1920");
        assert_eq!(normalize_date("1921 February 29"), "1921 February 29");
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(normalize_date("February 29, 1920"), "1920-02-29");
    }

    #[test]
    fn test_year_month_day() {
        assert_eq!(normalize_date("1920 March 5"), "1920-03-05");
        assert_eq!(normalize_date("1920, March 5"), "1920-03-05");
    }

    #[test]
    fn test_year_month() {
        assert_eq!(normalize_date("1920 March"), "1920-03");
        assert_eq!(normalize_date("1920, March"), "1920-03");
    }

    #[test]
    fn test_month_year() {
        assert_eq!(normalize_date("March 1920"), "1920-03");
    }

    #[test]
    fn test_trailing_text_unchanged() {
        assert_eq!(normalize_date("March 5, 1920 (approx.)"), "March 5, 1920 (approx.)");
        assert_eq!(normalize_date("1920 March 5th"), "1920 March 5th");
    }

    #[test]
    fn test_bracketed_year() {
        assert_eq!(normalize_date("[1920]"), "1920?");
    }

    #[test]
    fn test_bracketed_month() {
        assert_eq!(normalize_date("1920-[05]"), "1920-?05");
    }

    #[test]
    fn test_bracketed_day() {
        assert_eq!(normalize_date("1920-05-[07]"), "1920-05-?07");
    }

    #[test]
    fn test_no_match_unchanged() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("circa 1920"), "circa 1920");
        assert_eq!(normalize_date("1920"), "1920");
        assert_eq!(normalize_date("1920-05"), "1920-05");
    }

    proptest! {
        #[test]
        fn prop_canonical_dates_are_fixed_points(
            year in 1000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let canonical = format!("{year:04}-{month:02}-{day:02}");
            prop_assert_eq!(normalize_date(&canonical), canonical.clone());
            let again = normalize_date(&normalize_date(&canonical));
            prop_assert_eq!(again, canonical);
        }

        #[test]
        fn prop_never_panics(s in "\\PC{0,30}") {
            let _ = normalize_date(&s);
        }
    }
}
