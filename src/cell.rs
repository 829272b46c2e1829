//! Cell-level normalization shared by every pipeline stage.
//!
//! The legacy export separates the atoms of a multivalued cell with commas
//! and escapes literal commas as `\,`. Downstream everything is keyed on the
//! pipe, so the first thing done to a cell is [`unescape_delimiters`].
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::cell;
//!
//! let cell = cell::unescape_delimiters(r"Smith\, Jane,Jones\, Bob");
//! assert_eq!(cell, "Smith, Jane|Jones, Bob");
//! assert_eq!(cell::split_multi(&cell), vec!["Smith, Jane", "Jones, Bob"]);
//! ```

/// Separator between the atoms of a multivalued cell.
pub const DELIMITER: char = '|';

/// Separator as a string slice, for joining.
pub const DELIMITER_STR: &str = "|";

const ESCAPE: char = '\\';
const LEGACY_DELIMITER: char = ',';

/// Replace delimiter commas with pipes and unescape `\,` to a literal comma.
///
/// A backslash not followed by a comma is kept as-is.
#[must_use]
pub fn unescape_delimiters(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE if chars.peek() == Some(&LEGACY_DELIMITER) => {
                chars.next();
                out.push(LEGACY_DELIMITER);
            },
            LEGACY_DELIMITER => out.push(DELIMITER),
            _ => out.push(c),
        }
    }
    out
}

/// Replace curly double quotes with the straight double quote.
#[must_use]
pub fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}'], "\"")
}

/// Split a multivalued cell into its atoms. An empty cell has no atoms.
#[must_use]
pub fn split_multi(cell: &str) -> Vec<&str> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(DELIMITER).collect()
    }
}

/// Join atoms into a multivalued cell, dropping empty atoms.
#[must_use]
pub fn join_multi<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(DELIMITER);
        }
        out.push_str(value);
    }
    out
}

/// Apply `f` to every atom of a cell and rejoin. Empty cells stay empty.
#[must_use]
pub fn map_atoms<F>(cell: &str, f: F) -> String
where
    F: FnMut(&str) -> String,
{
    split_multi(cell)
        .into_iter()
        .map(f)
        .collect::<Vec<_>>()
        .join(DELIMITER_STR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unescape_plain_comma() {
        assert_eq!(unescape_delimiters("a,b"), "a|b");
    }

    #[test]
    fn test_unescape_escaped_comma() {
        assert_eq!(unescape_delimiters(r"a\,b"), "a,b");
    }

    #[test]
    fn test_unescape_mixed() {
        assert_eq!(unescape_delimiters(r"a\,b,c"), "a,b|c");
        assert_eq!(unescape_delimiters("a,,b"), "a||b");
        assert_eq!(unescape_delimiters(r"C:\dir"), r"C:\dir");
    }

    #[test]
    fn test_unescape_empty() {
        assert_eq!(unescape_delimiters(""), "");
    }

    #[test]
    fn test_normalize_quotes() {
        assert_eq!(
            normalize_quotes("\u{201C}quoted\u{201D} text"),
            "\"quoted\" text"
        );
        // Single curly quotes are left alone
        assert_eq!(normalize_quotes("it\u{2019}s"), "it\u{2019}s");
    }

    #[test]
    fn test_split_multi() {
        assert!(split_multi("").is_empty());
        assert_eq!(split_multi("a"), vec!["a"]);
        assert_eq!(split_multi("a|b"), vec!["a", "b"]);
    }

    #[test]
    fn test_join_multi_drops_blanks() {
        assert_eq!(join_multi(["a", "", "b"]), "a|b");
        assert_eq!(join_multi(["", ""]), "");
        assert_eq!(join_multi(Vec::<String>::new()), "");
    }

    #[test]
    fn test_map_atoms() {
        assert_eq!(map_atoms("a|b", |v| format!("({v})")), "(a)|(b)");
        assert_eq!(map_atoms("", |v| format!("({v})")), "");
    }

    proptest! {
        #[test]
        fn prop_unescaped_commas_become_pipes(s in "[a-z ,|]{0,40}") {
            let out = unescape_delimiters(&s);
            prop_assert_eq!(out, s.replace(',', "|"));
        }

        #[test]
        fn prop_escaped_commas_survive(parts in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
            let raw = parts.join(r"\,");
            prop_assert_eq!(unescape_delimiters(&raw), parts.join(","));
        }
    }
}
