//! Syntax validation of dates and URLs, and the flagging rules applied when a
//! value fails.
//!
//! Validation never rejects a record. A failing value is either moved to a
//! free-text fallback column or kept in place behind a leading `@`, which the
//! ingest team treats as "needs manual review".

use url::{Host, Url};

use crate::cell::map_atoms;
use crate::edtf;

/// Prefix marking a value for manual review.
pub const REVIEW_FLAG: &str = "@";

/// Schemes accepted for collection links.
const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

const PUNYCODE_PREFIX: &str = "xn--";

/// Prefix a value with the manual-review flag.
#[must_use]
pub fn flag(value: &str) -> String {
    format!("{REVIEW_FLAG}{value}")
}

/// Whether a string is a syntactically valid EDTF date.
#[must_use]
pub fn is_valid_date(value: &str) -> bool {
    edtf::is_valid(value)
}

/// Whether a string is an absolute web URL with a public-looking host.
///
/// Requires an `http`, `https`, `ftp` or `ftps` scheme, no whitespace, and a
/// host that is either an IP address or a dotted domain name whose last
/// label is alphabetic or an internationalized (punycode) label.
///
/// # Examples
///
/// ```
/// use diglib_migrate::validation::is_valid_url;
///
/// assert!(is_valid_url("https://example.org/collections/12"));
/// assert!(!is_valid_url("example.org/collections/12"));
/// assert!(!is_valid_url("http://localhost/x"));
/// ```
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if !URL_SCHEMES.contains(&url.scheme()) {
        return false;
    }
    match url.host() {
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => {
            let mut labels = domain.rsplit('.');
            let tld = labels.next().unwrap_or("");
            labels.next().is_some() && is_top_level_label(tld)
        },
        None => false,
    }
}

/// An alphabetic top-level label, or the punycode form of an
/// internationalized one (`xn--p1ai`).
fn is_top_level_label(label: &str) -> bool {
    match label.strip_prefix(PUNYCODE_PREFIX) {
        Some(encoded) => {
            !encoded.is_empty() && encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        },
        None => label.len() >= 2 && label.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

/// Flag every atom of a URL cell that is not a valid URL. Empty cells and
/// valid atoms pass through unchanged.
#[must_use]
pub fn flag_invalid_urls(cell: &str) -> String {
    map_atoms(cell, |atom| {
        if is_valid_url(atom) {
            atom.to_string()
        } else {
            tracing::warn!(url = atom, "invalid collection URL flagged for review");
            flag(atom)
        }
    })
}

/// Outcome of gating a date column that must hold valid EDTF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedDate {
    /// Value for the canonical date column
    pub canonical: String,
    /// Value for the free-text fallback column, when the date was rejected
    pub fallback: Option<String>,
}

/// Gate a date for a column that only accepts valid EDTF: an invalid value
/// is cleared from the canonical column and moved verbatim to the fallback.
/// An empty value stays empty and produces no fallback.
#[must_use]
pub fn gate_strict(value: &str) -> GatedDate {
    if value.is_empty() || is_valid_date(value) {
        GatedDate {
            canonical: value.to_string(),
            fallback: None,
        }
    } else {
        GatedDate {
            canonical: String::new(),
            fallback: Some(value.to_string()),
        }
    }
}

/// Gate a date for a column that tolerates invalid values: an invalid value
/// is kept in place behind the review flag.
#[must_use]
pub fn gate_lenient(value: &str) -> String {
    if value.is_empty() || is_valid_date(value) {
        value.to_string()
    } else {
        flag(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("http://example.org"));
        assert!(is_valid_url("https://library.example.edu/islandora/object/x%3A1"));
        assert!(is_valid_url("ftp://192.168.1.10/file.txt"));
        assert!(is_valid_url("https://example.org/search?q=a&b=c#top"));
    }

    #[test]
    fn test_internationalized_domains() {
        assert!(is_valid_url("http://\u{43f}\u{440}\u{438}\u{43c}\u{435}\u{440}.\u{440}\u{444}/"));
        assert!(is_valid_url("https://example.xn--p1ai/path"));
        assert!(is_valid_url("https://b\u{fc}cher.example.de/"));
        assert!(!is_valid_url("https://example.xn--/path"));
        assert_eq!(
            flag_invalid_urls("https://example.xn--p1ai/path"),
            "https://example.xn--p1ai/path"
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("www.example.org"));
        assert!(!is_valid_url("mailto:someone@example.org"));
        assert!(!is_valid_url("http://example.org/has space"));
        assert!(!is_valid_url("http://intranet/page"));
        assert!(!is_valid_url("http://example.123/page"));
    }

    #[test]
    fn test_flag_invalid_urls_per_atom() {
        assert_eq!(flag_invalid_urls(""), "");
        assert_eq!(
            flag_invalid_urls("https://example.org"),
            "https://example.org"
        );
        assert_eq!(
            flag_invalid_urls("https://example.org|example.org"),
            "https://example.org|@example.org"
        );
    }

    #[test]
    fn test_gate_strict() {
        assert_eq!(
            gate_strict("1920-03-05"),
            GatedDate {
                canonical: "1920-03-05".to_string(),
                fallback: None
            }
        );
        assert_eq!(
            gate_strict("circa 1920"),
            GatedDate {
                canonical: String::new(),
                fallback: Some("circa 1920".to_string())
            }
        );
        assert_eq!(gate_strict("").fallback, None);
    }

    #[test]
    fn test_gate_lenient() {
        assert_eq!(gate_lenient(""), "");
        assert_eq!(gate_lenient("2001-05-06"), "2001-05-06");
        assert_eq!(gate_lenient("2001-05-06|2002-01-01"), "@2001-05-06|2002-01-01");
    }
}
