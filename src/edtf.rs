//! Extended Date/Time Format (EDTF) validity checking.
//!
//! Implements the syntax of EDTF level 0 and level 1, plus the level 2
//! features the migrated data actually uses: qualification of individual
//! date components (`2004-?06`), unspecified digits in any position
//! (`156X-12-XX`), sub-year groupings (seasons 25-41), significant digits
//! (`1950S2`), exponential years (`Y17E7`) and sets (`[1667, 1670..1672]`,
//! `{1960, 1961-12}`).
//!
//! Beyond syntax, [`is_valid`] checks calendar validity (no 30 February, no
//! 29 February outside leap years) and that an interval does not end before
//! it starts.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::edtf::is_valid;
//!
//! assert!(is_valid("1920-03-05"));
//! assert!(is_valid("1920/1930"));
//! assert!(is_valid("1920?"));
//! assert!(!is_valid("March 5, 1920"));
//! assert!(!is_valid("1921-02-29"));
//! ```

use chrono::NaiveDate;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, digit1, one_of, space0},
    combinator::{all_consuming, map, opt, success, value},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

type Res<'a, T> = IResult<&'a str, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Year<'a> {
    /// Four characters of digits or `X`, optionally negative
    Digits { negative: bool, digits: &'a str },
    /// `Y`-prefixed or exponential year; carries no month or day
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Date<'a> {
    year: Year<'a>,
    month: Option<&'a str>,
    day: Option<&'a str>,
    qualified: bool,
    has_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint<'a> {
    Date(Date<'a>),
    /// `..`
    Open,
    /// empty
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr<'a> {
    Single(Date<'a>),
    Interval(Endpoint<'a>, Endpoint<'a>),
    Set(Vec<(Date<'a>, Option<Date<'a>>)>),
}

const MAX_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn is_digit_or_x(c: char) -> bool {
    c.is_ascii_digit() || c == 'X'
}

fn verify_failed(i: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(i, ErrorKind::Verify))
}

fn qualifier(i: &str) -> Res<'_, char> {
    one_of("?~%")(i)
}

fn two_digits(i: &str) -> Res<'_, &str> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_digit())(i)
}

fn two_digits_or_x(i: &str) -> Res<'_, &str> {
    take_while_m_n(2, 2, is_digit_or_x)(i)
}

fn significant_digits(i: &str) -> Res<'_, &str> {
    preceded(char('S'), digit1)(i)
}

fn long_year(i: &str) -> Res<'_, Year<'_>> {
    let (i, _) = char('Y')(i)?;
    let (i, _) = opt(char('-'))(i)?;
    let (i, digits) = digit1(i)?;
    let (i, exponent) = opt(preceded(char('E'), digit1))(i)?;
    let (i, _) = opt(significant_digits)(i)?;
    if exponent.is_none() && digits.len() <= 4 {
        return Err(verify_failed(i));
    }
    Ok((i, Year::Long))
}

fn short_year(i: &str) -> Res<'_, Year<'_>> {
    let (i, negative) = opt(char('-'))(i)?;
    let (i, digits) = take_while_m_n(4, 4, is_digit_or_x)(i)?;
    let (i, _) = opt(significant_digits)(i)?;
    Ok((
        i,
        Year::Digits {
            negative: negative.is_some(),
            digits,
        },
    ))
}

/// A component with an optional qualifier on either side.
fn qualified<'a, T, F>(mut inner: F) -> impl FnMut(&'a str) -> Res<'a, (T, bool)>
where
    F: FnMut(&'a str) -> Res<'a, T>,
{
    move |i| {
        let (i, before) = opt(qualifier)(i)?;
        let (i, component) = inner(i)?;
        let (i, after) = opt(qualifier)(i)?;
        Ok((i, (component, before.is_some() || after.is_some())))
    }
}

fn time_zone(i: &str) -> Res<'_, ()> {
    alt((
        value((), char('Z')),
        map(
            pair(
                one_of("+-"),
                pair(two_digits, opt(preceded(opt(char(':')), two_digits))),
            ),
            |_| (),
        ),
    ))(i)
}

fn time(i: &str) -> Res<'_, ()> {
    let (i, _) = char('T')(i)?;
    let (i, hours) = two_digits(i)?;
    let (i, _) = char(':')(i)?;
    let (i, minutes) = two_digits(i)?;
    let (i, _) = char(':')(i)?;
    let (i, seconds) = two_digits(i)?;
    let in_range = |v: &str, max: u32| v.parse::<u32>().is_ok_and(|n| n <= max);
    if !(in_range(hours, 23) && in_range(minutes, 59) && in_range(seconds, 59)) {
        return Err(verify_failed(i));
    }
    let (i, _) = opt(time_zone)(i)?;
    Ok((i, ()))
}

fn date(i: &str) -> Res<'_, Date<'_>> {
    let (i, (year, year_q)) = qualified(alt((long_year, short_year)))(i)?;
    let (i, month) = opt(preceded(char('-'), qualified(two_digits_or_x)))(i)?;
    let (i, day) = if month.is_some() {
        opt(preceded(char('-'), qualified(two_digits_or_x)))(i)?
    } else {
        (i, None)
    };
    let (i, has_time) = if day.is_some() {
        map(opt(time), |t| t.is_some())(i)?
    } else {
        (i, false)
    };
    let qualified = year_q || month.is_some_and(|(_, q)| q) || day.is_some_and(|(_, q)| q);
    Ok((
        i,
        Date {
            year,
            month: month.map(|(m, _)| m),
            day: day.map(|(d, _)| d),
            qualified,
            has_time,
        },
    ))
}

fn endpoint(i: &str) -> Res<'_, Endpoint<'_>> {
    alt((
        map(date, Endpoint::Date),
        value(Endpoint::Open, tag("..")),
        success(Endpoint::Unknown),
    ))(i)
}

fn interval(i: &str) -> Res<'_, Expr<'_>> {
    map(separated_pair(endpoint, char('/'), endpoint), |(a, b)| {
        Expr::Interval(a, b)
    })(i)
}

fn set_member(i: &str) -> Res<'_, (Date<'_>, Option<Date<'_>>)> {
    alt((
        map(separated_pair(date, tag(".."), date), |(a, b)| (a, Some(b))),
        map(preceded(tag(".."), date), |d| (d, None)),
        map(terminated(date, tag("..")), |d| (d, None)),
        map(date, |d| (d, None)),
    ))(i)
}

fn set(i: &str) -> Res<'_, Expr<'_>> {
    let members = || separated_list1(pair(char(','), space0), set_member);
    map(
        alt((
            delimited(char('['), members(), char(']')),
            delimited(char('{'), members(), char('}')),
        )),
        Expr::Set,
    )(i)
}

fn expression(i: &str) -> Res<'_, Expr<'_>> {
    alt((set, interval, map(date, Expr::Single)))(i)
}

/// Numeric value of a component with no unspecified digits.
fn known(component: &str) -> Option<u32> {
    if component.contains('X') {
        None
    } else {
        component.parse().ok()
    }
}

fn partial_month_ok(month: &str) -> bool {
    let mut chars = month.chars();
    match (chars.next(), chars.next()) {
        (Some('X'), Some(_)) => true,
        (Some('0'), Some(c)) => c != '0',
        (Some('1'), Some(c)) => matches!(c, '0' | '1' | '2' | 'X'),
        _ => false,
    }
}

fn partial_day_ok(day: &str) -> bool {
    let mut chars = day.chars();
    match (chars.next(), chars.next()) {
        (Some('X' | '1' | '2'), Some(_)) => true,
        (Some('0'), Some(c)) => c != '0',
        (Some('3'), Some(c)) => matches!(c, '0' | '1' | 'X'),
        _ => false,
    }
}

fn known_year(date: &Date<'_>) -> Option<i32> {
    match date.year {
        Year::Digits { negative, digits } => {
            let value: i32 = known(digits)?.try_into().ok()?;
            Some(if negative { -value } else { value })
        },
        Year::Long => None,
    }
}

fn date_is_valid(date: &Date<'_>) -> bool {
    let (negative, year_digits) = match date.year {
        Year::Long => return date.month.is_none() && !date.has_time,
        Year::Digits { negative, digits } => (negative, digits),
    };
    if negative && known(year_digits) == Some(0) {
        return false;
    }

    let month = date.month.map(|m| (m, known(m)));
    match month {
        Some((_, Some(m))) => {
            let season = (21..=41).contains(&m);
            if !(1..=12).contains(&m) && !(season && date.day.is_none()) {
                return false;
            }
        },
        Some((m, None)) if !partial_month_ok(m) => return false,
        _ => {},
    }

    if let Some(day) = date.day {
        match (known(day), month.and_then(|(_, m)| m)) {
            (Some(d), Some(m)) => {
                let calendar_ok = match known_year(date) {
                    Some(y) => NaiveDate::from_ymd_opt(y, m, d).is_some(),
                    None => d >= 1 && usize::try_from(m - 1).is_ok_and(|i| d <= MAX_DAYS[i]),
                };
                if !calendar_ok {
                    return false;
                }
            },
            (Some(d), None) => {
                if !(1..=31).contains(&d) {
                    return false;
                }
            },
            (None, _) => {
                if !partial_day_ok(day) {
                    return false;
                }
            },
        }
    }

    if date.has_time {
        let unspecified = year_digits.contains('X')
            || date.month.is_some_and(|m| m.contains('X'))
            || date.day.is_some_and(|d| d.contains('X'));
        if date.qualified || unspecified {
            return false;
        }
    }
    true
}

type Ymd = (i32, u32, u32);

/// Earliest and latest day a fully specified date covers, if it has one.
fn bounds(date: &Date<'_>) -> Option<(Ymd, Ymd)> {
    let year = known_year(date)?;
    let month = match date.month {
        Some(m) => Some(known(m).filter(|m| (1..=12).contains(m))?),
        None => None,
    };
    let day = match date.day {
        Some(d) => Some(known(d)?),
        None => None,
    };
    Some((
        (year, month.unwrap_or(1), day.unwrap_or(1)),
        (year, month.unwrap_or(12), day.unwrap_or(31)),
    ))
}

fn ordered(start: &Date<'_>, end: &Date<'_>) -> bool {
    match (bounds(start), bounds(end)) {
        (Some((earliest, _)), Some((_, latest))) => earliest <= latest,
        _ => true,
    }
}

fn expression_is_valid(expr: &Expr<'_>) -> bool {
    match expr {
        Expr::Single(d) => date_is_valid(d),
        Expr::Interval(start, end) => {
            let endpoint_ok = |e: &Endpoint<'_>| match e {
                Endpoint::Date(d) => !d.has_time && date_is_valid(d),
                Endpoint::Open | Endpoint::Unknown => true,
            };
            match (start, end) {
                (Endpoint::Date(a), Endpoint::Date(b)) => {
                    endpoint_ok(start) && endpoint_ok(end) && ordered(a, b)
                },
                (Endpoint::Date(_), _) | (_, Endpoint::Date(_)) => {
                    endpoint_ok(start) && endpoint_ok(end)
                },
                _ => false,
            }
        },
        Expr::Set(members) => members.iter().all(|(first, last)| {
            !first.has_time
                && date_is_valid(first)
                && last.as_ref().map_or(true, |l| {
                    !l.has_time && date_is_valid(l) && ordered(first, l)
                })
        }),
    }
}

/// Whether `s` is a valid EDTF string. The empty string is not.
#[must_use]
pub fn is_valid(s: &str) -> bool {
    match all_consuming(expression)(s) {
        Ok((_, expr)) => expression_is_valid(&expr),
        Err(_) => false,
    }
}
