/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Conversion between RCS dotted dates and calendar form
//!
//! The library stores and emits a delta's `date` field verbatim; these
//! helpers are for clients that want to interpret it. The wire form is
//! `YY.MM.DD.hh.mm.ss` with a two-digit year for dates before 2000 and a
//! four-digit year from 2000 on. `ss` may be 60 (a leap second).

use chrono::{NaiveDate, NaiveDateTime, Datelike, Timelike};
use regex::Regex;

use error::{Result, ArgError};

const DATE_SHAPE: &'static str =
    r"^(\d\d\d\d|\d\d)\.(\d\d)\.(\d\d)\.(\d\d)\.(\d\d)\.(\d\d)$";

/// Parse an RCS dotted date.
///
/// Two-digit years are 1900-based; four-digit years must be 2000 or later.
/// A leap second (`ss == 60`) is carried on second 59 using chrono's
/// nanosecond convention.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let re = Regex::new(DATE_SHAPE)?;
    let caps = match re.captures(s) {
        Some(c) => c,
        None => return ArgError::err("date is not of the form YY.MM.DD.hh.mm.ss"),
    };
    // the shape check guarantees each capture is a short digit run
    let field = |i: usize| caps.get(i).unwrap().as_str().parse::<u32>().unwrap();
    let (y, mm, dd) = (field(1), field(2), field(3));
    let (hh, min, ss) = (field(4), field(5), field(6));

    let year = if y < 100 {
        y + 1900
    } else if y >= 2000 {
        y
    } else {
        return ArgError::err("four-digit years start at 2000");
    };
    if ss > 60 {
        return ArgError::err("invalid second value in date");
    }

    let date = match NaiveDate::from_ymd_opt(year as i32, mm, dd) {
        Some(d) => d,
        None => return ArgError::err("invalid calendar date"),
    };
    let time = if ss == 60 {
        date.and_hms_nano_opt(hh, min, 59, 1_000_000_000)
    } else {
        date.and_hms_opt(hh, min, ss)
    };
    match time {
        Some(t) => Ok(t),
        None => ArgError::err("invalid time of day in date"),
    }
}

/// Format a calendar date as an RCS dotted date.
///
/// Years before 2000 are emitted with two digits (1900-based); years before
/// 1900 cannot be represented.
pub fn format_date(dt: &NaiveDateTime) -> Result<String> {
    let year = dt.year();
    if year < 1900 {
        return ArgError::err("years before 1900 cannot be represented");
    }
    let ss = if dt.nanosecond() >= 1_000_000_000 { 60 } else { dt.second() };
    let y = if year < 2000 {
        format!("{:02}", year - 1900)
    } else {
        format!("{:04}", year)
    };
    Ok(format!("{}.{:02}.{:02}.{:02}.{:02}.{:02}",
        y, dt.month(), dt.day(), dt.hour(), dt.minute(), ss))
}

#[test]
fn windowed_years() {
    let d = parse_date("99.12.31.23.59.58").unwrap();
    assert_eq!(d.year(), 1999);
    assert_eq!(format_date(&d).unwrap(), "99.12.31.23.59.58");

    let d = parse_date("2024.01.30.10.05.00").unwrap();
    assert_eq!(d.year(), 2024);
    assert_eq!(format_date(&d).unwrap(), "2024.01.30.10.05.00");

    // four digits below 2000 and bare three digits are malformed
    assert!(parse_date("1999.01.01.00.00.00").is_err());
    assert!(parse_date("999.01.01.00.00.00").is_err());
}

#[test]
fn leap_second() {
    let d = parse_date("98.12.31.23.59.60").unwrap();
    assert_eq!(d.second(), 59);
    assert!(d.nanosecond() >= 1_000_000_000);
    assert_eq!(format_date(&d).unwrap(), "98.12.31.23.59.60");
}

#[test]
fn rejects_bad_fields() {
    assert!(parse_date("99.13.01.00.00.00").is_err());
    assert!(parse_date("99.02.30.00.00.00").is_err());
    assert!(parse_date("99.01.01.24.00.00").is_err());
    assert!(parse_date("99.01.01.00.61.00").is_err());
    assert!(parse_date("99.01.01.00.00.61").is_err());
    assert!(parse_date("not a date").is_err());
}
