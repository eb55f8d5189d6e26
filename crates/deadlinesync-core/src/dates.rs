//! Loose date and time parsing for syllabus text.
//!
//! Syllabus documents write dates in many ways. This module recognises the
//! forms that matter for exam scheduling:
//!
//! - month-name dates: `Dec 11`, `Sept. 3rd`, `October 3, 2025`
//! - clock times and ranges: `2pm`, `3:30 PM`, `2pm-3:30pm`, `14:00-15:30`
//! - numeric and day-first dates, used as a fallback: `2025-12-11`,
//!   `12/11/2025`, `11 December 2025`
//!
//! Dates without a year resolve to the nearest occurrence on or after the
//! reference day passed in by the caller. No function here reads the system
//! clock.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

/// Month names and their accepted abbreviations.
const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// How many years ahead a yearless date may be pushed to find a valid day.
const MAX_YEARS_AHEAD: i32 = 8;

/// Month name, optional period, day, optional `, YYYY`.
static MONTH_DAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\b\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,\s*(\d{{4}})\b)?"
    ))
    .expect("Invalid month-day regex")
});

/// Two clock times separated by a dash.
static TIME_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*[-\x{2013}\x{2014}]\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .expect("Invalid time range regex")
});

/// A single clock time making up a whole string.
static CLOCK_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").expect("Invalid clock time regex")
});

static ISO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("Invalid ISO date regex")
});

static SLASH_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").expect("Invalid slash date regex")
});

static DAY_MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b\.?(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("Invalid day-month regex")
});

/// A month-name date found in text, e.g. `Dec 11, 2024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDayHint<'a> {
    /// The matched substring.
    pub text: &'a str,
    /// Byte range of the match in the searched text.
    pub span: Range<usize>,
    /// Month number, 1-12.
    pub month: u32,
    /// Day of month as written (not yet validated).
    pub day: u32,
    /// Explicit year, if written.
    pub year: Option<i32>,
}

impl MonthDayHint<'_> {
    /// Resolves the hint to a calendar date, preferring the future.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        resolve_date(self.year, self.month, self.day, today)
    }
}

/// Finds the first month-name date in `text`.
pub fn find_month_day(text: &str) -> Option<MonthDayHint<'_>> {
    let caps = MONTH_DAY_REGEX.captures(text)?;
    let whole = caps.get(0)?;
    Some(MonthDayHint {
        text: whole.as_str(),
        span: whole.range(),
        month: month_number(caps.get(1)?.as_str())?,
        day: caps.get(2)?.as_str().parse().ok()?,
        year: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Resolves a year/month/day triple.
///
/// With an explicit year the date is taken as written. Without one, the
/// earliest valid date on or after `today` wins, so `Oct 3` read in November
/// lands in the following year and `Feb 29` lands in the next leap year.
pub fn resolve_date(year: Option<i32>, month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day),
        None => (today.year()..=today.year() + MAX_YEARS_AHEAD)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
            .find(|date| *date >= today),
    }
}

/// Parses a clock time such as `2pm`, `3:30 PM`, `12am` or `14:00`.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME_REGEX.captures(text.trim())?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hour = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (meridiem.as_str(), hour) {
                ("am", 12) => 0,
                ("pm", 12) => 12,
                ("pm", h) => h + 12,
                (_, h) => h,
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parses `"<month-name date> [<clock time>]"`, e.g. `"Dec 11, 2024 2pm"`.
///
/// Without a clock time the result is at midnight. Text before the date or
/// anything after it other than a single clock time makes the parse fail.
pub fn parse_date_time(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = text.trim();
    let hint = find_month_day(text)?;
    if hint.span.start != 0 {
        return None;
    }
    let date = hint.resolve(now.date())?;
    let rest = text[hint.span.end..].trim();
    let time = if rest.is_empty() {
        NaiveTime::MIN
    } else {
        parse_clock_time(rest)?
    };
    Some(date.and_time(time))
}

/// A pair of clock times written as a range, e.g. `2pm-3:30pm`.
///
/// A missing am/pm on the first time is copied from the second, so
/// `2-3:30pm` reads as `2pm` to `3:30pm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// First clock time as text.
    pub start: String,
    /// Second clock time as text.
    pub end: String,
}

/// Finds the first time range in `text`.
///
/// Bare number ranges such as `1-2` (no minutes, no am/pm on either side)
/// are page or chapter ranges, not times, and are skipped.
pub fn find_time_range(text: &str) -> Option<TimeRange> {
    TIME_RANGE_REGEX
        .captures_iter(text)
        .find_map(|caps| time_range_from(&caps))
}

fn time_range_from(caps: &Captures<'_>) -> Option<TimeRange> {
    let meridiem = |i: usize| caps.get(i).map(|m| m.as_str().to_ascii_lowercase());
    let (first_meridiem, second_meridiem) = (meridiem(3), meridiem(6));
    let has_minutes = caps.get(2).is_some() || caps.get(5).is_some();
    if first_meridiem.is_none() && second_meridiem.is_none() && !has_minutes {
        return None;
    }

    let clock = |hour: usize, minute: usize, meridiem: Option<&String>| {
        let mut out = caps.get(hour).map(|m| m.as_str()).unwrap_or_default().to_string();
        if let Some(m) = caps.get(minute) {
            out.push(':');
            out.push_str(m.as_str());
        }
        if let Some(m) = meridiem {
            out.push_str(m);
        }
        out
    };

    Some(TimeRange {
        start: clock(1, 2, first_meridiem.as_ref().or(second_meridiem.as_ref())),
        end: clock(4, 5, second_meridiem.as_ref()),
    })
}

/// Parses a window that is a numeric or day-first date and little else.
///
/// This is the fallback for windows that carry no month-name date. Forms
/// are tried in order: ISO (`2025-12-11`), US slash (`12/11/2025`, `12/11`),
/// then day-first (`11 December 2025`). A match only counts when everything
/// around it is exam vocabulary, filler words, numbers or clock times, so
/// `Quiz 3/4` is a date while `worth 1/3 of your grade` is not.
pub fn parse_loose_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let standalone = |caps: &Captures| caps.get(0).is_some_and(|m| only_filler_around(text, m.range()));

    let iso = ISO_DATE_REGEX.captures_iter(text).filter(standalone).find_map(|caps| {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    });
    if iso.is_some() {
        return iso;
    }

    let slash = SLASH_DATE_REGEX.captures_iter(text).filter(standalone).find_map(|caps| {
        let month = caps.get(1)?.as_str().parse().ok()?;
        let day = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3).and_then(|m| expand_year(m.as_str()));
        resolve_date(year, month, day, today)
    });
    if slash.is_some() {
        return slash;
    }

    DAY_MONTH_REGEX.captures_iter(text).filter(standalone).find_map(|caps| {
        let day = caps.get(1)?.as_str().parse().ok()?;
        let month = month_number(caps.get(2)?.as_str())?;
        let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
        resolve_date(year, month, day, today)
    })
}

/// Words that may surround a fallback date without turning it into prose.
const FILLER_WORDS: &[&str] = &[
    "final", "finals", "midterm", "midterms", "exam", "exams", "examination", "quiz", "quizzes",
    "test", "tests", "on", "is", "the", "a", "at", "will", "be", "held", "scheduled", "date",
    "due", "in", "class", "room", "from", "to", "until", "and", "am", "pm", "noon", "mon",
    "monday", "tue", "tues", "tuesday", "wed", "wednesday", "thu", "thur", "thurs", "thursday",
    "fri", "friday", "sat", "saturday", "sun", "sunday",
];

/// True when every word of `text` outside `span` is filler.
fn only_filler_around(text: &str, span: Range<usize>) -> bool {
    let (before, after) = (&text[..span.start], &text[span.end..]);
    before
        .split(|c: char| !c.is_alphanumeric())
        .chain(after.split(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .all(is_filler)
}

fn is_filler(word: &str) -> bool {
    let word = word.to_lowercase();
    let digits = word.trim_start_matches(|c: char| c.is_ascii_digit());
    if digits.len() < word.len() {
        // 3, 2pm, 4th
        return matches!(digits, "" | "am" | "pm" | "st" | "nd" | "rd" | "th");
    }
    FILLER_WORDS.contains(&word.as_str())
}

fn expand_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    Some(if text.len() == 2 { 2000 + year } else { year })
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
