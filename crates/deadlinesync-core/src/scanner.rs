//! Syllabus date extraction.
//!
//! The scanner walks a document line by line. At each line it looks at a
//! window made of that line and the two after it, because syllabi often put
//! the exam title on one line and its date on the next. A window that names
//! an exam-like keyword and carries a parseable date becomes an
//! [`ExamEvent`].
//!
//! Windows overlap, so a single mention can be reported by up to three
//! consecutive windows; [`dedup_events`] collapses the repeats.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use deadlinesync_core::{extract_dates, Candidate};
//!
//! let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let found = extract_dates("Final Exam Dec 11, 2024 2pm-3:30pm", "CS 101", now);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].title(), "Final Exam");
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::{debug, trace};

use crate::candidate::{Candidate, ExamEvent, one_hour_after};
use crate::dates::{find_month_day, find_time_range, parse_date_time, parse_loose_date};
use crate::normalize::normalize_text;

/// Exam-like keywords, matched as whole words.
static EXAM_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(final|midterm|exam|quiz|test)\b").expect("Invalid exam keyword regex")
});

/// Number of lines in a scan window.
pub const WINDOW_LINES: usize = 3;

/// Hour at which events without an explicit time start.
pub const DEFAULT_START_HOUR: u32 = 9;

/// Scans document text for exam-like events.
///
/// `text` may come straight from a PDF or HTML conversion; it is normalized
/// here. `now` is the reference for resolving dates written without a year.
pub fn extract_dates(text: &str, course_name: &str, now: NaiveDateTime) -> Vec<Candidate> {
    let text = normalize_text(text);
    let lines = split_lines(&text);
    let mut out = Vec::new();

    for i in 0..lines.len() {
        let end = (i + WINDOW_LINES).min(lines.len());
        let window = lines[i..end].join(" ");
        if let Some(event) = scan_window(&window, course_name, now) {
            debug!(line = i, title = %event.title, start = %event.start, "found exam date");
            out.push(Candidate::Event(event));
        }
    }

    debug!(course = course_name, lines = lines.len(), found = out.len(), "scanned document");
    out
}

/// Scans a single window.
///
/// Returns `None` when the window names no keyword or carries no date.
pub fn scan_window(window: &str, course_name: &str, now: NaiveDateTime) -> Option<ExamEvent> {
    let keyword = EXAM_KEYWORD_REGEX.captures(window)?.get(1)?.as_str();

    let hint = find_month_day(window);
    let date = match &hint {
        Some(hint) => hint.resolve(now.date()),
        None => parse_loose_date(window, now.date()),
    };
    let Some(date) = date else {
        trace!(window, "keyword without a date");
        return None;
    };

    let timed = hint.as_ref().and_then(|hint| {
        let range = find_time_range(window)?;
        let start = parse_date_time(&format!("{} {}", hint.text, range.start), now)?;
        let end = parse_date_time(&format!("{} {}", hint.text, range.end), now)?;
        Some((start, end))
    });
    let (start, end) = timed.unwrap_or_else(|| default_slot(date));

    Some(ExamEvent {
        title: exam_title(keyword),
        course_name: course_name.to_string(),
        start,
        end,
        description: window.trim().to_string(),
    })
}

/// Drops repeated events, keeping the first report of each title and start.
///
/// Overlapping windows report the same mention more than once; error
/// candidates are always kept.
pub fn dedup_events(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| match candidate {
            Candidate::Event(event) => seen.insert((event.title.clone(), event.start)),
            Candidate::Error(_) => true,
        })
        .collect()
}

/// Returns `true` if the text names an exam-like keyword.
pub fn has_exam_keyword(text: &str) -> bool {
    EXAM_KEYWORD_REGEX.is_match(text)
}

/// Builds the event title from the matched keyword.
///
/// `midterm` and `final` become "Midterm Exam" / "Final Exam"; other
/// keywords are used on their own ("Quiz", "Exam", "Test").
pub fn exam_title(keyword: &str) -> String {
    let label = title_case(keyword);
    if label == "Midterm" || label == "Final" {
        format!("{label} Exam")
    } else {
        label
    }
}

/// The one-hour slot used when no time range is written.
fn default_slot(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let nine = NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let start = date.and_time(nine);
    (start, one_hour_after(start))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Characters that end a line, besides `\r\n` taken as one break.
///
/// Covers `\n`, lone `\r` (classic Mac and some PDF output), vertical tab,
/// form feed (PDF page breaks), the file/group/record separators, NEL and
/// the Unicode line and paragraph separators.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Splits text into lines on any of [`LINE_BREAKS`].
///
/// A trailing line break does not produce an empty last line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() || lines.is_empty() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn events(candidates: &[Candidate]) -> Vec<&ExamEvent> {
        candidates.iter().filter_map(Candidate::as_event).collect()
    }

    mod windows {
        use super::*;

        #[test]
        fn final_exam_with_time_range() {
            let now = at(2024, 9, 1, 8, 0);
            let found = extract_dates("Final Exam Dec 11, 2024 2pm-3:30pm", "CS 101", now);
            let found = events(&found);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].title, "Final Exam");
            assert_eq!(found[0].course_name, "CS 101");
            assert_eq!(found[0].start, at(2024, 12, 11, 14, 0));
            assert_eq!(found[0].end, at(2024, 12, 11, 15, 30));
            assert_eq!(found[0].description, "Final Exam Dec 11, 2024 2pm-3:30pm");
        }

        #[test]
        fn midterm_without_time_defaults_to_nine() {
            let now = at(2025, 9, 15, 12, 0);
            let found = extract_dates("Midterm exam October 3", "BIO 200", now);
            let found = events(&found);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].title, "Midterm Exam");
            assert_eq!(found[0].start, at(2025, 10, 3, 9, 0));
            assert_eq!(found[0].end, at(2025, 10, 3, 10, 0));
        }

        #[test]
        fn past_yearless_date_moves_forward() {
            let now = at(2025, 11, 1, 12, 0);
            let found = extract_dates("Midterm exam October 3", "BIO 200", now);
            assert_eq!(events(&found)[0].start, at(2026, 10, 3, 9, 0));
        }

        #[test]
        fn quiz_without_date_yields_nothing() {
            let now = at(2025, 1, 1, 0, 0);
            assert!(extract_dates("quiz next week sometime maybe", "X", now).is_empty());
        }

        #[test]
        fn quiz_title_is_bare() {
            let now = at(2025, 1, 1, 0, 0);
            let found = extract_dates("Quiz 2: Feb 7", "X", now);
            assert_eq!(events(&found)[0].title, "Quiz");
        }

        #[test]
        fn keyword_match_is_whole_word() {
            let now = at(2025, 1, 1, 0, 0);
            assert!(extract_dates("Finally, the contest ends Mar 3", "X", now).is_empty());
            assert!(extract_dates("Examples due Mar 3", "X", now).is_empty());
        }

        #[test]
        fn text_without_keywords_yields_nothing() {
            let now = at(2025, 1, 1, 0, 0);
            let text = "Week 1: Intro, Jan 14\nWeek 2: Loops, Jan 21\nHomework due Feb 2 2pm-3pm";
            assert!(extract_dates(text, "X", now).is_empty());
        }

        #[test]
        fn title_and_date_on_adjacent_lines() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "Final Exam\nLocation: Hall B\nDec 11, 2024\n";
            let found = extract_dates(text, "CS 101", now);
            let found = events(&found);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].start, at(2024, 12, 11, 9, 0));
            assert_eq!(found[0].description, "Final Exam Location: Hall B Dec 11, 2024");
        }

        #[test]
        fn overlapping_windows_each_report() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "intro\nreading\nQuiz Oct 5";
            // Windows starting at lines 0, 1 and 2 all contain the quiz line.
            assert_eq!(extract_dates(text, "X", now).len(), 3);
        }

        #[test]
        fn separate_mentions_are_counted_separately() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "Midterm Oct 10\nchapter review\nlab work\nFinal Dec 12\nend";
            let found = extract_dates(text, "X", now);
            // Windows at lines 1, 2 and 3 all see the final.
            assert_eq!(found.len(), 4);
            let found = dedup_events(found);
            let found = events(&found);
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].title, "Midterm Exam");
            assert_eq!(found[0].start, at(2024, 10, 10, 9, 0));
            assert_eq!(found[1].title, "Final Exam");
            assert_eq!(found[1].start, at(2024, 12, 12, 9, 0));
        }

        #[test]
        fn unparseable_month_day_does_not_fall_back() {
            let now = at(2024, 9, 1, 8, 0);
            assert!(extract_dates("Exam Feb 30 or 2024-03-01", "X", now).is_empty());
        }

        #[test]
        fn loose_date_fallback() {
            let now = at(2024, 9, 1, 8, 0);
            let found = extract_dates("Test 3 on 11/20/2024 2pm-4pm", "X", now);
            let found = events(&found);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].title, "Test");
            // Without a month-name date the time range is not used.
            assert_eq!(found[0].start, at(2024, 11, 20, 9, 0));
            assert_eq!(found[0].end, at(2024, 11, 20, 10, 0));
        }

        #[test]
        fn invalid_time_range_falls_back_to_default_slot() {
            let now = at(2024, 9, 1, 8, 0);
            let found = extract_dates("Final Dec 11, 2024 10:00-25:00", "X", now);
            let found = events(&found);
            assert_eq!(found[0].start, at(2024, 12, 11, 9, 0));
            assert_eq!(found[0].end, at(2024, 12, 11, 10, 0));
        }

        #[test]
        fn range_without_meridiem_on_start() {
            let now = at(2024, 9, 1, 8, 0);
            let found = extract_dates("Midterm: Oct 17, 2024, 6-7:30pm", "X", now);
            let found = events(&found);
            assert_eq!(found[0].start, at(2024, 10, 17, 18, 0));
            assert_eq!(found[0].end, at(2024, 10, 17, 19, 30));
        }

        #[test]
        fn pdf_artifacts_are_normalized() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "Fi\u{00AD}nal Ex\u{200B}am Dec 11, 2024 2pm\u{2013}3:30pm";
            let found = extract_dates(text, "X", now);
            let found = events(&found);
            assert_eq!(found[0].title, "Final Exam");
            assert_eq!(found[0].end, at(2024, 12, 11, 15, 30));
        }

        #[test]
        fn description_is_trimmed_window() {
            let now = at(2024, 9, 1, 8, 0);
            let found = extract_dates("   Quiz Oct 5   ", "X", now);
            assert_eq!(events(&found)[0].description, "Quiz Oct 5");
        }
    }

    mod titles {
        use super::*;

        #[test]
        fn exam_suffix_for_midterm_and_final() {
            assert_eq!(exam_title("midterm"), "Midterm Exam");
            assert_eq!(exam_title("FINAL"), "Final Exam");
        }

        #[test]
        fn other_keywords_are_bare() {
            assert_eq!(exam_title("quiz"), "Quiz");
            assert_eq!(exam_title("EXAM"), "Exam");
            assert_eq!(exam_title("Test"), "Test");
        }

        #[test]
        fn fraction_beside_a_keyword_is_not_a_date() {
            let now = at(2024, 9, 1, 8, 0);
            assert!(extract_dates("The final exam is worth 1/3 of your grade", "X", now).is_empty());
            assert!(extract_dates("Quiz 2\n1/2 credit\nbring a pencil", "X", now).is_empty());
        }

        #[test]
        fn first_keyword_wins() {
            let now = at(2024, 9, 1, 8, 0);
            let event = scan_window("Quiz before the Final: Oct 5", "X", now).unwrap();
            assert_eq!(event.title, "Quiz");
        }
    }

    mod lines {
        use super::*;

        #[test]
        fn splits_on_newlines_and_form_feeds() {
            assert_eq!(split_lines("a\r\nb\x0cc\nd"), vec!["a", "b", "c", "d"]);
        }

        #[test]
        fn trailing_break_adds_no_line() {
            assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
            assert_eq!(split_lines(""), vec![""]);
        }

        #[test]
        fn keeps_blank_lines() {
            assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        }

        #[test]
        fn lone_carriage_returns_and_unicode_separators() {
            assert_eq!(split_lines("a\rb\r\rc"), vec!["a", "b", "", "c"]);
            assert_eq!(
                split_lines("a\x0bb\x1cc\u{85}d\u{2028}e\u{2029}f"),
                vec!["a", "b", "c", "d", "e", "f"]
            );
            assert_eq!(split_lines("a\r"), vec!["a"]);
        }

        #[test]
        fn carriage_return_documents_scan_every_line() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "Midterm Oct 10\rreview\rlab\rnotes\rFinal Dec 12\rend";
            let found = dedup_events(extract_dates(text, "X", now));
            let titles: Vec<_> = events(&found).into_iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles, vec!["Midterm Exam", "Final Exam"]);
        }
    }

    mod dedup {
        use super::*;

        #[test]
        fn keeps_first_of_each_title_and_start() {
            let now = at(2024, 9, 1, 8, 0);
            let text = "a\nb\nQuiz Oct 5\nQuiz Oct 12";
            let found = dedup_events(extract_dates(text, "X", now));
            let found = events(&found);
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].description, "a b Quiz Oct 5");
            assert_eq!(found[1].start, at(2024, 10, 12, 9, 0));
        }

        #[test]
        fn errors_are_never_dropped() {
            let errors = vec![Candidate::error("a", "x"), Candidate::error("a", "x")];
            assert_eq!(dedup_events(errors).len(), 2);
        }
    }

    #[test]
    fn keyword_detection() {
        assert!(has_exam_keyword("the MIDTERM is"));
        assert!(!has_exam_keyword("testing attestation"));
    }
}
