//! Core types: candidates, text normalization, date parsing, syllabus scanning

pub mod candidate;
pub mod dates;
pub mod html;
pub mod normalize;
pub mod scanner;
pub mod tracing;

pub use candidate::{
    Candidate, DeadlineItem, ExamEvent, ExtractionFailure, ItemKind, one_hour_after,
};
pub use dates::{
    MonthDayHint, TimeRange, find_month_day, find_time_range, parse_clock_time, parse_date_time,
    parse_loose_date, resolve_date,
};
pub use html::html_to_text;
pub use normalize::normalize_text;
pub use scanner::{dedup_events, exam_title, extract_dates, has_exam_keyword, scan_window};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
