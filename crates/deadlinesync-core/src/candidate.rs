//! Candidate and item types.
//!
//! This module provides the records that flow between the scanner and the
//! calendar layer:
//! - [`Candidate`]: what the syllabus scanner proposes for one document window
//! - [`ExamEvent`]: a dated exam-like event found in a document
//! - [`ExtractionFailure`]: a per-document failure surfaced as data
//! - [`DeadlineItem`]: a course deadline ready to be written to a calendar

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// An exam-like event extracted from a syllabus document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEvent {
    /// Derived label, e.g. "Final Exam" or "Quiz".
    pub title: String,
    /// The course label supplied by the caller.
    pub course_name: String,
    /// Start of the event (wall-clock time, no timezone).
    pub start: NaiveDateTime,
    /// End of the event (wall-clock time, no timezone).
    pub end: NaiveDateTime,
    /// The trimmed text window that produced the match.
    pub description: String,
}

/// A document that could not be fetched or converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Identifies the failed document, e.g. "PDF parse failed: syllabus.pdf".
    pub title: String,
    /// The failure message.
    pub description: String,
}

/// A proposed calendar entry, or a recoverable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    /// A dated event found in a document.
    Event(ExamEvent),
    /// A document that failed to load.
    Error(ExtractionFailure),
}

impl Candidate {
    /// Creates an error candidate.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Error(ExtractionFailure {
            title: title.into(),
            description: description.into(),
        })
    }

    /// Returns `true` if this is an error candidate.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the event if this is an event candidate.
    pub fn as_event(&self) -> Option<&ExamEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Error(_) => None,
        }
    }

    /// Returns the title of the candidate.
    pub fn title(&self) -> &str {
        match self {
            Self::Event(event) => &event.title,
            Self::Error(failure) => &failure.title,
        }
    }
}

/// Where a deadline item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A Canvas assignment with a due date.
    Assignment,
    /// A Canvas calendar event.
    Event,
    /// An exam date mined from a syllabus document.
    Syllabus,
}

impl ItemKind {
    /// Returns the lowercase name used in keys and categories.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Event => "event",
            Self::Syllabus => "syllabus",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course deadline ready for the calendar layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineItem {
    /// The kind of item.
    pub kind: ItemKind,
    /// The owning course ID.
    pub course_id: u64,
    /// The owning course name.
    pub course_name: String,
    /// The Canvas object ID, absent for syllabus-derived items.
    pub source_id: Option<u64>,
    /// Item title.
    pub title: String,
    /// Start (or due) time.
    pub start: NaiveDateTime,
    /// End time; equal to `start` for point-in-time deadlines.
    pub end: NaiveDateTime,
    /// Free-form description.
    pub description: String,
    /// Points possible, for assignments.
    pub points: Option<f64>,
}

impl DeadlineItem {
    /// Creates a syllabus item from an extracted exam event.
    pub fn from_exam(course_id: u64, event: &ExamEvent) -> Self {
        Self {
            kind: ItemKind::Syllabus,
            course_id,
            course_name: event.course_name.clone(),
            source_id: None,
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            description: event.description.clone(),
            points: None,
        }
    }

    /// Returns the key used to recognise this item across sync runs.
    ///
    /// Canvas objects are keyed by their ID. Syllabus items have no ID, so the
    /// start time is part of the key to keep distinct exams apart.
    pub fn sync_key(&self) -> String {
        match self.source_id {
            Some(id) => format!("{}:{}:{}", self.kind, self.course_id, id),
            None => format!(
                "{}:{}:{}:{}",
                self.kind,
                self.course_id,
                self.title,
                self.start.format("%Y-%m-%dT%H:%M")
            ),
        }
    }

    /// Returns the end time, widened to one hour when the item is a single instant.
    pub fn effective_end(&self) -> NaiveDateTime {
        if self.end <= self.start {
            one_hour_after(self.start)
        } else {
            self.end
        }
    }
}

/// Returns the timestamp one hour after `start`.
///
/// A start at 23:xx rolls over to 00:xx on the following day.
pub fn one_hour_after(start: NaiveDateTime) -> NaiveDateTime {
    match start.with_hour(start.hour() + 1) {
        Some(end) => end,
        None => start + Duration::hours(1),
    }
}
