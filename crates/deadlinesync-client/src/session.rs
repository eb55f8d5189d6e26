//! Per-run sync state.

use deadlinesync_core::{DeadlineItem, ExtractionFailure, ItemKind};
use deadlinesync_providers::{Course, DeadlineReport};

/// Courses and items gathered during one CLI run.
///
/// Owned by the command that fetches the data and passed by reference to
/// whatever renders or syncs it.
#[derive(Debug, Default)]
pub struct SyncSession {
    courses: Vec<Course>,
    items: Vec<DeadlineItem>,
    failures: Vec<ExtractionFailure>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session from an aggregation report.
    pub fn from_report(report: DeadlineReport) -> Self {
        Self {
            courses: report.courses,
            items: report.items,
            failures: report.failures,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn items(&self) -> &[DeadlineItem] {
        &self.items
    }

    /// Documents that could not be read; never synced.
    pub fn failures(&self) -> &[ExtractionFailure] {
        &self.failures
    }

    /// Replaces the course list.
    pub fn record_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
    }

    pub fn extend_items(&mut self, items: impl IntoIterator<Item = DeadlineItem>) {
        self.items.extend(items);
    }

    pub fn replace_items(&mut self, items: Vec<DeadlineItem>) {
        self.items = items;
    }

    pub fn record_failures(&mut self, failures: impl IntoIterator<Item = ExtractionFailure>) {
        self.failures.extend(failures);
    }

    /// Returns true if there is nothing to sync.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorts items chronologically, then by course and title.
    pub fn sort_items(&mut self) {
        self.items.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.course_name.cmp(&b.course_name))
                .then_with(|| a.title.cmp(&b.title))
        });
    }

    /// Number of items of the given kind.
    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}
