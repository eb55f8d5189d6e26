//! Deadline aggregation across courses.

use chrono::NaiveDateTime;
use deadlinesync_core::{
    Candidate, DeadlineItem, ExtractionFailure, ItemKind, dedup_events, html_to_text,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProviderResult;
use crate::pdf::PdfTextExtractor;
use crate::source::{Assignment, Course, CourseEvent, CourseSource};
use crate::syllabus::scan_syllabus_for_dates;

/// Options for [`collect_deadlines`].
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Also mine syllabus documents for exam dates.
    pub include_syllabus: bool,
    /// Only these courses; empty means every active course.
    pub course_ids: Vec<u64>,
}

impl CollectOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable syllabus scanning.
    pub fn with_syllabus(mut self, include: bool) -> Self {
        self.include_syllabus = include;
        self
    }

    /// Builder method to restrict the course set.
    pub fn with_course_ids(mut self, ids: Vec<u64>) -> Self {
        self.course_ids = ids;
        self
    }

    fn wants(&self, course_id: u64) -> bool {
        self.course_ids.is_empty() || self.course_ids.contains(&course_id)
    }
}

/// Everything gathered by one aggregation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeadlineReport {
    /// The courses that were visited.
    pub courses: Vec<Course>,
    /// Items ready for the calendar layer.
    pub items: Vec<DeadlineItem>,
    /// Documents or courses that could not be read. These are never synced.
    pub failures: Vec<ExtractionFailure>,
}

/// Gathers assignments, calendar events and (optionally) syllabus exam dates
/// for every selected course.
///
/// A failure reading one course's assignments or events is logged and
/// treated as an empty list.
///
/// # Errors
///
/// Fails only if the course list itself cannot be fetched.
pub async fn collect_deadlines(
    source: &dyn CourseSource,
    pdf: &dyn PdfTextExtractor,
    options: &CollectOptions,
    now: NaiveDateTime,
) -> ProviderResult<DeadlineReport> {
    let courses = source.list_courses().await?;
    let mut report = DeadlineReport::default();

    for course in courses.into_iter().filter(|c| options.wants(c.id)) {
        let assignments = match source.list_assignments(course.id).await {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!(course_id = course.id, error = %e, "Could not list assignments");
                Vec::new()
            }
        };
        report
            .items
            .extend(assignments.iter().map(|a| assignment_item(&course, a)));

        let events = match source.list_calendar_events(course.id).await {
            Ok(events) => events,
            Err(e) => {
                warn!(course_id = course.id, error = %e, "Could not list calendar events");
                Vec::new()
            }
        };
        report
            .items
            .extend(events.iter().map(|e| event_item(&course, e)));

        if options.include_syllabus {
            match scan_syllabus_for_dates(source, pdf, course.id, now).await {
                Ok(candidates) => {
                    for candidate in dedup_events(candidates) {
                        match candidate {
                            Candidate::Event(event) => {
                                let mut item = DeadlineItem::from_exam(course.id, &event);
                                item.course_name = course.name.clone();
                                report.items.push(item);
                            }
                            Candidate::Error(failure) => report.failures.push(failure),
                        }
                    }
                }
                Err(e) => {
                    warn!(course_id = course.id, error = %e, "Syllabus scan failed");
                    report.failures.push(ExtractionFailure {
                        title: format!("Syllabus scan failed: {}", course.name),
                        description: e.to_string(),
                    });
                }
            }
        }

        report.courses.push(course);
    }

    info!(
        courses = report.courses.len(),
        items = report.items.len(),
        failures = report.failures.len(),
        "Collected deadlines"
    );
    Ok(report)
}

/// Converts an assignment into a deadline item (a single instant).
pub fn assignment_item(course: &Course, assignment: &Assignment) -> DeadlineItem {
    DeadlineItem {
        kind: ItemKind::Assignment,
        course_id: course.id,
        course_name: course.name.clone(),
        source_id: Some(assignment.id),
        title: assignment.name.clone(),
        start: assignment.due_at,
        end: assignment.due_at,
        description: plain_description(assignment.description.as_deref()),
        points: assignment.points_possible,
    }
}

/// Converts a calendar event into a deadline item.
pub fn event_item(course: &Course, event: &CourseEvent) -> DeadlineItem {
    DeadlineItem {
        kind: ItemKind::Event,
        course_id: course.id,
        course_name: course.name.clone(),
        source_id: Some(event.id),
        title: event.title.clone(),
        start: event.start_at,
        end: event.end_at,
        description: plain_description(event.description.as_deref()),
        points: None,
    }
}

fn plain_description(html: Option<&str>) -> String {
    html.map(html_to_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::syllabus::tests::{FakeSource, TextPdf, now, pdf_file};

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn two_courses() -> FakeSource {
        let mut source = FakeSource {
            courses: vec![Course::new(1, "Biology"), Course::new(2, "History")],
            ..FakeSource::default()
        };
        source.assignments.insert(
            1,
            vec![Assignment {
                id: 100,
                name: "Lab report".to_string(),
                due_at: at(9, 15, 23),
                description: Some("<p>Submit as PDF</p>".to_string()),
                points_possible: Some(20.0),
                html_url: None,
            }],
        );
        source.events.insert(
            2,
            vec![CourseEvent {
                id: 200,
                title: "Exam 1".to_string(),
                start_at: at(10, 1, 10),
                end_at: at(10, 1, 11),
                description: None,
                location: None,
            }],
        );
        source
    }

    #[tokio::test]
    async fn gathers_assignments_and_events() {
        let source = two_courses();
        let report = collect_deadlines(&source, &TextPdf, &CollectOptions::new(), now())
            .await
            .unwrap();

        assert_eq!(report.courses.len(), 2);
        assert_eq!(report.items.len(), 2);

        let lab = &report.items[0];
        assert_eq!(lab.kind, ItemKind::Assignment);
        assert_eq!(lab.course_name, "Biology");
        assert_eq!(lab.sync_key(), "assignment:1:100");
        assert_eq!(lab.description, "Submit as PDF");
        assert_eq!(lab.start, lab.end);

        let exam = &report.items[1];
        assert_eq!(exam.kind, ItemKind::Event);
        assert_eq!(exam.course_id, 2);
        assert_eq!(exam.sync_key(), "event:2:200");
    }

    #[tokio::test]
    async fn course_filter_limits_the_walk() {
        let source = two_courses();
        let options = CollectOptions::new().with_course_ids(vec![2]);
        let report = collect_deadlines(&source, &TextPdf, &options, now()).await.unwrap();

        assert_eq!(report.courses, vec![Course::new(2, "History")]);
        assert!(report.items.iter().all(|i| i.course_id == 2));
    }

    #[tokio::test]
    async fn assignment_failure_is_treated_as_empty() {
        let mut source = two_courses();
        source.fail_assignments = true;
        let report = collect_deadlines(&source, &TextPdf, &CollectOptions::new(), now())
            .await
            .unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].kind, ItemKind::Event);
    }

    #[tokio::test]
    async fn syllabus_items_are_deduplicated_and_failures_kept_apart() {
        let mut source = two_courses();
        source.syllabus.insert(
            1,
            "Midterm Oct 10\nchapter review\nlab work\nFinal Dec 12\nend".to_string(),
        );
        source.files.insert(1, vec![pdf_file(9, "Syllabus")]);

        let options = CollectOptions::new().with_syllabus(true);
        let report = collect_deadlines(&source, &TextPdf, &options, now()).await.unwrap();

        let syllabus: Vec<_> = report
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::Syllabus)
            .collect();
        let titles: Vec<_> = syllabus.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Midterm Exam", "Final Exam"]);
        assert!(syllabus.iter().all(|i| i.course_name == "Biology"));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].title, "PDF parse failed: Syllabus");
    }

    #[tokio::test]
    async fn syllabus_is_skipped_unless_requested() {
        let mut source = two_courses();
        source.syllabus.insert(1, "Final Dec 12".to_string());
        let report = collect_deadlines(&source, &TextPdf, &CollectOptions::new(), now())
            .await
            .unwrap();
        assert!(report.items.iter().all(|i| i.kind != ItemKind::Syllabus));
    }
}
