//! `courses` and `deadlines`: read-only Canvas commands.

use chrono::NaiveDateTime;
use deadlinesync_core::DeadlineItem;
use deadlinesync_providers::canvas::CanvasSource;
use deadlinesync_providers::{
    CollectOptions, Course, CourseSource, PdfExtract, collect_deadlines,
};

use crate::cli::CollectArgs;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::SyncSession;

/// Builds the Canvas source from configuration.
pub fn canvas_source(config: &ClientConfig) -> ClientResult<CanvasSource> {
    let source_config = config.canvas()?.to_source_config()?;
    Ok(CanvasSource::new(source_config)?)
}

/// Merges command-line flags with the `[scan]` settings.
///
/// `--syllabus` turns scanning on; `--course-id` replaces the configured list.
pub fn collect_options(args: &CollectArgs, config: &ClientConfig) -> CollectOptions {
    let course_ids = if args.course_ids.is_empty() {
        config.scan.course_ids.clone()
    } else {
        args.course_ids.clone()
    };
    CollectOptions::new()
        .with_syllabus(args.syllabus || config.scan.include_syllabus)
        .with_course_ids(course_ids)
}

/// Fetches everything into a new session.
pub async fn fetch_session(
    source: &dyn CourseSource,
    options: &CollectOptions,
    now: NaiveDateTime,
) -> ClientResult<SyncSession> {
    let report = collect_deadlines(source, &PdfExtract, options, now).await?;
    let mut session = SyncSession::from_report(report);
    session.sort_items();
    Ok(session)
}

/// Renders the course list.
pub fn render_courses(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No active courses.".to_string();
    }
    courses
        .iter()
        .map(|course| match course.course_code.as_deref() {
            Some(code) => format!("{:>8}  {} ({})", course.id, course.name, code),
            None => format!("{:>8}  {}", course.id, course.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders deadline items, one per line.
pub fn render_items(items: &[DeadlineItem]) -> String {
    if items.is_empty() {
        return "No assignments/events found.".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "{}  {:<10} {}: {}",
                item.start.format("%a %Y-%m-%d %H:%M"),
                item.kind.as_str(),
                item.course_name,
                item.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the session: items, then any documents that failed.
pub fn render_session(session: &SyncSession) -> String {
    let mut out = render_items(session.items());
    if !session.failures().is_empty() {
        out.push_str("\n\nCould not read:\n");
        out.push_str(
            &session
                .failures()
                .iter()
                .map(|f| format!("  {}: {}", f.title, f.description))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    out
}

/// Runs the `courses` command.
pub async fn courses(config: &ClientConfig, json: bool) -> ClientResult<()> {
    let source = canvas_source(config)?;
    let mut session = SyncSession::new();
    session.record_courses(source.list_courses().await?);

    if json {
        println!("{}", serde_json::to_string_pretty(session.courses())?);
    } else {
        println!("{}", render_courses(session.courses()));
    }
    Ok(())
}

/// Runs the `deadlines` command.
pub async fn deadlines(
    config: &ClientConfig,
    args: &CollectArgs,
    json: bool,
    now: NaiveDateTime,
) -> ClientResult<()> {
    let source = canvas_source(config)?;
    let session = fetch_session(&source, &collect_options(args, config), now).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(session.items())?);
    } else {
        println!("{}", render_session(&session));
    }
    Ok(())
}
