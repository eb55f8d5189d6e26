//! `sync`: write deadlines to a calendar.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use deadlinesync_providers::{
    CalendarTarget, IcsFileTarget, MemoryTarget, SyncReport, UpsertOptions, upsert_items,
};
use tracing::info;

use crate::cli::CollectArgs;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::SyncSession;

use super::canvas::{canvas_source, collect_options, fetch_session};

/// Message shown when there is nothing to sync.
pub const NOTHING_TO_SYNC: &str = "No assignments/events found.";

/// Writes the session's items to `target`.
///
/// Returns `None` when the session has no items; the target is not touched.
pub fn sync_session(
    session: &SyncSession,
    target: &mut dyn CalendarTarget,
    options: &UpsertOptions,
) -> Option<SyncReport> {
    if session.is_empty() {
        return None;
    }
    Some(upsert_items(target, session.items(), options))
}

/// Runs the `sync` command.
pub async fn run(
    config: &ClientConfig,
    args: &CollectArgs,
    ics: Option<PathBuf>,
    dry_run: bool,
    now: NaiveDateTime,
) -> ClientResult<()> {
    let source = canvas_source(config)?;
    let session = fetch_session(&source, &collect_options(args, config), now).await?;
    let options = config.calendar.upsert_options();

    let (mut target, label): (Box<dyn CalendarTarget>, String) = if dry_run {
        (Box::new(MemoryTarget::new()), "dry run".to_string())
    } else {
        let path = ics.unwrap_or_else(|| config.calendar.ics_path_or_default());
        let label = path.display().to_string();
        (Box::new(IcsFileTarget::open(path)?), label)
    };

    match sync_session(&session, target.as_mut(), &options) {
        Some(report) => {
            info!(created = report.created, updated = report.updated, "sync finished");
            println!("{}", report.summary(&label));
        }
        None => println!("{}", NOTHING_TO_SYNC),
    }

    for failure in session.failures() {
        eprintln!("warning: {}: {}", failure.title, failure.description);
    }
    Ok(())
}
