//! Writes deadline items to a calendar target.

use deadlinesync_core::DeadlineItem;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{CalendarTarget, EventPayload, stable_uid};

/// Maximum number of error lines shown by [`SyncReport::summary`].
pub const MAX_REPORTED_ERRORS: usize = 20;

/// Options for [`upsert_items`].
#[derive(Debug, Clone)]
pub struct UpsertOptions {
    /// IANA timezone attached to every event.
    pub timezone: String,
    /// Category added to every event ahead of the item kind.
    pub category: String,
}

impl Default for UpsertOptions {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            category: "Canvas".to_string(),
        }
    }
}

impl UpsertOptions {
    /// Builder method to set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

/// Outcome of one upsert pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    /// One line per failed item: `"<title>: <error>"`.
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Total number of items written.
    pub fn synced(&self) -> usize {
        self.created + self.updated
    }

    /// Human-readable summary; at most [`MAX_REPORTED_ERRORS`] errors are listed.
    pub fn summary(&self, target: &str) -> String {
        let mut msg = format!(
            "{}: synced {} item(s) ({} created, {} updated)",
            target,
            self.synced(),
            self.created,
            self.updated
        );
        if !self.errors.is_empty() {
            msg.push_str("\n\nErrors:\n");
            msg.push_str(
                &self
                    .errors
                    .iter()
                    .take(MAX_REPORTED_ERRORS)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
            if self.errors.len() > MAX_REPORTED_ERRORS {
                msg.push_str(&format!(
                    "\n... and {} more",
                    self.errors.len() - MAX_REPORTED_ERRORS
                ));
            }
        }
        msg
    }
}

/// Builds the calendar event for an item.
///
/// Point-in-time items (end not after start) get a one-hour slot.
pub fn payload_for(item: &DeadlineItem, options: &UpsertOptions) -> EventPayload {
    let key = item.sync_key();
    EventPayload {
        uid: stable_uid(&key),
        key,
        summary: format!("{}: {}", item.course_name, item.title),
        description: item.description.clone(),
        start: item.start,
        end: item.effective_end(),
        timezone: options.timezone.clone(),
        categories: vec![options.category.clone(), item.kind.to_string()],
    }
}

/// Inserts or updates every item, looking each one up by its sync key.
///
/// Failures are collected per item; the pass always runs to the end and
/// then flushes the target.
pub fn upsert_items(
    target: &mut dyn CalendarTarget,
    items: &[DeadlineItem],
    options: &UpsertOptions,
) -> SyncReport {
    let mut report = SyncReport::default();

    for item in items {
        let payload = payload_for(item, options);
        let result = match target.find_by_key(&payload.key) {
            Ok(Some(event_id)) => target.update(&event_id, &payload).map(|()| false),
            Ok(None) => target.insert(&payload).map(|_| true),
            Err(e) => Err(e),
        };
        match result {
            Ok(true) => {
                debug!(key = %payload.key, "created event");
                report.created += 1;
            }
            Ok(false) => {
                debug!(key = %payload.key, "updated event");
                report.updated += 1;
            }
            Err(e) => {
                warn!(key = %payload.key, error = %e, "failed to write event");
                report.errors.push(format!("{}: {}", item.title, e));
            }
        }
    }

    if let Err(e) = target.flush() {
        warn!(calendar = target.name(), error = %e, "failed to flush calendar");
        report.errors.push(format!("flush: {}", e));
    }

    info!(
        calendar = target.name(),
        created = report.created,
        updated = report.updated,
        errors = report.errors.len(),
        "Upsert complete"
    );
    report
}
