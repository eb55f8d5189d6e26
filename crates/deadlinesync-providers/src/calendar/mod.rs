//! Calendar targets and the upsert pass.
//!
//! A [`CalendarTarget`] stores events under a stable per-item key so that
//! repeated syncs update entries in place instead of duplicating them.
//!
//! - [`MemoryTarget`]: in-process store, used for dry runs and tests
//! - [`IcsFileTarget`]: an `.ics` file on disk
//! - [`upsert_items`]: writes deadline items to any target

mod ics;
mod memory;
mod upsert;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::ProviderResult;

pub use ics::{IcsFileTarget, KEY_PROPERTY};
pub use memory::MemoryTarget;
pub use upsert::{MAX_REPORTED_ERRORS, SyncReport, UpsertOptions, payload_for, upsert_items};

/// The event written to a calendar for one deadline item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    /// Stable item key (see `DeadlineItem::sync_key`).
    pub key: String,
    /// Stable event UID derived from the key.
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA timezone name the wall-clock times are in.
    pub timezone: String,
    pub categories: Vec<String>,
}

/// Returns the event UID for an item key: `canvas-` plus the MD5 of the key.
pub fn stable_uid(key: &str) -> String {
    format!("canvas-{:x}", md5::compute(key.as_bytes()))
}

/// A calendar that events can be looked up in and written to.
pub trait CalendarTarget: Send {
    /// Returns the name of this target (e.g. "memory", "ics").
    fn name(&self) -> &str;

    /// Finds the event stored under `key`, returning its event id.
    fn find_by_key(&self, key: &str) -> ProviderResult<Option<String>>;

    /// Inserts a new event and returns its event id.
    fn insert(&mut self, payload: &EventPayload) -> ProviderResult<String>;

    /// Replaces the event with the given id.
    fn update(&mut self, event_id: &str, payload: &EventPayload) -> ProviderResult<()>;

    /// Persists pending writes.
    ///
    /// The default implementation does nothing.
    fn flush(&mut self) -> ProviderResult<()> {
        Ok(())
    }
}
