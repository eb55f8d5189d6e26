//! iCalendar file target.
//!
//! Events are written as VEVENTs whose UID is the item's stable id and whose
//! `X-DEADLINESYNC-KEY` property carries the item key. Events in the file
//! that were not written by deadlinesync are preserved untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

use super::{CalendarTarget, EventPayload};

/// Custom property holding the item key.
pub const KEY_PROPERTY: &str = "X-DEADLINESYNC-KEY";

/// Calendar target backed by an `.ics` file.
///
/// The file is read once on [`open`](Self::open) and rewritten on
/// [`flush`](CalendarTarget::flush).
#[derive(Debug)]
pub struct IcsFileTarget {
    path: PathBuf,
    events: BTreeMap<String, EventPayload>,
    foreign: Vec<Event>,
    dirty: bool,
}

impl IcsFileTarget {
    /// Opens (or prepares to create) the calendar file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> ProviderResult<Self> {
        let path = path.into();
        let mut target = Self {
            path,
            events: BTreeMap::new(),
            foreign: Vec::new(),
            dirty: false,
        };

        if target.path.exists() {
            let content = std::fs::read_to_string(&target.path).map_err(|e| {
                ProviderError::calendar(format!(
                    "failed to read {}: {}",
                    target.path.display(),
                    e
                ))
                .with_provider("ics")
                .with_source(e)
            })?;
            target.load(&content)?;
        }

        info!(
            path = %target.path.display(),
            events = target.events.len(),
            foreign = target.foreign.len(),
            "Opened calendar file"
        );
        Ok(target)
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the events managed by deadlinesync, ordered by UID.
    pub fn events(&self) -> impl Iterator<Item = &EventPayload> {
        self.events.values()
    }

    fn load(&mut self, content: &str) -> ProviderResult<()> {
        let calendar = content.parse::<Calendar>().map_err(|e| {
            ProviderError::calendar(format!("failed to parse {}: {}", self.path.display(), e))
                .with_provider("ics")
        })?;

        for component in calendar.iter() {
            let CalendarComponent::Event(event) = component else {
                continue;
            };
            match payload_from_event(event) {
                Some(payload) => {
                    self.events.insert(payload.uid.clone(), payload);
                }
                None => self.foreign.push(event.clone()),
            }
        }
        Ok(())
    }

    /// Renders the calendar as iCalendar text.
    pub fn render(&self) -> String {
        let mut calendar = Calendar::new();
        for event in &self.foreign {
            calendar.push(event.clone());
        }
        for payload in self.events.values() {
            calendar.push(event_from_payload(payload));
        }
        calendar.done().to_string()
    }
}

impl CalendarTarget for IcsFileTarget {
    fn name(&self) -> &str {
        "ics"
    }

    fn find_by_key(&self, key: &str) -> ProviderResult<Option<String>> {
        Ok(self
            .events
            .values()
            .find(|event| event.key == key)
            .map(|event| event.uid.clone()))
    }

    fn insert(&mut self, payload: &EventPayload) -> ProviderResult<String> {
        if self.events.contains_key(&payload.uid) {
            return Err(ProviderError::calendar(format!(
                "event {} already exists",
                payload.uid
            ))
            .with_provider("ics"));
        }
        self.events.insert(payload.uid.clone(), payload.clone());
        self.dirty = true;
        Ok(payload.uid.clone())
    }

    fn update(&mut self, event_id: &str, payload: &EventPayload) -> ProviderResult<()> {
        if self.events.remove(event_id).is_none() {
            return Err(ProviderError::not_found(format!("no event {}", event_id)).with_provider("ics"));
        }
        self.events.insert(payload.uid.clone(), payload.clone());
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> ProviderResult<()> {
        if !self.dirty {
            debug!(path = %self.path.display(), "Calendar file unchanged");
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.render()).map_err(|e| {
            ProviderError::calendar(format!("failed to write {}: {}", self.path.display(), e))
                .with_provider("ics")
                .with_source(e)
        })?;
        self.dirty = false;

        info!(path = %self.path.display(), events = self.events.len(), "Wrote calendar file");
        Ok(())
    }
}

fn event_from_payload(payload: &EventPayload) -> Event {
    let mut event = Event::new();
    event
        .uid(&payload.uid)
        .summary(&payload.summary)
        .starts(zoned(payload.start, &payload.timezone))
        .ends(zoned(payload.end, &payload.timezone))
        .add_property(KEY_PROPERTY, &payload.key);
    if !payload.description.is_empty() {
        event.description(&payload.description);
    }
    if !payload.categories.is_empty() {
        event.add_property("CATEGORIES", payload.categories.join(","));
    }
    event.done()
}

fn zoned(date_time: NaiveDateTime, timezone: &str) -> CalendarDateTime {
    if timezone.is_empty() {
        CalendarDateTime::Floating(date_time)
    } else {
        CalendarDateTime::WithTimezone {
            date_time,
            tzid: timezone.to_string(),
        }
    }
}

/// Rebuilds a payload from a VEVENT written by this target.
///
/// Returns `None` for events without the key property.
fn payload_from_event(event: &Event) -> Option<EventPayload> {
    let key = event.property_value(KEY_PROPERTY)?.to_string();
    let uid = event.get_uid()?.to_string();

    let (start, timezone) = match wall_time(event.get_start()?) {
        Some(parsed) => parsed,
        None => {
            warn!(uid, "Skipping event with a date-only start");
            return None;
        }
    };
    let end = event
        .get_end()
        .and_then(wall_time)
        .map_or(start, |(end, _)| end);

    let categories = event
        .property_value("CATEGORIES")
        .map(|value| {
            value
                .split(',')
                .map(|c| c.trim().trim_end_matches('\\'))
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(EventPayload {
        key,
        uid,
        summary: event.get_summary().unwrap_or_default().to_string(),
        description: event.get_description().unwrap_or_default().to_string(),
        start,
        end,
        timezone,
        categories,
    })
}

fn wall_time(value: DatePerhapsTime) -> Option<(NaiveDateTime, String)> {
    match value {
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            Some((date_time, tzid))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(date_time)) => {
            Some((date_time, String::new()))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(date_time)) => {
            Some((date_time.naive_utc(), "UTC".to_string()))
        }
        DatePerhapsTime::Date(_) => None,
    }
}
