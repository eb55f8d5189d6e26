//! In-memory calendar target.

use std::collections::BTreeMap;

use crate::error::{ProviderError, ProviderResult};

use super::{CalendarTarget, EventPayload};

/// Calendar target that keeps events in memory, keyed by event id.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    events: BTreeMap<String, EventPayload>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored events ordered by event id.
    pub fn events(&self) -> impl Iterator<Item = &EventPayload> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, event_id: &str) -> Option<&EventPayload> {
        self.events.get(event_id)
    }
}

impl CalendarTarget for MemoryTarget {
    fn name(&self) -> &str {
        "memory"
    }

    fn find_by_key(&self, key: &str) -> ProviderResult<Option<String>> {
        Ok(self
            .events
            .iter()
            .find(|(_, event)| event.key == key)
            .map(|(id, _)| id.clone()))
    }

    fn insert(&mut self, payload: &EventPayload) -> ProviderResult<String> {
        if self.events.contains_key(&payload.uid) {
            return Err(ProviderError::calendar(format!(
                "event {} already exists",
                payload.uid
            ))
            .with_provider("memory"));
        }
        self.events.insert(payload.uid.clone(), payload.clone());
        Ok(payload.uid.clone())
    }

    fn update(&mut self, event_id: &str, payload: &EventPayload) -> ProviderResult<()> {
        match self.events.get_mut(event_id) {
            Some(event) => {
                *event = payload.clone();
                Ok(())
            }
            None => Err(ProviderError::not_found(format!("no event {}", event_id))
                .with_provider("memory")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::stable_uid;
    use crate::error::ProviderErrorCode;
    use chrono::NaiveDate;

    fn payload(key: &str, summary: &str) -> EventPayload {
        let start = NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        EventPayload {
            key: key.to_string(),
            uid: stable_uid(key),
            summary: summary.to_string(),
            description: String::new(),
            start,
            end: start,
            timezone: "UTC".to_string(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn insert_then_find() {
        let mut target = MemoryTarget::new();
        let id = target.insert(&payload("event:1:2", "Bio: Exam")).unwrap();
        assert_eq!(target.find_by_key("event:1:2").unwrap(), Some(id));
        assert_eq!(target.find_by_key("event:1:3").unwrap(), None);
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut target = MemoryTarget::new();
        let id = target.insert(&payload("event:1:2", "Bio: Exam")).unwrap();
        target.update(&id, &payload("event:1:2", "Bio: Exam 1")).unwrap();
        assert_eq!(target.len(), 1);
        assert_eq!(target.get(&id).unwrap().summary, "Bio: Exam 1");
    }

    #[test]
    fn update_of_unknown_event_fails() {
        let mut target = MemoryTarget::new();
        let err = target.update("nope", &payload("k", "s")).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
    }

    #[test]
    fn duplicate_insert_fails() {
        let mut target = MemoryTarget::new();
        target.insert(&payload("k", "s")).unwrap();
        let err = target.insert(&payload("k", "s")).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::CalendarError);
    }
}
