//! Reducers over an application's timeline.
//!
//! Events are never deleted, only superseded: for a given office the event
//! with the highest id is authoritative.

use std::collections::BTreeMap;

use nocportal_core::OfficeId;

use crate::event::{TimelineEvent, by_recency};

fn latest_by_office<'a>(
    events: impl IntoIterator<Item = &'a TimelineEvent>,
) -> Vec<TimelineEvent> {
    let mut latest: BTreeMap<&OfficeId, &TimelineEvent> = BTreeMap::new();
    for event in events {
        latest
            .entry(&event.office_id)
            .and_modify(|current| {
                if by_recency(event, *current).is_gt() {
                    *current = event;
                }
            })
            .or_insert(event);
    }
    latest.into_values().cloned().collect()
}

/// Latest event per department office.
///
/// District events are excluded. Output holds one event per department that
/// has ever acted, ordered by office id; callers sort for display.
pub fn latest_departments(events: &[TimelineEvent]) -> Vec<TimelineEvent> {
    let rows = latest_by_office(events.iter().filter(|e| e.is_department()));
    tracing::debug!(
        events = events.len(),
        departments = rows.len(),
        "reduced timeline to latest department rows"
    );
    rows
}

/// Latest event per office of any type (departments and districts).
pub fn latest_per_office(events: &[TimelineEvent]) -> Vec<TimelineEvent> {
    latest_by_office(events)
}

/// Every event in creation order, for full history tables.
pub fn chronological(events: &[TimelineEvent]) -> Vec<TimelineEvent> {
    let mut rows = events.to_vec();
    rows.sort_by(by_recency);
    rows
}
