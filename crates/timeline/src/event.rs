//! Timeline events: one office's action on an application.
//!
//! Events arrive from the backend as loosely-typed JSON. [`RawTimelineEvent`]
//! mirrors that shape with every field optional; [`TimelineEvent`] is the
//! validated form the reducers work on.

use core::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use nocportal_core::{DomainError, DomainResult, EventId, OfficeId};

use crate::status::ReviewStatus;

/// Kind of reviewing office.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OfficeType {
    Department,
    District,
    #[default]
    Unspecified,
}

impl OfficeType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEPARTMENT" => OfficeType::Department,
            "DISTRICT" => OfficeType::District,
            _ => OfficeType::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfficeType::Department => "DEPARTMENT",
            OfficeType::District => "DISTRICT",
            OfficeType::Unspecified => "UNSPECIFIED",
        }
    }
}

impl Serialize for OfficeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Timeline event exactly as the backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTimelineEvent {
    pub id: Option<JsonValue>,
    pub office_id: Option<JsonValue>,
    pub office_type: Option<String>,
    pub office_name: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub forwarded_at: Option<String>,
    pub decided_at: Option<String>,
    pub document_url: Option<String>,
    pub forwarded_letter_url: Option<String>,
}

/// Validated timeline event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: EventId,
    pub office_id: OfficeId,
    pub office_type: OfficeType,
    pub office_name: String,
    pub status: ReviewStatus,
    pub remarks: Option<String>,
    pub forwarded_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub document_url: Option<String>,
    pub forwarded_letter_url: Option<String>,
}

impl TimelineEvent {
    /// Minimal constructor; optional fields start empty.
    pub fn new(
        id: EventId,
        office_id: OfficeId,
        office_type: OfficeType,
        status: ReviewStatus,
    ) -> Self {
        Self {
            id,
            office_name: office_id.to_string(),
            office_id,
            office_type,
            status,
            remarks: None,
            forwarded_at: None,
            decided_at: None,
            document_url: None,
            forwarded_letter_url: None,
        }
    }

    pub fn with_office_name(mut self, name: impl Into<String>) -> Self {
        self.office_name = name.into();
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn is_department(&self) -> bool {
        self.office_type == OfficeType::Department
    }

    /// Remarks with surrounding whitespace removed; blank remarks are `None`.
    pub fn remarks(&self) -> Option<&str> {
        self.remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Most recent timestamp recorded on the event.
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.decided_at.or(self.forwarded_at)
    }
}

/// Recency order between events: a higher id is more recent.
///
/// Ids are assigned in creation order, so this is the only ordering the
/// reducers rely on. Timestamps are display data and may be missing.
pub fn by_recency(a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
    a.id.cmp(&b.id)
}

fn parse_event_id(value: &JsonValue) -> DomainResult<EventId> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .map(EventId::new)
            .ok_or_else(|| DomainError::malformed_event(format!("id is not a positive integer: {n}"))),
        JsonValue::String(s) => s
            .parse::<EventId>()
            .map_err(|e| DomainError::malformed_event(e.to_string())),
        other => Err(DomainError::malformed_event(format!("unexpected id: {other}"))),
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawTimelineEvent> for TimelineEvent {
    type Error = DomainError;

    fn try_from(raw: RawTimelineEvent) -> Result<Self, Self::Error> {
        let id = match raw.id.as_ref() {
            Some(JsonValue::Null) | None => return Err(DomainError::malformed_event("missing id")),
            Some(value) => parse_event_id(value)?,
        };
        let office_id = match raw.office_id.as_ref() {
            Some(JsonValue::Null) | None => {
                return Err(DomainError::malformed_event(format!(
                    "event {id} is missing officeId"
                )));
            }
            Some(value) => OfficeId::try_from(value)
                .map_err(|e| DomainError::malformed_event(format!("event {id}: {e}")))?,
        };

        let office_name = non_blank(raw.office_name).unwrap_or_else(|| office_id.to_string());

        Ok(TimelineEvent {
            id,
            office_type: raw
                .office_type
                .as_deref()
                .map(OfficeType::parse)
                .unwrap_or_default(),
            office_name,
            office_id,
            status: raw.status.as_deref().map(ReviewStatus::parse).unwrap_or_default(),
            remarks: non_blank(raw.remarks),
            forwarded_at: parse_timestamp(raw.forwarded_at.as_deref()),
            decided_at: parse_timestamp(raw.decided_at.as_deref()),
            document_url: non_blank(raw.document_url),
            forwarded_letter_url: non_blank(raw.forwarded_letter_url),
        })
    }
}

/// Validate a batch of raw events, skipping (and logging) malformed ones.
pub fn parse_events(raw: impl IntoIterator<Item = RawTimelineEvent>) -> Vec<TimelineEvent> {
    raw.into_iter()
        .filter_map(|event| match TimelineEvent::try_from(event) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(error = %err, "skipping timeline event");
                None
            }
        })
        .collect()
}
