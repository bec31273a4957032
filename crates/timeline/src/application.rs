//! Application records and timeline snapshots as read from the backend.

use serde::{Deserialize, Deserializer, Serialize};

use serde_json::Value as JsonValue;

use nocportal_core::{ApplicationId, DomainError};

use crate::checklist::{Checklist, CompletionRecord, checklist};
use crate::event::{RawTimelineEvent, TimelineEvent, parse_events};
use crate::status::MasterStatus;

pub use crate::checklist::{Forms, Progress};

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(matches!(raw, Some(JsonValue::Bool(true))))
}

/// Terminal sign-off recorded on the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalApproval {
    #[serde(deserialize_with = "lenient_bool")]
    pub completed: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_approved: bool,
    pub status: Option<String>,
    pub document_url: Option<String>,
    pub approved_at: Option<String>,
}

impl FinalApproval {
    /// Completed and approved: overrides every department-level state.
    pub fn is_granted(&self) -> bool {
        self.completed && self.is_approved
    }
}

/// Application record exactly as the backend sends it.
///
/// The primary key may arrive as `applicationId`, `id`, or both. A usable
/// `applicationId` wins over `id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawApplication {
    application_id: Option<JsonValue>,
    id: Option<JsonValue>,
    application_number: Option<String>,
    status: MasterStatus,
    final_approval: Option<FinalApproval>,
    #[serde(flatten)]
    completion: CompletionRecord,
}

impl TryFrom<RawApplication> for Application {
    type Error = DomainError;

    fn try_from(raw: RawApplication) -> Result<Self, Self::Error> {
        let from_key = |key: Option<&JsonValue>| key.map(ApplicationId::try_from);
        let application_id = match (
            from_key(raw.application_id.as_ref()),
            from_key(raw.id.as_ref()),
        ) {
            (Some(Ok(id)), _) | (_, Some(Ok(id))) => id,
            (Some(Err(err)), _) | (None, Some(Err(err))) => return Err(err),
            (None, None) => {
                return Err(DomainError::invalid_id("application is missing applicationId"));
            }
        };

        Ok(Application {
            application_id,
            application_number: raw.application_number,
            status: raw.status,
            final_approval: raw.final_approval,
            completion: raw.completion,
        })
    }
}

/// Application summary as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawApplication")]
pub struct Application {
    pub application_id: ApplicationId,
    pub application_number: Option<String>,
    pub status: MasterStatus,
    pub final_approval: Option<FinalApproval>,
    #[serde(flatten)]
    pub completion: CompletionRecord,
}

impl Application {
    pub fn new(application_id: ApplicationId, status: MasterStatus) -> Self {
        Self {
            application_id,
            application_number: None,
            status,
            final_approval: None,
            completion: CompletionRecord::default(),
        }
    }

    pub fn checklist(&self) -> Checklist {
        checklist(&self.completion)
    }

    /// Human-readable reference, falling back to the id.
    pub fn reference(&self) -> &str {
        self.application_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.application_id.as_str())
    }

    pub fn granted_final_approval(&self) -> Option<&FinalApproval> {
        self.final_approval.as_ref().filter(|fa| fa.is_granted())
    }

    /// Fill fields this record lacks from another record of the same
    /// application (e.g. a list summary that embeds `forms`/`progress`).
    ///
    /// The master status of `self` is kept as-is.
    pub fn fill_missing_from(&mut self, other: &Application) {
        if self.application_id != other.application_id {
            return;
        }
        if self.application_number.is_none() {
            self.application_number = other.application_number.clone();
        }
        if self.final_approval.is_none() {
            self.final_approval = other.final_approval.clone();
        }
        if self.completion.forms.is_none() {
            self.completion.forms = other.completion.forms.clone();
        }
        if self.completion.progress.is_none() {
            self.completion.progress = other.completion.progress.clone();
        }
    }
}

fn deserialize_timeline<'de, D>(deserializer: D) -> Result<Vec<TimelineEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawTimelineEvent>>::deserialize(deserializer)?;
    Ok(parse_events(raw.unwrap_or_default()))
}

/// Consistent `(application, timeline)` snapshot for one application.
///
/// Malformed timeline rows are dropped while deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSnapshot {
    pub application: Application,
    #[serde(default, deserialize_with = "deserialize_timeline")]
    pub timeline: Vec<TimelineEvent>,
}

impl ApplicationSnapshot {
    pub fn new(application: Application, timeline: Vec<TimelineEvent>) -> Self {
        Self {
            application,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_reads_backend_summary() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "applicationId": 12,
            "applicationNumber": "NOC-2024-0012",
            "status": "processing",
            "finalApproval": { "completed": true, "isApproved": false },
            "progress": { "nocDocumentsSubmitted": true },
            "forms": { "annexureOne": {} },
            "unrelated": "ignored"
        }))
        .unwrap();

        assert_eq!(app.application_id.as_str(), "12");
        assert_eq!(app.reference(), "NOC-2024-0012");
        assert_eq!(app.status, MasterStatus::Processing);
        assert!(app.granted_final_approval().is_none());
        assert_eq!(app.checklist().completed(), 2);
    }

    #[test]
    fn final_approval_requires_both_flags() {
        let granted: FinalApproval = serde_json::from_value(serde_json::json!({
            "completed": true, "isApproved": true, "documentUrl": "noc.pdf"
        }))
        .unwrap();
        assert!(granted.is_granted());

        let odd: FinalApproval = serde_json::from_value(serde_json::json!({
            "completed": null, "isApproved": "yes"
        }))
        .unwrap();
        assert!(!odd.is_granted());
    }

    #[test]
    fn application_id_key_wins_over_id() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "id": 5,
            "applicationId": "APP-5",
            "status": "PROCESSING"
        }))
        .unwrap();
        assert_eq!(app.application_id.as_str(), "APP-5");
        assert_eq!(app.status, MasterStatus::Processing);

        let app: Application = serde_json::from_value(serde_json::json!({
            "id": 5,
            "applicationId": null
        }))
        .unwrap();
        assert_eq!(app.application_id.as_str(), "5");

        let app: Application = serde_json::from_value(serde_json::json!({
            "id": { "oid": "x" },
            "applicationId": "APP-6"
        }))
        .unwrap();
        assert_eq!(app.application_id.as_str(), "APP-6");
    }

    #[test]
    fn application_without_any_id_is_rejected() {
        let err = serde_json::from_value::<Application>(serde_json::json!({ "status": "SUBMITTED" }))
            .unwrap_err();
        assert!(err.to_string().contains("applicationId"));
    }

    #[test]
    fn application_round_trips_through_its_own_serialization() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "applicationId": "APP-9",
            "applicationNumber": "NOC-9",
            "status": "FORWARDED",
            "progress": { "nocDocumentsSubmitted": true }
        }))
        .unwrap();
        let again: Application = serde_json::from_value(serde_json::to_value(&app).unwrap()).unwrap();
        assert_eq!(again, app);
    }

    #[test]
    fn minimal_application_uses_defaults() {
        let app: Application =
            serde_json::from_value(serde_json::json!({ "id": "abc" })).unwrap();
        assert_eq!(app.status, MasterStatus::Submitted);
        assert_eq!(app.reference(), "abc");
        assert!(!app.checklist().all_done);
    }

    #[test]
    fn fill_missing_keeps_own_status() {
        let mut fresh: Application = serde_json::from_value(serde_json::json!({
            "applicationId": "A1", "status": "REJECTED"
        }))
        .unwrap();
        let listed: Application = serde_json::from_value(serde_json::json!({
            "applicationId": "A1",
            "applicationNumber": "NOC-7",
            "status": "PROCESSING",
            "progress": { "nocDocumentsSubmitted": true }
        }))
        .unwrap();

        fresh.fill_missing_from(&listed);
        assert_eq!(fresh.status, MasterStatus::Rejected);
        assert_eq!(fresh.reference(), "NOC-7");
        assert_eq!(fresh.checklist().completed(), 1);

        let other: Application =
            serde_json::from_value(serde_json::json!({ "applicationId": "B2", "applicationNumber": "X" }))
                .unwrap();
        fresh.fill_missing_from(&other);
        assert_eq!(fresh.reference(), "NOC-7");
    }

    #[test]
    fn snapshot_skips_malformed_events() {
        let snapshot: ApplicationSnapshot = serde_json::from_value(serde_json::json!({
            "application": { "applicationId": "A1", "status": "FORWARDED" },
            "timeline": [
                { "id": 1, "officeId": "P", "officeType": "DEPARTMENT", "status": "PENDING" },
                { "officeId": "Q", "officeType": "DEPARTMENT" },
                { "id": 2, "officeType": "DISTRICT" }
            ]
        }))
        .unwrap();
        assert_eq!(snapshot.timeline.len(), 1);
        assert_eq!(snapshot.application.status, MasterStatus::Forwarded);
    }

    #[test]
    fn snapshot_without_timeline_is_empty() {
        let snapshot: ApplicationSnapshot = serde_json::from_value(serde_json::json!({
            "application": { "applicationId": "A1" },
            "timeline": null
        }))
        .unwrap();
        assert!(snapshot.timeline.is_empty());
    }
}
