//! Display model for an application's review progress.
//!
//! The output is plain data: any UI (web, TUI, report) renders it without
//! re-deriving status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nocportal_core::OfficeId;

use crate::application::FinalApproval;
use crate::checklist::{Checklist, ChecklistItem};
use crate::event::TimelineEvent;
use crate::resolver::overall_status;
use crate::status::{MasterStatus, OverallStatus, ReviewStatus, StatusBucket};

/// Display strings used when building a [`DisplayModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Banner shown once final approval is granted.
    pub granted_banner: String,
    /// Suffix of the progress fraction, as in `"2/3 Approved"`.
    pub approved_suffix: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            granted_banner: "NOC Permission Granted".to_string(),
            approved_suffix: "Approved".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Red,
    Gray,
    Blue,
    Amber,
}

impl From<StatusBucket> for Tone {
    fn from(bucket: StatusBucket) -> Self {
        match bucket {
            StatusBucket::Approved => Tone::Green,
            StatusBucket::Rejected => Tone::Red,
            StatusBucket::Pending => Tone::Gray,
        }
    }
}

impl From<OverallStatus> for Tone {
    fn from(status: OverallStatus) -> Self {
        match status {
            OverallStatus::Submitted => Tone::Blue,
            OverallStatus::Forwarded => Tone::Amber,
            OverallStatus::Approved => Tone::Green,
            OverallStatus::Rejected => Tone::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl From<OverallStatus> for Badge {
    fn from(status: OverallStatus) -> Self {
        Self {
            label: status.label().to_string(),
            tone: status.into(),
        }
    }
}

/// One department's latest decision, ready for a badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBadge {
    pub office_id: OfficeId,
    pub office_name: String,
    pub status: ReviewStatus,
    pub bucket: StatusBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<&TimelineEvent> for DepartmentBadge {
    fn from(row: &TimelineEvent) -> Self {
        Self {
            office_id: row.office_id.clone(),
            office_name: row.office_name.clone(),
            status: row.status.clone(),
            bucket: row.status.bucket(),
            decided_at: row.last_touched(),
        }
    }
}

/// One progress-bar segment per department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSegment {
    pub office_name: String,
    pub tone: Tone,
}

/// Remarks surfaced next to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarksAnnotation {
    pub office_name: String,
    pub remarks: String,
}

/// Per-department breakdown once every sub-form is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBreakdown {
    pub overall: OverallStatus,
    pub badge: Badge,
    pub rejected: Vec<DepartmentBadge>,
    pub approved: Vec<DepartmentBadge>,
    pub pending: Vec<DepartmentBadge>,
    pub segments: Vec<ProgressSegment>,
    pub approved_count: usize,
    pub total_count: usize,
    pub fraction: String,
    pub percent_approved: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<RemarksAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayModel {
    /// Some sub-forms are still missing; no review state yet.
    Incomplete {
        items: Vec<ChecklistItem>,
        completed: usize,
        total: usize,
        percent: u8,
    },
    /// Final approval granted; replaces the per-department breakdown.
    Granted {
        banner: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        document_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        approved_at: Option<String>,
    },
    Review(ReviewBreakdown),
}

impl DisplayModel {
    /// Overall status shown by this model, if it has one.
    pub fn overall(&self) -> Option<OverallStatus> {
        match self {
            DisplayModel::Incomplete { .. } => None,
            DisplayModel::Granted { .. } => Some(OverallStatus::Approved),
            DisplayModel::Review(review) => Some(review.overall),
        }
    }
}

fn most_recent<'a>(rows: impl Iterator<Item = &'a TimelineEvent>) -> Option<&'a TimelineEvent> {
    rows.max_by(|a, b| crate::event::by_recency(a, b))
}

fn annotation(rows: &[TimelineEvent], overall: OverallStatus) -> Option<RemarksAnnotation> {
    let rejected = most_recent(rows.iter().filter(|r| r.status.is_rejected()));
    let row = match (overall, rejected) {
        (OverallStatus::Rejected, Some(row)) => row,
        _ => most_recent(rows.iter())?,
    };
    row.remarks().map(|remarks| RemarksAnnotation {
        office_name: row.office_name.clone(),
        remarks: remarks.to_string(),
    })
}

fn group(rows: &[TimelineEvent], bucket: StatusBucket) -> Vec<&TimelineEvent> {
    let mut group: Vec<&TimelineEvent> =
        rows.iter().filter(|r| r.status.bucket() == bucket).collect();
    group.sort_by(|a, b| crate::event::by_recency(b, a));
    group
}

fn breakdown(
    department_rows: &[TimelineEvent],
    master: &MasterStatus,
    config: &PresentationConfig,
) -> ReviewBreakdown {
    let overall = overall_status(department_rows, master);

    let rejected = group(department_rows, StatusBucket::Rejected);
    let approved = group(department_rows, StatusBucket::Approved);
    let pending = group(department_rows, StatusBucket::Pending);

    let segments = rejected
        .iter()
        .chain(approved.iter())
        .chain(pending.iter())
        .map(|row| ProgressSegment {
            office_name: row.office_name.clone(),
            tone: row.status.bucket().into(),
        })
        .collect();

    let approved_count = approved.len();
    let total_count = department_rows.len();
    let percent_approved = match total_count {
        0 => 0,
        total => ((approved_count * 100) / total) as u8,
    };
    let badges = |rows: Vec<&TimelineEvent>| -> Vec<DepartmentBadge> {
        rows.into_iter().map(DepartmentBadge::from).collect()
    };

    ReviewBreakdown {
        overall,
        badge: overall.into(),
        rejected: badges(rejected),
        approved: badges(approved),
        pending: badges(pending),
        segments,
        approved_count,
        total_count,
        fraction: format!("{approved_count}/{total_count} {}", config.approved_suffix),
        percent_approved,
        remarks: annotation(department_rows, overall),
    }
}

/// Build the display model for one application.
///
/// A granted final approval short-circuits everything else. Otherwise an
/// incomplete checklist is shown as-is, and only a fully submitted
/// application gets the per-department breakdown.
pub fn present_progress(
    department_rows: &[TimelineEvent],
    master: &MasterStatus,
    checklist: &Checklist,
    final_approval: Option<&FinalApproval>,
    config: &PresentationConfig,
) -> DisplayModel {
    if let Some(fa) = final_approval.filter(|fa| fa.is_granted()) {
        return DisplayModel::Granted {
            banner: config.granted_banner.clone(),
            document_url: fa.document_url.clone(),
            approved_at: fa.approved_at.clone(),
        };
    }

    if !checklist.all_done {
        return DisplayModel::Incomplete {
            items: checklist.items.clone(),
            completed: checklist.completed(),
            total: checklist.total(),
            percent: checklist.percent(),
        };
    }

    DisplayModel::Review(breakdown(department_rows, master, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{CompletionRecord, checklist};
    use crate::event::OfficeType;
    use nocportal_core::EventId;

    fn dept(id: u64, office: &str, status: &str) -> TimelineEvent {
        TimelineEvent::new(
            EventId::new(id),
            OfficeId::new(office).unwrap(),
            OfficeType::Department,
            ReviewStatus::parse(status),
        )
        .with_office_name(format!("{office} Department"))
    }

    fn complete() -> Checklist {
        let record: CompletionRecord = serde_json::from_value(serde_json::json!({
            "progress": {
                "annexureOneCompleted": true,
                "nocFormCompleted": true,
                "annexureAFilledOrNot": true,
                "undertakingUploaded": true,
                "nocDocumentsSubmitted": true
            }
        }))
        .unwrap();
        checklist(&record)
    }

    fn expect_review(model: DisplayModel) -> ReviewBreakdown {
        match model {
            DisplayModel::Review(review) => review,
            other => panic!("Expected review breakdown, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_checklist_skips_department_state() {
        let rows = vec![dept(1, "Police", "REJECTED")];
        let model = present_progress(
            &rows,
            &MasterStatus::Processing,
            &checklist(&CompletionRecord::default()),
            None,
            &PresentationConfig::default(),
        );
        match model {
            DisplayModel::Incomplete { items, completed, total, percent } => {
                assert_eq!(items.len(), 5);
                assert_eq!((completed, total, percent), (0, 5, 0));
            }
            other => panic!("Expected incomplete model, got {other:?}"),
        }
    }

    #[test]
    fn granted_final_approval_replaces_breakdown() {
        let rows = vec![dept(1, "Police", "PENDING"), dept(2, "Forest", "FORWARDED")];
        let fa = FinalApproval {
            completed: true,
            is_approved: true,
            document_url: Some("https://files/noc.pdf".to_string()),
            ..FinalApproval::default()
        };
        let model = present_progress(
            &rows,
            &MasterStatus::Processing,
            &complete(),
            Some(&fa),
            &PresentationConfig::default(),
        );
        assert_eq!(
            model,
            DisplayModel::Granted {
                banner: "NOC Permission Granted".to_string(),
                document_url: Some("https://files/noc.pdf".to_string()),
                approved_at: None,
            }
        );
        assert_eq!(model.overall(), Some(OverallStatus::Approved));
    }

    #[test]
    fn incomplete_final_approval_is_ignored() {
        let fa = FinalApproval {
            completed: true,
            is_approved: false,
            ..FinalApproval::default()
        };
        let model = present_progress(
            &[],
            &MasterStatus::Submitted,
            &complete(),
            Some(&fa),
            &PresentationConfig::default(),
        );
        assert_eq!(model.overall(), Some(OverallStatus::Submitted));
    }

    #[test]
    fn rows_are_partitioned_with_fraction_and_segments() {
        let rows = vec![
            dept(1, "Police", "APPROVED"),
            dept(2, "Forest", "ACCEPTED"),
            dept(3, "Fire", "PENDING"),
            dept(4, "Traffic", "needs review"),
        ];
        let review = expect_review(present_progress(
            &rows,
            &MasterStatus::Processing,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));

        assert_eq!(review.overall, OverallStatus::Forwarded);
        assert_eq!(review.badge.tone, Tone::Amber);
        assert_eq!(review.approved.len(), 2);
        assert_eq!(review.pending.len(), 2);
        assert!(review.rejected.is_empty());
        assert_eq!(review.fraction, "2/4 Approved");
        assert_eq!(review.percent_approved, 50);

        let tones: Vec<Tone> = review.segments.iter().map(|s| s.tone).collect();
        assert_eq!(tones, vec![Tone::Green, Tone::Green, Tone::Gray, Tone::Gray]);
        assert_eq!(review.approved[0].office_name, "Forest Department");
    }

    #[test]
    fn rejected_department_remarks_are_surfaced() {
        let rows = vec![
            dept(5, "Police", "APPROVED").with_remarks("ok"),
            dept(3, "Forest", "REJECTED").with_remarks("Protected area"),
        ];
        let review = expect_review(present_progress(
            &rows,
            &MasterStatus::Processing,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));

        assert_eq!(review.overall, OverallStatus::Rejected);
        assert_eq!(review.segments[0].tone, Tone::Red);
        assert_eq!(
            review.remarks,
            Some(RemarksAnnotation {
                office_name: "Forest Department".to_string(),
                remarks: "Protected area".to_string(),
            })
        );
    }

    #[test]
    fn most_recent_row_remarks_otherwise() {
        let rows = vec![
            dept(2, "Police", "APPROVED").with_remarks("cleared"),
            dept(9, "Fire", "PENDING"),
        ];
        let review = expect_review(present_progress(
            &rows,
            &MasterStatus::Forwarded,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));
        assert_eq!(review.remarks, None);

        let rows = vec![
            dept(2, "Police", "PENDING"),
            dept(9, "Fire", "APPROVED").with_remarks("  go ahead "),
        ];
        let review = expect_review(present_progress(
            &rows,
            &MasterStatus::Forwarded,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));
        assert_eq!(review.remarks.map(|r| r.remarks), Some("go ahead".to_string()));
    }

    #[test]
    fn master_rejection_without_rejected_row_uses_most_recent_remarks() {
        let rows = vec![
            dept(4, "Police", "APPROVED").with_remarks("cleared"),
            dept(6, "Fire", "PENDING").with_remarks("awaiting site visit"),
        ];
        let review = expect_review(present_progress(
            &rows,
            &MasterStatus::Rejected,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));

        assert_eq!(review.overall, OverallStatus::Rejected);
        assert!(review.rejected.is_empty());
        assert_eq!(
            review.remarks,
            Some(RemarksAnnotation {
                office_name: "Fire Department".to_string(),
                remarks: "awaiting site visit".to_string(),
            })
        );
    }

    #[test]
    fn no_departments_yet_reads_as_submitted() {
        let review = expect_review(present_progress(
            &[],
            &MasterStatus::Submitted,
            &complete(),
            None,
            &PresentationConfig::default(),
        ));
        assert_eq!(review.overall, OverallStatus::Submitted);
        assert_eq!(review.fraction, "0/0 Approved");
        assert!(review.segments.is_empty());
        assert_eq!(review.remarks, None);
    }

    #[test]
    fn display_model_serializes_with_kind_tag() {
        let model = present_progress(
            &[],
            &MasterStatus::Submitted,
            &checklist(&CompletionRecord::default()),
            None,
            &PresentationConfig::default(),
        );
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["kind"], "incomplete");
        assert_eq!(json["items"][0]["name"], "Documents");
    }
}
