//! Per-application summaries and dashboard tallies.

use serde::Serialize;

use nocportal_core::ApplicationId;

use crate::application::ApplicationSnapshot;
use crate::checklist::Checklist;
use crate::presentation::{DisplayModel, PresentationConfig, present_progress};
use crate::reducer::latest_departments;
use crate::resolver::overall_status;
use crate::status::OverallStatus;

/// Display-ready status of one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub application_id: ApplicationId,
    pub reference: String,
    pub overall: OverallStatus,
    /// Departments whose latest event is not yet a decision.
    pub awaiting_departments: usize,
    pub checklist: Checklist,
    pub display: DisplayModel,
}

impl ApplicationSnapshot {
    /// Reduce the snapshot to a display-ready summary.
    pub fn summarize(&self, config: &PresentationConfig) -> StatusSummary {
        let app = &self.application;
        let rows = latest_departments(&self.timeline);
        let overall = match app.granted_final_approval() {
            Some(_) => OverallStatus::Approved,
            None => overall_status(&rows, &app.status),
        };
        let checklist = app.checklist();
        let display = present_progress(
            &rows,
            &app.status,
            &checklist,
            app.final_approval.as_ref(),
            config,
        );

        tracing::debug!(
            application_id = %app.application_id,
            overall = %overall,
            departments = rows.len(),
            "summarized application"
        );

        StatusSummary {
            application_id: app.application_id.clone(),
            reference: app.reference().to_string(),
            overall,
            awaiting_departments: rows
                .iter()
                .filter(|r| r.status.bucket() == crate::status::StatusBucket::Pending)
                .count(),
            checklist,
            display,
        }
    }
}

/// Counts of applications per derived status, as shown on admin dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTally {
    pub total: usize,
    pub submitted: usize,
    pub forwarded: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Applications with at least one department still to decide.
    pub awaiting_decision: usize,
}

impl DashboardTally {
    pub fn record(&mut self, summary: &StatusSummary) {
        self.total += 1;
        match summary.overall {
            OverallStatus::Submitted => self.submitted += 1,
            OverallStatus::Forwarded => self.forwarded += 1,
            OverallStatus::Approved => self.approved += 1,
            OverallStatus::Rejected => self.rejected += 1,
        }
        if summary.awaiting_departments > 0 {
            self.awaiting_decision += 1;
        }
    }
}

impl<'a> FromIterator<&'a StatusSummary> for DashboardTally {
    fn from_iter<I: IntoIterator<Item = &'a StatusSummary>>(iter: I) -> Self {
        let mut tally = DashboardTally::default();
        for summary in iter {
            tally.record(summary);
        }
        tally
    }
}
