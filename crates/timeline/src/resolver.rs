//! Overall status resolution.

use crate::event::TimelineEvent;
use crate::status::{MasterStatus, OverallStatus};

/// Combine the application's master status with its latest department rows.
///
/// Rules, first match wins:
/// 1. master approved / final-approved / accepted => `Approved`
/// 2. master rejected => `Rejected`
/// 3. no department rows => `Submitted`
/// 4. any department row rejected => `Rejected`
/// 5. otherwise => `Forwarded`
///
/// A single department rejection fails the application before the master
/// record catches up. There is no path back from rule 4 other than a newer
/// event for that office replacing the rejection in `department_rows`.
pub fn overall_status(department_rows: &[TimelineEvent], master: &MasterStatus) -> OverallStatus {
    if master.is_terminal_approval() {
        return OverallStatus::Approved;
    }
    if *master == MasterStatus::Rejected {
        return OverallStatus::Rejected;
    }
    if department_rows.is_empty() {
        return OverallStatus::Submitted;
    }
    if department_rows.iter().any(|row| row.status.is_rejected()) {
        return OverallStatus::Rejected;
    }
    OverallStatus::Forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::OfficeType;
    use crate::reducer::latest_departments;
    use crate::status::ReviewStatus;
    use nocportal_core::{EventId, OfficeId};
    use proptest::prelude::*;

    fn dept(id: u64, office: &str, status: &str) -> TimelineEvent {
        TimelineEvent::new(
            EventId::new(id),
            OfficeId::new(office).unwrap(),
            OfficeType::Department,
            ReviewStatus::parse(status),
        )
    }

    #[test]
    fn master_approval_wins_over_rejected_departments() {
        let rows = vec![dept(1, "A", "REJECTED")];
        for raw in ["approved", "APPROVED", "Final_Approved", "accepted"] {
            let master = MasterStatus::parse(raw);
            assert_eq!(overall_status(&rows, &master), OverallStatus::Approved);
            assert_eq!(overall_status(&[], &master), OverallStatus::Approved);
        }
    }

    #[test]
    fn master_rejection_is_final() {
        let rows = vec![dept(1, "A", "APPROVED")];
        assert_eq!(
            overall_status(&rows, &MasterStatus::parse("rejected")),
            OverallStatus::Rejected
        );
    }

    #[test]
    fn no_department_rows_means_submitted() {
        for raw in ["SUBMITTED", "processing", "forwarded", "", "something-else"] {
            assert_eq!(
                overall_status(&[], &MasterStatus::parse(raw)),
                OverallStatus::Submitted
            );
        }
    }

    #[test]
    fn single_department_rejection_rejects_application() {
        let rows = vec![dept(1, "A", "APPROVED"), dept(2, "B", "REJECTED")];
        assert_eq!(
            overall_status(&rows, &MasterStatus::Processing),
            OverallStatus::Rejected
        );
    }

    #[test]
    fn approved_departments_without_master_approval_stay_forwarded() {
        let events = vec![dept(1, "A", "FORWARDED"), dept(2, "A", "APPROVED")];
        let rows = latest_departments(&events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, EventId::new(2));
        assert_eq!(
            overall_status(&rows, &MasterStatus::parse("PROCESSING")),
            OverallStatus::Forwarded
        );
    }

    #[test]
    fn latest_rejection_rejects_application() {
        let events = vec![dept(1, "A", "FORWARDED"), dept(2, "A", "REJECTED")];
        let rows = latest_departments(&events);
        assert_eq!(
            overall_status(&rows, &MasterStatus::parse("PROCESSING")),
            OverallStatus::Rejected
        );
    }

    proptest! {
        /// Property: resolution is a pure function of its inputs, and master
        /// approval always wins.
        #[test]
        fn resolution_is_deterministic(
            statuses in prop::collection::vec(
                prop::sample::select(vec!["PENDING", "APPROVED", "REJECTED", "FORWARDED", "odd"]),
                0..12
            ),
            master in prop::sample::select(vec!["submitted", "processing", "approved", "rejected", "weird"])
        ) {
            let rows: Vec<TimelineEvent> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| dept(i as u64, &format!("office-{i}"), s))
                .collect();
            let master = MasterStatus::parse(master);

            let first = overall_status(&rows, &master);
            prop_assert_eq!(first, overall_status(&rows, &master));

            if master.is_terminal_approval() {
                prop_assert_eq!(first, OverallStatus::Approved);
            }
        }
    }
}
