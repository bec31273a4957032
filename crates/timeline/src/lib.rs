//! Application status aggregation for NOC (film permit) applications.
//!
//! This crate turns a backend snapshot of one application and its approval
//! timeline into a display-ready summary. It is implemented purely as
//! deterministic logic (no IO, no HTTP, no storage); fetching the snapshot is
//! the client crate's job.

pub mod application;
pub mod checklist;
pub mod event;
pub mod presentation;
pub mod reducer;
pub mod resolver;
pub mod status;
pub mod summary;

pub use application::{Application, ApplicationSnapshot, FinalApproval, Forms, Progress};
pub use checklist::{Checklist, ChecklistItem, CompletionRecord, FormKind, checklist};
pub use event::{OfficeType, RawTimelineEvent, TimelineEvent, by_recency, parse_events};
pub use presentation::{
    Badge, DepartmentBadge, DisplayModel, PresentationConfig, ProgressSegment, RemarksAnnotation,
    ReviewBreakdown, Tone, present_progress,
};
pub use reducer::{chronological, latest_departments, latest_per_office};
pub use resolver::overall_status;
pub use status::{MasterStatus, OverallStatus, ReviewStatus, StatusBucket};
pub use summary::{DashboardTally, StatusSummary};
