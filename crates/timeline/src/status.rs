//! Status vocabularies.
//!
//! The backend sends statuses as free text in any case. They are parsed once
//! into closed enums here; values outside the known set are kept verbatim in
//! an `Unknown` variant and treated as pending wherever a decision is needed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Status carried by a single office's timeline event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Forwarded,
    Accepted,
    Approved,
    Rejected,
    Processing,
    Unknown(String),
}

/// Partition bucket of a review status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    Approved,
    Rejected,
    Pending,
}

impl ReviewStatus {
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "PENDING" => ReviewStatus::Pending,
            "FORWARDED" => ReviewStatus::Forwarded,
            "ACCEPTED" => ReviewStatus::Accepted,
            "APPROVED" => ReviewStatus::Approved,
            "REJECTED" => ReviewStatus::Rejected,
            "PROCESSING" => ReviewStatus::Processing,
            _ => ReviewStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Forwarded => "FORWARDED",
            ReviewStatus::Accepted => "ACCEPTED",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
            ReviewStatus::Processing => "PROCESSING",
            ReviewStatus::Unknown(raw) => raw,
        }
    }

    /// Approved and accepted both count as a positive decision.
    pub fn bucket(&self) -> StatusBucket {
        match self {
            ReviewStatus::Approved | ReviewStatus::Accepted => StatusBucket::Approved,
            ReviewStatus::Rejected => StatusBucket::Rejected,
            _ => StatusBucket::Pending,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ReviewStatus::Rejected)
    }
}

/// Master status stored on the application record itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MasterStatus {
    #[default]
    Submitted,
    Processing,
    Forwarded,
    Approved,
    Rejected,
    FinalApproved,
    Accepted,
    Unknown(String),
}

impl MasterStatus {
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "SUBMITTED" => MasterStatus::Submitted,
            "PROCESSING" => MasterStatus::Processing,
            "FORWARDED" => MasterStatus::Forwarded,
            "APPROVED" => MasterStatus::Approved,
            "REJECTED" => MasterStatus::Rejected,
            "FINAL_APPROVED" | "FINALAPPROVED" => MasterStatus::FinalApproved,
            "ACCEPTED" => MasterStatus::Accepted,
            _ => MasterStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MasterStatus::Submitted => "SUBMITTED",
            MasterStatus::Processing => "PROCESSING",
            MasterStatus::Forwarded => "FORWARDED",
            MasterStatus::Approved => "APPROVED",
            MasterStatus::Rejected => "REJECTED",
            MasterStatus::FinalApproved => "FINAL_APPROVED",
            MasterStatus::Accepted => "ACCEPTED",
            MasterStatus::Unknown(raw) => raw,
        }
    }

    /// Master-level approval that overrides any department state.
    pub fn is_terminal_approval(&self) -> bool {
        matches!(
            self,
            MasterStatus::Approved | MasterStatus::FinalApproved | MasterStatus::Accepted
        )
    }

    /// Whether the master record is authoritative on its own.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal_approval() || matches!(self, MasterStatus::Rejected)
    }
}

impl From<&str> for MasterStatus {
    fn from(value: &str) -> Self {
        MasterStatus::parse(value)
    }
}

impl From<&str> for ReviewStatus {
    fn from(value: &str) -> Self {
        ReviewStatus::parse(value)
    }
}

macro_rules! impl_text_serde {
    ($t:ty) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw.as_deref().map(<$t>::parse).unwrap_or_default())
            }
        }
    };
}

impl_text_serde!(ReviewStatus);
impl_text_serde!(MasterStatus);

/// Derived overall status of an application (computed, never stored).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Submitted,
    Forwarded,
    Approved,
    Rejected,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Submitted => "SUBMITTED",
            OverallStatus::Forwarded => "FORWARDED",
            OverallStatus::Approved => "APPROVED",
            OverallStatus::Rejected => "REJECTED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Submitted => "Submitted",
            OverallStatus::Forwarded => "Forwarded",
            OverallStatus::Approved => "Approved",
            OverallStatus::Rejected => "Rejected",
        }
    }
}

impl core::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
