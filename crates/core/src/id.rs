//! Strongly-typed identifiers used across the domain.
//!
//! The backend is inconsistent about identifier encoding: the same field may
//! arrive as a JSON number in one payload and as a string in another. Textual
//! identifiers therefore accept both and normalize to a trimmed string.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Identifier of a permit application (stable for the application lifetime).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

/// Identifier of a reviewing office (department or district).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OfficeId(String);

/// Identifier of a timeline event.
///
/// Assigned by the backend in creation order, so a higher id is a more recent
/// event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for EventId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("EventId: {e}")))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextualId {
    Text(String),
    Number(i64),
}

macro_rules! impl_text_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier, rejecting blank values.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<&serde_json::Value> for $t {
            type Error = DomainError;

            fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
                match value {
                    serde_json::Value::String(s) => Self::new(s.as_str()),
                    serde_json::Value::Number(n) => Self::new(n.to_string()),
                    other => Err(DomainError::invalid_id(format!(
                        "{}: unexpected value {other}",
                        $name
                    ))),
                }
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = match TextualId::deserialize(deserializer)? {
                    TextualId::Text(s) => s,
                    TextualId::Number(n) => n.to_string(),
                };
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_text_newtype!(ApplicationId, "ApplicationId");
impl_text_newtype!(OfficeId, "OfficeId");
