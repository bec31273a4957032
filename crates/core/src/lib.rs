//! `nocportal-core`: shared building blocks for the film-permit portal.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ApplicationId, EventId, OfficeId};
