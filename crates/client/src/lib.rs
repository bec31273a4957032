//! `nocportal-client`: fetches application snapshots from the portal
//! backend and hands them to `nocportal-timeline` for summarizing.

pub mod client;
pub mod config;
pub mod error;

pub use client::{Dashboard, PortalClient};
pub use config::ClientConfig;
pub use error::ClientError;
