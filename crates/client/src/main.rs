//! `nocportal-status`: print display-ready application status as JSON.
//!
//! With an application id argument, prints that application's summary.
//! Without one, prints the dashboard for every application visible to the
//! configured token.

use anyhow::Context;

use nocportal_client::{ClientConfig, PortalClient};
use nocportal_core::ApplicationId;
use nocportal_timeline::PresentationConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nocportal_observability::init();

    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "using portal backend");
    let client = PortalClient::new(config)?;
    let presentation = PresentationConfig::default();

    let output = match std::env::args().nth(1) {
        Some(raw) => {
            let id: ApplicationId = raw.parse().context("invalid application id")?;
            let snapshot = client
                .timeline(&id)
                .await
                .with_context(|| format!("fetching timeline for {id}"))?;
            serde_json::to_string_pretty(&snapshot.summarize(&presentation))?
        }
        None => {
            let dashboard = client
                .dashboard(&presentation)
                .await
                .context("building dashboard")?;
            if !dashboard.failed.is_empty() {
                tracing::warn!(failed = dashboard.failed.len(), "some timelines were not fetched");
            }
            serde_json::to_string_pretty(&dashboard)?
        }
    };

    println!("{output}");
    Ok(())
}
