//! REST client for the portal backend.
//!
//! Only reads are performed: the application list and per-application
//! timelines. Timelines for a dashboard are fetched concurrently and joined
//! before anything is summarized.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use reqwest::Url;
use tokio::task::JoinSet;

use nocportal_core::ApplicationId;
use nocportal_timeline::{
    Application, ApplicationSnapshot, DashboardTally, PresentationConfig, StatusSummary,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Response bodies come either bare or wrapped in `{ "data": ... }`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Data { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Data { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ApplicationList {
    Named { applications: Vec<Application> },
    Data { data: Vec<Application> },
    Bare(Vec<Application>),
}

impl ApplicationList {
    fn into_vec(self) -> Vec<Application> {
        match self {
            ApplicationList::Named { applications } => applications,
            ApplicationList::Data { data } => data,
            ApplicationList::Bare(list) => list,
        }
    }
}

/// Summaries for every application visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summaries: Vec<StatusSummary>,
    pub tally: DashboardTally,
    /// Applications whose timeline could not be fetched.
    pub failed: Vec<ApplicationId>,
}

#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
    config: Arc<ClientConfig>,
}

impl PortalClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ClientError::Config(format!("{}: {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "{} cannot be used as a base URL",
                config.api_url
            )));
        }
        Ok(Self {
            http,
            base_url,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        let mut req = self.http.get(url.clone());
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(format!("{url}: {e}")))
    }

    /// `GET /applications/{id}/timeline`.
    pub async fn timeline(&self, id: &ApplicationId) -> Result<ApplicationSnapshot, ClientError> {
        let envelope: Envelope<ApplicationSnapshot> =
            self.get_json(&["applications", id.as_str(), "timeline"]).await?;
        let snapshot = envelope.into_inner();
        tracing::debug!(application_id = %id, events = snapshot.timeline.len(), "fetched timeline");
        Ok(snapshot)
    }

    /// `GET /applications/my`.
    pub async fn my_applications(&self) -> Result<Vec<Application>, ClientError> {
        let list: ApplicationList = self.get_json(&["applications", "my"]).await?;
        Ok(list.into_vec())
    }

    /// Fetch the caller's applications, then summarize all of them.
    pub async fn dashboard(&self, presentation: &PresentationConfig) -> Result<Dashboard, ClientError> {
        let applications = self.my_applications().await?;
        Ok(self.summarize_all(applications, presentation).await)
    }

    /// Fetch every application's timeline concurrently and summarize once
    /// all fetches have finished.
    ///
    /// A failed fetch is logged and reported in [`Dashboard::failed`]; it
    /// never aborts the others.
    pub async fn summarize_all(
        &self,
        applications: Vec<Application>,
        presentation: &PresentationConfig,
    ) -> Dashboard {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut outstanding: BTreeSet<ApplicationId> = BTreeSet::new();
        let mut tasks = JoinSet::new();

        for listed in applications {
            outstanding.insert(listed.application_id.clone());
            let client = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = client.timeline(&listed.application_id).await;
                (listed, result)
            });
        }

        let mut summaries = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((listed, Ok(mut snapshot))) => {
                    snapshot.application.fill_missing_from(&listed);
                    outstanding.remove(&listed.application_id);
                    summaries.push(snapshot.summarize(presentation));
                }
                Ok((listed, Err(err))) => {
                    tracing::warn!(
                        application_id = %listed.application_id,
                        error = %err,
                        "failed to fetch timeline"
                    );
                }
                Err(err) => {
                    tracing::warn!(error = %err, "timeline fetch task failed");
                }
            }
        }

        summaries.sort_by(|a, b| a.application_id.cmp(&b.application_id));
        let tally = summaries.iter().collect();

        Dashboard {
            summaries,
            tally,
            failed: outstanding.into_iter().collect(),
        }
    }
}
