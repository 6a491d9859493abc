//! HTTP runbook client.
//!
//! Talks JSON to the runbook service:
//!
//! - `GET {base}/api/v1/steps/{step}/checklist`
//! - `POST {base}/api/v1/steps/{step}/checklist/{id}`

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{ItemStatus, RunbookSynchronizer};
use crate::checklist::{CheckSpec, ChecklistItem};
use crate::config::RunbookSettings;
use crate::error::{PreflightError, Result};

/// A step's checklist as the service returns it.
#[derive(Debug, Deserialize)]
struct StepChecklist {
    #[serde(default)]
    items: Vec<RemoteItem>,
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    id: String,
    title: String,
    #[serde(default)]
    check: Option<CheckSpec>,
}

#[derive(Debug, Serialize)]
struct ItemUpdate<'a> {
    status: ItemStatus,
    note: &'a str,
    reported_at: DateTime<Utc>,
}

/// Blocking HTTP client for the runbook service.
pub struct RunbookClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RunbookClient {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `RunbookConfig` for an unusable base URL or if the HTTP
    /// client can't be built.
    pub fn new(settings: &RunbookSettings) -> Result<Self> {
        let config_error = |message: String| PreflightError::RunbookConfig { message };

        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| config_error(format!("invalid URL '{}': {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(config_error(format!(
                "'{}' cannot be used as a base URL",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("preflighter/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| config_error(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: settings.token.clone(),
        })
    }

    /// Create a client from `PREFLIGHT_RUNBOOK_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&RunbookSettings::from_env()?)
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(["api", "v1", "steps"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn fetch_step(&self, step: &str) -> anyhow::Result<Vec<ChecklistItem>> {
        let url = self.endpoint(&[step, "checklist"])?;
        tracing::debug!("Fetching runbook checklist from {}", url);

        let response = self
            .authorized(self.client.get(url.clone()))
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        let text = response
            .text()
            .with_context(|| format!("could not read response from {}", url))?;
        let body: StepChecklist = serde_json::from_str(&text)
            .with_context(|| format!("unexpected response from {}", url))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| ChecklistItem {
                title: item.title,
                check: item.check,
                runbook_id: Some(item.id),
                runbook_step: Some(step.to_string()),
            })
            .collect())
    }

    fn post_update(
        &self,
        step: &str,
        item_id: &str,
        status: ItemStatus,
        note: &str,
    ) -> anyhow::Result<()> {
        let url = self.endpoint(&[step, "checklist", item_id])?;
        let update = ItemUpdate {
            status,
            note,
            reported_at: Utc::now(),
        };

        let response = self
            .authorized(self.client.post(url.clone()))
            .json(&update)
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} posting to {}", response.status(), url);
        }
        Ok(())
    }
}

impl RunbookSynchronizer for RunbookClient {
    fn checklist_from_runbook(&self, step: &str) -> Result<Vec<ChecklistItem>> {
        self.fetch_step(step)
            .map_err(|e| PreflightError::RunbookFetch {
                step: step.to_string(),
                message: format!("{:#}", e),
            })
    }

    fn checklist_item_update(
        &self,
        step: &str,
        item_id: &str,
        status: ItemStatus,
        note: &str,
    ) -> Result<()> {
        self.post_update(step, item_id, status, note)
            .map_err(|e| PreflightError::RunbookUpdate {
                step: step.to_string(),
                item: item_id.to_string(),
                message: format!("{:#}", e),
            })
    }
}
