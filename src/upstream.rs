use reqwest::StatusCode;
use serde_json::Value;

use crate::record::Record;

pub const DEFAULT_UPSTREAM_URL: &str = "https://raw.githubusercontent.com/aacierto/archive_of_constraint_JSON/main/archive_of_constraint_June_2025.json";

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to fetch the archive: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Failed to parse the archive: {0}")]
    Parse(#[source] reqwest::Error),
}

/// Fetches the archive file and projects it into [`Record`]s.
///
/// Holds no data between calls: every [`UpstreamClient::fetch_all`] goes to the network.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    url: String,
    http_client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(url: String, http_client: reqwest::Client) -> Self {
        Self { url, http_client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[tracing::instrument(skip_all, fields(url = %self.url))]
    pub async fn fetch_all(&self) -> Result<Vec<Record>, UpstreamError> {
        let result = self.obtain_raw().await;

        match result {
            Ok(raw) => {
                let records: Vec<Record> = raw.iter().map(Record::project).collect();
                tracing::debug!(count = records.len(), "Fetched records");

                Ok(records)
            }
            Err(err) => {
                tracing::error!(%err, "Error fetching data");

                Err(err)
            }
        }
    }

    async fn obtain_raw(&self) -> Result<Vec<Value>, UpstreamError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(UpstreamError::Fetch)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(UpstreamError::Parse)
    }
}
