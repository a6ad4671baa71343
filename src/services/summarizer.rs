use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::errors::AppError;

/// Client for the AI endpoint that condenses technician notes and the
/// inspection checklist into a short report.
#[derive(Clone)]
pub struct SummarizerService {
    client: Client,
    endpoint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub technician_notes: String,
    pub inspection_checklist: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

impl SummarizerService {
    pub fn new(endpoint: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, AppError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("SUMMARIZER_URL is not set".to_string()))?;

        let response = self.client.post(endpoint).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error reading response body".to_string());
            log::error!("Summarizer error: {} - {}", status, error_text);
            return Err(AppError::Upstream(format!(
                "Summarizer failed with status {}",
                status
            )));
        }

        let result = response.json::<SummarizeResponse>().await?;
        Ok(result)
    }
}
