use async_trait::async_trait;
use serde_json::json;

use super::ApplyOperation;
use crate::error::ApplyError;

/// Replays actions by POSTing them as JSON to a sync endpoint.
pub struct HttpApply {
    client: reqwest::Client,
    url: String,
    headers: Vec<(String, String)>,
}

impl HttpApply {
    pub fn new(url: impl Into<String>) -> Result<Self, ApplyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ApplyError::from(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            headers: Vec::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ApplyOperation for HttpApply {
    async fn apply(&self, kind: &str, payload: &serde_json::Value) -> Result<(), ApplyError> {
        let body = json!({
            "type": kind,
            "payload": payload,
        });

        let mut req = self.client.post(&self.url);
        for (name, value) in &self.headers {
            req = req.header(name, value);
        }

        let resp = req
            .json(&body)
            .send()
            .await
            .map_err(|e| ApplyError::from(format!("Sync request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let resp_body = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(1024)
            .collect::<String>();
        Err(ApplyError::from(format!("HTTP {}: {resp_body}", status.as_u16())))
    }
}
