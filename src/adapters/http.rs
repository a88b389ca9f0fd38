use crate::domain::model::Lead;
use crate::domain::ports::LeadStore;
use crate::utils::error::{ResolverError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Lead store behind an HTTP endpoint: `GET {endpoint}?tracking=<code>`.
///
/// `404` means no lead; any other non-success status is an error.
#[derive(Debug, Clone)]
pub struct HttpLeadStore {
    endpoint: String,
    client: Client,
}

impl HttpLeadStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadStore for HttpLeadStore {
    async fn find_by_tracking(&self, tracking: &str) -> Result<Option<Lead>> {
        tracing::debug!("Making lead request to: {} (tracking={})", self.endpoint, tracking);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("tracking", tracking)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Lead store response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ResolverError::LeadStoreStatus {
                status: status.as_u16(),
                tracking: tracking.to_string(),
            });
        }

        // 空陣列或 null 代表查無資料
        let body: serde_json::Value = response.json().await?;
        let lead = match body {
            serde_json::Value::Null => None,
            serde_json::Value::Array(items) => match items.into_iter().next() {
                Some(item) => Some(serde_json::from_value(item)?),
                None => None,
            },
            other => Some(serde_json::from_value(other)?),
        };
        Ok(lead)
    }
}
