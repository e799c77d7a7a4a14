use super::{client::DnsApiClient, models::*};
use crate::error::{Error, Result};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const API_BASE_URL: &str = "https://api.netlify.com/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NetlifyClient {
    client: reqwest::Client,
    timeout: Duration,
    base_url: String,
    api_token: String,
}

#[async_trait]
impl DnsApiClient for NetlifyClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let response = self
            .client
            .get(format!("{}/dns_zones", self.base_url))
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .send()
            .await?;

        Self::parse_json(response).await
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let response = self
            .client
            .get(format!("{}/dns_zones/{}/dns_records", self.base_url, zone_id))
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .send()
            .await?;

        Self::parse_json(response).await
    }

    async fn create_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord> {
        let response = self
            .client
            .post(format!("{}/dns_zones/{}/dns_records", self.base_url, zone_id))
            .bearer_auth(&self.api_token)
            .json(record)
            .timeout(self.timeout)
            .send()
            .await?;

        Self::parse_json(response).await
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}/dns_zones/{}/dns_records/{}",
                self.base_url, zone_id, record_id
            ))
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}

impl NetlifyClient {
    pub fn new(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<Response reading failed>".to_string());
        Err(Error::ProviderRejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        debug!("Netlify response: {}", text);

        serde_json::from_str(&text)
            .map_err(|e| Error::parse(format!("{}. Response: {}", e, text)))
    }
}
