use crate::error::{Error, Result};
use async_trait::async_trait;
use std::{net::IpAddr, time::Duration};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait PublicIpSource: Send + Sync {
    async fn get_v4(&self) -> Result<String>;
    async fn get_v6(&self) -> Result<String>;
}

/// Plain-text "what is my IP" services such as ipify.
pub struct HttpIpSource {
    client: reqwest::Client,
    timeout: Duration,
    v4_url: String,
    v6_url: String,
}

impl HttpIpSource {
    pub fn new(v4_url: impl Into<String>, v6_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
            v4_url: v4_url.into(),
            v6_url: v6_url.into(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_ip(&self, url: &str) -> Result<IpAddr> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::ProviderRejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        let text = text.trim();

        text.parse()
            .map_err(|_| Error::parse(format!("Invalid IP address: {}", text)))
    }
}

#[async_trait]
impl PublicIpSource for HttpIpSource {
    async fn get_v4(&self) -> Result<String> {
        match self.fetch_ip(&self.v4_url).await? {
            IpAddr::V4(ip) => Ok(ip.to_string()),
            other => Err(Error::parse(format!("Expected IPv4, got: {}", other))),
        }
    }

    async fn get_v6(&self) -> Result<String> {
        match self.fetch_ip(&self.v6_url).await? {
            IpAddr::V6(ip) => Ok(ip.to_string()),
            other => Err(Error::parse(format!("Expected IPv6, got: {}", other))),
        }
    }
}
