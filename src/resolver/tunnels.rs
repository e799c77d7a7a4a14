use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tunnel {
    pub name: String,
    pub public_url: String,
}

impl Tunnel {
    /// Host part of the public URL, e.g. `abc.ngrok.io` for `https://abc.ngrok.io`.
    pub fn public_host(&self) -> Result<String> {
        let url = Url::parse(&self.public_url)
            .map_err(|e| Error::parse(format!("Invalid tunnel URL {}: {}", self.public_url, e)))?;

        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::parse(format!("Tunnel URL has no host: {}", self.public_url)))
    }
}

#[derive(Debug, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<Tunnel>,
}

#[async_trait]
pub trait TunnelSource: Send + Sync {
    async fn list_tunnels(&self) -> Result<Vec<Tunnel>>;
}

/// Client for the local ngrok agent API.
pub struct NgrokClient {
    client: reqwest::Client,
    timeout: Duration,
    base_url: String,
}

impl NgrokClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TunnelSource for NgrokClient {
    async fn list_tunnels(&self) -> Result<Vec<Tunnel>> {
        let response = self
            .client
            .get(format!("{}/api/tunnels", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ProviderRejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let list: TunnelList = response
            .json()
            .await
            .map_err(|e| Error::parse(format!("Failed to parse tunnel list: {}", e)))?;
        Ok(list.tunnels)
    }
}
