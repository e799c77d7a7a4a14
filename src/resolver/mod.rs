pub mod ip;
pub mod tunnels;

pub use ip::{HttpIpSource, PublicIpSource};
pub use tunnels::{NgrokClient, Tunnel, TunnelSource};

use crate::config::Mode;
use crate::event_log::EventLog;
use log::debug;
use std::sync::Arc;

/// A hostname and the value its record should hold after this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTarget {
    pub hostname: String,
    pub desired_value: String,
}

/// Turns the configured mode into the list of targets to reconcile.
pub struct Resolver {
    ip_source: Arc<dyn PublicIpSource>,
    tunnel_source: Arc<dyn TunnelSource>,
    log: Arc<dyn EventLog>,
}

impl Resolver {
    pub fn new(
        ip_source: Arc<dyn PublicIpSource>,
        tunnel_source: Arc<dyn TunnelSource>,
        log: Arc<dyn EventLog>,
    ) -> Self {
        Self {
            ip_source,
            tunnel_source,
            log,
        }
    }

    /// Never fails: discovery errors are logged and yield no targets.
    pub async fn resolve(&self, mode: Mode, hostname: &str) -> Vec<ResolutionTarget> {
        match mode {
            Mode::A => self.single(self.ip_source.get_v4().await, hostname),
            Mode::Aaaa => self.single(self.ip_source.get_v6().await, hostname),
            Mode::Cname => self.from_tunnels(hostname).await,
        }
    }

    fn single(
        &self,
        ip: crate::error::Result<String>,
        hostname: &str,
    ) -> Vec<ResolutionTarget> {
        match ip {
            Ok(ip) => {
                debug!("Current IP: {}", ip);
                vec![ResolutionTarget {
                    hostname: hostname.to_string(),
                    desired_value: ip,
                }]
            }
            Err(e) => {
                self.log
                    .record(false, &format!("Failed to get public IP\n{}", e));
                Vec::new()
            }
        }
    }

    async fn from_tunnels(&self, hostname: &str) -> Vec<ResolutionTarget> {
        let tunnels = match self.tunnel_source.list_tunnels().await {
            Ok(tunnels) => tunnels,
            Err(e) => {
                self.log
                    .record(false, &format!("Failed to fetch ngrok tunnels\n{}", e));
                return Vec::new();
            }
        };

        tunnels
            .into_iter()
            .filter_map(|tunnel| match tunnel.public_host() {
                Ok(host) => Some(ResolutionTarget {
                    hostname: format!("{}.{}", tunnel.name, hostname),
                    desired_value: host,
                }),
                Err(e) => {
                    self.log.record(false, &e.to_string());
                    None
                }
            })
            .collect()
    }
}
