pub mod api;
pub mod config;
pub mod ddns;
pub mod error;
pub mod event_log;
pub mod mutator;
pub mod resolver;

#[cfg(test)]
mod tests;

use api::NetlifyClient;
use config::{Args, Config};
use ddns::{NetlifyDdns, RunReport};
use event_log::EventLog;
use resolver::{HttpIpSource, NgrokClient, Resolver};
use std::sync::Arc;

/// Validates the arguments and runs one update pass against the real services.
///
/// Invalid arguments produce a single failure line and no network traffic.
pub async fn execute(args: Args, log: Arc<dyn EventLog>) -> Option<RunReport> {
    let config = match Config::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            log.record(false, &e.to_string());
            return None;
        }
    };

    let client = Arc::new(NetlifyClient::new(
        config.token.clone(),
        config.api_url.clone(),
    ));
    let resolver = Resolver::new(
        Arc::new(HttpIpSource::new(
            config.ipv4_url.clone(),
            config.ipv6_url.clone(),
        )),
        Arc::new(NgrokClient::new(config.ngrok_url.clone())),
        log.clone(),
    );

    let ddns = NetlifyDdns::new(config, client, resolver, log);
    Some(ddns.run().await)
}
