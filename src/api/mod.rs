pub mod client;
pub mod models;
pub mod netlify;

pub use client::DnsApiClient;
pub use netlify::NetlifyClient;
