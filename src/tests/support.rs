use crate::api::{
    models::{DnsRecord, NewDnsRecord, Zone},
    DnsApiClient,
};
use crate::error::{Error, Result};
use crate::event_log::{format_line, EventLog};
use crate::resolver::{PublicIpSource, Tunnel, TunnelSource};
use async_trait::async_trait;
use mockall::mock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Keeps every line in memory instead of writing a file.
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with("[ERROR]"))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl EventLog for MemoryLog {
    fn record(&self, success: bool, message: &str) {
        self.lines.lock().unwrap().push(format_line(success, message));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListZones,
    ListRecords(String),
    Create(String, NewDnsRecord),
    Delete(String, String),
}

fn rejected() -> Error {
    Error::ProviderRejected {
        status: 500,
        body: "boom".to_string(),
    }
}

/// In-memory provider that applies creates and deletes to its own state.
#[derive(Default)]
pub struct FakeClient {
    zones: Vec<Zone>,
    records: Mutex<HashMap<String, Vec<DnsRecord>>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    fail_zones: bool,
    fail_records: HashSet<String>,
    fail_delete: bool,
    fail_create: bool,
}

impl FakeClient {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self {
            zones,
            next_id: AtomicUsize::new(100),
            ..Self::default()
        }
    }

    pub fn with_records(self, zone_id: &str, records: Vec<DnsRecord>) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(zone_id.to_string(), records);
        self
    }

    pub fn failing_zones(mut self) -> Self {
        self.fail_zones = true;
        self
    }

    pub fn failing_records(mut self, zone_id: &str) -> Self {
        self.fail_records.insert(zone_id.to_string());
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Create(..) | Call::Delete(..)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DnsApiClient for FakeClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.calls.lock().unwrap().push(Call::ListZones);
        if self.fail_zones {
            return Err(rejected());
        }
        Ok(self.zones.clone())
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::ListRecords(zone_id.to_string()));
        if self.fail_records.contains(zone_id) {
            return Err(rejected());
        }
        Ok(self.records(zone_id))
    }

    async fn create_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(zone_id.to_string(), record.clone()));
        if self.fail_create {
            return Err(rejected());
        }

        let created = DnsRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            hostname: record.hostname.clone(),
            r#type: record.r#type.clone(),
            value: record.value.clone(),
        };
        self.records
            .lock()
            .unwrap()
            .entry(zone_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete(zone_id.to_string(), record_id.to_string()));
        if self.fail_delete {
            return Err(rejected());
        }

        if let Some(records) = self.records.lock().unwrap().get_mut(zone_id) {
            records.retain(|r| r.id != record_id);
        }
        Ok(())
    }
}

mock! {
    pub IpSource {}

    #[async_trait]
    impl PublicIpSource for IpSource {
        async fn get_v4(&self) -> Result<String>;
        async fn get_v6(&self) -> Result<String>;
    }
}

mock! {
    pub Tunnels {}

    #[async_trait]
    impl TunnelSource for Tunnels {
        async fn list_tunnels(&self) -> Result<Vec<Tunnel>>;
    }
}

/// IP source answering with the given addresses; `None` makes that family fail.
pub fn ip_source(v4: Option<&str>, v6: Option<&str>) -> MockIpSource {
    let v4 = v4.map(str::to_string);
    let v6 = v6.map(str::to_string);

    let mut source = MockIpSource::new();
    source
        .expect_get_v4()
        .returning(move || v4.clone().ok_or_else(|| Error::parse("no IPv4")));
    source
        .expect_get_v6()
        .returning(move || v6.clone().ok_or_else(|| Error::parse("no IPv6")));
    source
}

/// Tunnel source listing the given tunnels; `None` makes discovery fail.
pub fn tunnel_source(tunnels: Option<Vec<Tunnel>>) -> MockTunnels {
    let mut source = MockTunnels::new();
    source
        .expect_list_tunnels()
        .returning(move || tunnels.clone().ok_or_else(rejected));
    source
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn a_record(id: &str, hostname: &str, value: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        hostname: hostname.to_string(),
        r#type: crate::api::models::RecordType::A,
        value: value.to_string(),
    }
}
