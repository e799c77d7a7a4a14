use crate::api::{
    models::{DnsRecord, NewDnsRecord, RecordType, Zone},
    DnsApiClient,
};
use crate::config::Config;
use crate::event_log::EventLog;
use crate::mutator::{Outcome, RecordMutator, UpdateStrategy};
use crate::resolver::{ResolutionTarget, Resolver};
use chrono::Local;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::task::JoinSet;

/// What has to happen to one zone for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The zone neither holds the hostname nor could own it.
    Ignore,
    NoOp {
        record: DnsRecord,
        desired_value: String,
    },
    Create {
        record: NewDnsRecord,
    },
    Update {
        existing: DnsRecord,
        replacement: NewDnsRecord,
    },
}

/// Compares a zone's records against the target.
///
/// Hostnames are compared exactly and the first record in provider order wins.
/// A zone may receive a new record only if its name is a substring of the hostname.
pub fn decide(
    zone: &Zone,
    records: &[DnsRecord],
    target: &ResolutionTarget,
    record_type: &RecordType,
) -> Action {
    let replacement = NewDnsRecord {
        r#type: record_type.clone(),
        hostname: target.hostname.clone(),
        value: target.desired_value.clone(),
    };

    match records.iter().find(|r| r.hostname == target.hostname) {
        Some(record) if record.value == target.desired_value => Action::NoOp {
            record: record.clone(),
            desired_value: target.desired_value.clone(),
        },
        Some(record) => Action::Update {
            existing: record.clone(),
            replacement,
        },
        None if target.hostname.contains(zone.name.as_str()) => Action::Create {
            record: replacement,
        },
        None => Action::Ignore,
    }
}

/// Counts of what a run did, for the final summary and for tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub targets: usize,
    pub zones_scanned: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl RunReport {
    fn absorb(&mut self, outcome: Outcome) {
        self.zones_scanned += 1;
        match outcome {
            Outcome::Ignored => {}
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    fn merge(&mut self, other: Self) {
        self.targets += other.targets;
        self.zones_scanned += other.zones_scanned;
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

pub struct NetlifyDdns {
    config: Config,
    client: Arc<dyn DnsApiClient>,
    resolver: Resolver,
    mutator: Arc<RecordMutator>,
    log: Arc<dyn EventLog>,
}

impl NetlifyDdns {
    pub fn new(
        config: Config,
        client: Arc<dyn DnsApiClient>,
        resolver: Resolver,
        log: Arc<dyn EventLog>,
    ) -> Self {
        let mutator = Arc::new(RecordMutator::new(client.clone(), log.clone()));
        Self {
            config,
            client,
            resolver,
            mutator,
            log,
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn UpdateStrategy>) -> Self {
        let mutator = RecordMutator::new(self.client.clone(), self.log.clone())
            .with_strategy(strategy);
        self.mutator = Arc::new(mutator);
        self
    }

    /// One full pass: resolve targets, then reconcile every one of them.
    ///
    /// Returns only after every spawned zone task has settled.
    pub async fn run(&self) -> RunReport {
        self.log.record(
            true,
            &format!(
                "[{}] Started update process. Hostname (to update): {} Type: {} Token: {}...",
                Local::now().to_rfc2822(),
                self.config.hostname,
                self.config.mode.record_type(),
                self.config.token_preview()
            ),
        );

        let targets = self
            .resolver
            .resolve(self.config.mode, &self.config.hostname)
            .await;
        info!("Resolved {} target(s)", targets.len());

        let report = self.reconcile(targets).await;
        info!(
            "Run finished: {} target(s), {} zone(s) scanned, {} created, {} updated, {} unchanged, {} failed",
            report.targets,
            report.zones_scanned,
            report.created,
            report.updated,
            report.unchanged,
            report.failed
        );
        report
    }

    pub async fn reconcile(&self, targets: Vec<ResolutionTarget>) -> RunReport {
        let record_type = self.config.mode.record_type();
        let mut tasks = JoinSet::new();

        for target in targets {
            tasks.spawn(reconcile_target(
                self.client.clone(),
                self.mutator.clone(),
                self.log.clone(),
                target,
                record_type.clone(),
            ));
        }

        let mut report = RunReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(target_report) => report.merge(target_report),
                Err(e) => error!("Target task failed: {}", e),
            }
        }
        report
    }
}

async fn reconcile_target(
    client: Arc<dyn DnsApiClient>,
    mutator: Arc<RecordMutator>,
    log: Arc<dyn EventLog>,
    target: ResolutionTarget,
    record_type: RecordType,
) -> RunReport {
    let mut report = RunReport {
        targets: 1,
        ..RunReport::default()
    };

    let zones = match client.list_zones().await {
        Ok(zones) => zones,
        Err(e) => {
            log.record(false, &format!("Failed to fetch zones\n{}", e));
            report.failed += 1;
            return report;
        }
    };
    log.record(true, &format!("{} zones fetched !", zones.len()));

    let target = Arc::new(target);
    let mut tasks = JoinSet::new();
    for zone in zones {
        tasks.spawn(reconcile_zone(
            client.clone(),
            mutator.clone(),
            log.clone(),
            zone,
            target.clone(),
            record_type.clone(),
        ));
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => report.absorb(outcome),
            Err(e) => {
                error!("Zone task failed: {}", e);
                report.failed += 1;
            }
        }
    }
    report
}

async fn reconcile_zone(
    client: Arc<dyn DnsApiClient>,
    mutator: Arc<RecordMutator>,
    log: Arc<dyn EventLog>,
    zone: Zone,
    target: Arc<ResolutionTarget>,
    record_type: RecordType,
) -> Outcome {
    let records = match client.list_records(&zone.id).await {
        Ok(records) => records,
        Err(e) => {
            log.record(
                false,
                &format!("Failed to fetch records from zone {}\n{}", zone.id, e),
            );
            return Outcome::Failed;
        }
    };
    log.record(true, &format!("Records (from zone {}) fetched !", zone.id));

    let action = decide(&zone, &records, &target, &record_type);
    debug!("Zone {} / {}: {:?}", zone.name, target.hostname, action);

    mutator.reconcile_record(&zone.id, action).await
}
