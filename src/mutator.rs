use crate::api::{
    models::{DnsRecord, NewDnsRecord},
    DnsApiClient,
};
use crate::ddns::Action;
use crate::event_log::EventLog;
use async_trait::async_trait;
use std::sync::Arc;

/// What a single reconciliation ended up doing to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Unchanged,
    Created,
    Updated,
    Failed,
}

/// How an existing record is replaced with a new value.
///
/// Netlify has no update call, so every strategy is built from delete and create.
#[async_trait]
pub trait UpdateStrategy: Send + Sync {
    async fn replace(
        &self,
        client: &dyn DnsApiClient,
        log: &dyn EventLog,
        zone_id: &str,
        record_id: &str,
        replacement: &NewDnsRecord,
    ) -> bool;
}

/// Delete the old record, then create the new one if the delete went through.
///
/// No retry and no rollback: a failed create leaves the hostname without a record.
pub struct DeleteThenCreate;

#[async_trait]
impl UpdateStrategy for DeleteThenCreate {
    async fn replace(
        &self,
        client: &dyn DnsApiClient,
        log: &dyn EventLog,
        zone_id: &str,
        record_id: &str,
        replacement: &NewDnsRecord,
    ) -> bool {
        if let Err(e) = client.delete_record(zone_id, record_id).await {
            log.record(false, &format!("Failed to delete current record\n{}", e));
            return false;
        }
        log.record(
            true,
            "Current record successfully deleted ! Creating a new record...",
        );

        match client.create_record(zone_id, replacement).await {
            Ok(_) => {
                log.record(
                    true,
                    &format!(
                        "{} updated successfully to {} !",
                        replacement.hostname, replacement.value
                    ),
                );
                true
            }
            Err(e) => {
                log.record(false, &format!("Failed to create new record\n{}", e));
                false
            }
        }
    }
}

pub struct RecordMutator {
    client: Arc<dyn DnsApiClient>,
    log: Arc<dyn EventLog>,
    strategy: Arc<dyn UpdateStrategy>,
}

impl RecordMutator {
    pub fn new(client: Arc<dyn DnsApiClient>, log: Arc<dyn EventLog>) -> Self {
        Self {
            client,
            log,
            strategy: Arc::new(DeleteThenCreate),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn UpdateStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub async fn create(&self, zone_id: &str, record: &NewDnsRecord) -> bool {
        match self.client.create_record(zone_id, record).await {
            Ok(created) => {
                self.log.record(
                    true,
                    &format!(
                        "Created {} record {} -> {} in zone {} !",
                        created.r#type, created.hostname, created.value, zone_id
                    ),
                );
                true
            }
            Err(e) => {
                self.log.record(
                    false,
                    &format!("Failed to create record {}\n{}", record.hostname, e),
                );
                false
            }
        }
    }

    pub async fn update(
        &self,
        zone_id: &str,
        existing: &DnsRecord,
        replacement: &NewDnsRecord,
    ) -> bool {
        self.log
            .record(true, "Found a matching record ! Updating it...");
        self.strategy
            .replace(
                self.client.as_ref(),
                self.log.as_ref(),
                zone_id,
                &existing.id,
                replacement,
            )
            .await
    }

    /// Applies a reconciliation decision to one zone.
    pub async fn reconcile_record(&self, zone_id: &str, action: Action) -> Outcome {
        match action {
            Action::Ignore => Outcome::Ignored,
            Action::NoOp {
                record,
                desired_value,
            } => {
                self.log.record(
                    true,
                    &format!(
                        "Same value for {} ([Record] {} - [Current] {}) ! Nothing to do.",
                        record.hostname, record.value, desired_value
                    ),
                );
                Outcome::Unchanged
            }
            Action::Create { record } => {
                if self.create(zone_id, &record).await {
                    Outcome::Created
                } else {
                    Outcome::Failed
                }
            }
            Action::Update {
                existing,
                replacement,
            } => {
                if self.update(zone_id, &existing, &replacement).await {
                    Outcome::Updated
                } else {
                    Outcome::Failed
                }
            }
        }
    }
}
