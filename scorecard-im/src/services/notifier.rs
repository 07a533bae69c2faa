//! Notification fan-out
//!
//! After a batch persists, each person with newly created records gets one
//! digest. Dispatch is best-effort and detached from the request path: the
//! engine spawns [`fan_out`] and returns without waiting, and one
//! recipient's failure never blocks another's or alters the batch result.

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::PersonLink;
use scorecard_common::db::models::MetricRecord;

/// One person's digest of newly created records from a single batch
#[derive(Debug, Clone, Serialize)]
pub struct RecordsDigest {
    pub person: PersonLink,
    pub records: Vec<MetricRecord>,
}

/// Notification delivery failure
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),
}

/// Best-effort digest delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, contact: &str, digest: &RecordsDigest) -> Result<(), NotifyError>;
}

/// Notifier posting digests to a configured webhook endpoint.
///
/// Without an endpoint the notifier is a no-op; dispatch is logged at debug
/// and reported as success.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl WebhookNotifier {
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        if endpoint.is_none() {
            tracing::info!("No notification webhook configured, digest dispatch disabled");
        }

        Self { client, endpoint }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    contact: &'a str,
    digest: &'a RecordsDigest,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, contact: &str, digest: &RecordsDigest) -> Result<(), NotifyError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(contact, "Digest dispatch skipped (no webhook configured)");
            return Ok(());
        };

        let response = self
            .client
            .post(endpoint)
            .json(&WebhookPayload { contact, digest })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Group one batch's persisted records into per-person digests.
///
/// Keyed by the directory's stable contact address; digest order follows
/// first appearance in the batch.
pub fn group_digests(successes: &[(PersonLink, MetricRecord)]) -> Vec<RecordsDigest> {
    let mut digests: Vec<RecordsDigest> = Vec::new();

    for (person, record) in successes {
        match digests.iter_mut().find(|d| d.person.email == person.email) {
            Some(digest) => digest.records.push(record.clone()),
            None => digests.push(RecordsDigest {
                person: person.clone(),
                records: vec![record.clone()],
            }),
        }
    }

    digests
}

/// Dispatch all digests concurrently; log failures, never propagate them.
///
/// Returns (sent, failed) counts for observability.
pub async fn fan_out(notifier: Arc<dyn Notifier>, digests: Vec<RecordsDigest>) -> (usize, usize) {
    let mut tasks: FuturesUnordered<_> = digests
        .iter()
        .map(|digest| {
            let notifier = Arc::clone(&notifier);
            async move {
                let result = notifier.send(&digest.person.email, digest).await;
                (digest, result)
            }
        })
        .collect();

    let mut sent = 0usize;
    let mut failed = 0usize;

    while let Some((digest, result)) = tasks.next().await {
        match result {
            Ok(()) => {
                sent += 1;
                tracing::debug!(
                    contact = %digest.person.email,
                    records = digest.records.len(),
                    "Digest delivered"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    contact = %digest.person.email,
                    error = %e,
                    "Digest delivery failed"
                );
            }
        }
    }

    (sent, failed)
}
