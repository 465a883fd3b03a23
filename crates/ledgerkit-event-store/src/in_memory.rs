//! In-memory implementation of the `EventStore` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ledgerkit_core::error::DomainError;
use ledgerkit_core::store::{EventStore, StoredEvent};

/// In-memory event store backed by a map from aggregate ID to its ordered
/// event stream.
///
/// The single write lock makes the expected-version check and the append one
/// atomic unit, which is the only mechanism detecting two command handlers
/// racing on the same aggregate. Each aggregate identity is an independent
/// consistency boundary; there are no cross-aggregate transactions.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventStore {
    /// Creates a new, empty event store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.write().await;
        let stream = streams.entry(aggregate_id).or_default();

        #[allow(clippy::cast_possible_wrap)]
        let actual = stream.len() as i64;
        if actual != expected_version {
            tracing::warn!(
                %aggregate_id,
                expected = expected_version,
                actual,
                "append rejected: stale expected version"
            );
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        // Validate the whole batch before writing anything so a bad batch
        // stays all-or-nothing.
        for (offset, event) in events.iter().enumerate() {
            #[allow(clippy::cast_possible_wrap)]
            let required = actual + 1 + offset as i64;
            if event.sequence_number != required {
                return Err(DomainError::Infrastructure(format!(
                    "non-contiguous sequence number for aggregate {aggregate_id}: \
                     expected {required}, got {}",
                    event.sequence_number
                )));
            }
            if event.aggregate_id != aggregate_id {
                return Err(DomainError::Infrastructure(format!(
                    "event for aggregate {} appended to stream {aggregate_id}",
                    event.aggregate_id
                )));
            }
        }

        stream.extend_from_slice(events);
        tracing::debug!(
            %aggregate_id,
            appended = events.len(),
            new_version = stream.len(),
            "events appended"
        );
        Ok(())
    }

    async fn load_all_events(&self) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().await;
        let mut all: Vec<StoredEvent> = streams.values().flatten().cloned().collect();
        // Aggregate ID as the final key keeps the feed deterministic when
        // timestamps collide across streams.
        all.sort_by(|a, b| {
            (a.occurred_at, a.sequence_number, a.aggregate_id)
                .cmp(&(b.occurred_at, b.sequence_number, b.aggregate_id))
        });
        Ok(all)
    }
}
