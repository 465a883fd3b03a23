//! Event store abstraction.
//!
//! The event store is the single source of truth for append order and the
//! sole serialization point for concurrent command handlers. Implementations
//! must make the expected-version check and the append one atomic unit per
//! aggregate identity.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a domain event.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the aggregate stream (1-based).
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing event/command.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for loading and appending domain events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Load all events for a given aggregate, ordered by sequence number.
    ///
    /// An unknown aggregate identity yields an empty list, not an error;
    /// callers distinguish "does not exist yet" from load failures this way.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Append new events to an aggregate stream with optimistic concurrency.
    ///
    /// `expected_version` is the stored event count the writer observed when
    /// it loaded the aggregate. On mismatch the append fails with
    /// [`DomainError::ConcurrencyConflict`] and writes nothing.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;

    /// Load the globally ordered feed across all aggregates.
    ///
    /// Ordered by `(occurred_at, sequence_number, aggregate_id)` so the feed
    /// is deterministic for a given store state. This is the basis for
    /// rebuilding read models.
    async fn load_all_events(&self) -> Result<Vec<StoredEvent>, DomainError>;
}
