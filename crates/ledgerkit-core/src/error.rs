//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// `Validation` and `ConcurrencyConflict` are expected, client-visible
/// outcomes; the core never recovers from them internally. `Infrastructure`
/// covers genuinely unexpected failures and bubbles up unmodified.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A mutating command referenced an aggregate with no event history.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict at append time.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the writer expected.
        expected: i64,
        /// The version actually stored.
        actual: i64,
    },

    /// A business rule was violated inside an aggregate operation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
