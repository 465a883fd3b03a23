//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
///
/// An aggregate derives its state exclusively by applying its own events in
/// order. Command handling appends new events to an uncommitted buffer; the
/// buffer defines the exact transactional unit persisted by an application
/// service and is cleared only after a successful append.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state and advance the version.
    ///
    /// Must be a pure state transition: no validation, no side effects, and
    /// no writes to the uncommitted buffer.
    fn apply(&mut self, event: &Self::Event);

    /// Replay an ordered history from the aggregate's current position.
    ///
    /// Applies each event via [`AggregateRoot::apply`] without buffering
    /// anything for persistence, so replay has no side effect on the store.
    fn replay(&mut self, events: &[Self::Event]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);
}
