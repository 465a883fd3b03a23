//! Read-model projection for the Product context.
//!
//! Same shape as the Account read model: a denormalized view per product,
//! derived only from events. Duplicates are skipped by sequence number,
//! and events delivered ahead of a gap are buffered until the intervening
//! events land, so out-of-order delivery across handlers never loses an
//! event.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use ledgerkit_core::error::DomainError;
use ledgerkit_core::store::{EventStore, StoredEvent};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::events::ProductEventKind;

/// Read-only view of a product aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    /// The product identifier.
    pub product_id: Uuid,
    /// The product name.
    pub name: String,
    /// Current unit price, in minor currency units.
    pub price: i64,
    /// Current stock level.
    pub stock: i64,
    /// Sequence number of the last event applied to this view.
    pub version: i64,
}

#[derive(Debug, Default)]
struct ProjectionState {
    views: HashMap<Uuid, ProductView>,
    /// Events delivered ahead of a sequence gap, keyed by aggregate and
    /// ordered by sequence number, waiting for the gap to close.
    pending: HashMap<Uuid, BTreeMap<i64, ProductEventKind>>,
}

/// In-memory read model keyed by product identifier.
#[derive(Debug, Default)]
pub struct ProductReadModel {
    state: RwLock<ProjectionState>,
}

impl ProductReadModel {
    /// Creates an empty read model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one stored event to the view map.
    ///
    /// Events from other contexts are ignored; duplicate sequence numbers
    /// are skipped and events past the next expected sequence number are
    /// buffered until the gap closes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a Product event payload
    /// fails to deserialize or a mutation event opens a stream that has no
    /// view.
    pub fn apply_event(&self, event: &StoredEvent) -> Result<(), DomainError> {
        if !event.event_type.starts_with("product.") {
            return Ok(());
        }

        let kind: ProductEventKind = serde_json::from_value(event.payload.clone())
            .map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to deserialize event {}: {e}",
                    event.event_id
                ))
            })?;

        let mut state = self.write_state()?;
        let applied = state.views.get(&event.aggregate_id).map_or(0, |v| v.version);

        if event.sequence_number <= applied {
            tracing::debug!(
                aggregate_id = %event.aggregate_id,
                sequence_number = event.sequence_number,
                "skipping already-applied event"
            );
            return Ok(());
        }
        if event.sequence_number > applied + 1 {
            tracing::debug!(
                aggregate_id = %event.aggregate_id,
                sequence_number = event.sequence_number,
                next_expected = applied + 1,
                "buffering out-of-order event"
            );
            state
                .pending
                .entry(event.aggregate_id)
                .or_default()
                .insert(event.sequence_number, kind);
            return Ok(());
        }

        Self::apply_kind(&mut state.views, event.aggregate_id, event.sequence_number, kind)?;
        Self::drain_pending(&mut state, event.aggregate_id)
    }

    /// Clears all views and replays the store's global feed.
    ///
    /// # Errors
    ///
    /// Returns any error from reading the feed or applying an event.
    pub async fn rebuild(&self, store: &dyn EventStore) -> Result<(), DomainError> {
        let events = store.load_all_events().await?;
        {
            let mut state = self.write_state()?;
            state.views.clear();
            state.pending.clear();
        }
        for event in &events {
            self.apply_event(event)?;
        }
        tracing::info!(replayed = events.len(), "product read model rebuilt");
        Ok(())
    }

    /// Retrieves the view for one product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if no view exists.
    pub fn get_by_id(&self, product_id: Uuid) -> Result<ProductView, DomainError> {
        self.read_state()?
            .views
            .get(&product_id)
            .cloned()
            .ok_or(DomainError::AggregateNotFound(product_id))
    }

    /// Returns all views, ordered by product identifier for determinism.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the view lock is poisoned.
    pub fn list(&self) -> Result<Vec<ProductView>, DomainError> {
        let mut all: Vec<ProductView> = self.read_state()?.views.values().cloned().collect();
        all.sort_by_key(|v| v.product_id);
        Ok(all)
    }

    /// Applies buffered events for one product while they continue the
    /// stream contiguously.
    fn drain_pending(state: &mut ProjectionState, aggregate_id: Uuid) -> Result<(), DomainError> {
        loop {
            let next = state.views.get(&aggregate_id).map_or(0, |v| v.version) + 1;
            let Some(queue) = state.pending.get_mut(&aggregate_id) else {
                return Ok(());
            };
            let Some(kind) = queue.remove(&next) else {
                if queue.is_empty() {
                    state.pending.remove(&aggregate_id);
                }
                return Ok(());
            };
            Self::apply_kind(&mut state.views, aggregate_id, next, kind)?;
        }
    }

    fn apply_kind(
        views: &mut HashMap<Uuid, ProductView>,
        aggregate_id: Uuid,
        sequence_number: i64,
        kind: ProductEventKind,
    ) -> Result<(), DomainError> {
        match kind {
            ProductEventKind::ProductAdded(payload) => {
                views.insert(
                    aggregate_id,
                    ProductView {
                        product_id: aggregate_id,
                        name: payload.name,
                        price: payload.price,
                        stock: payload.stock,
                        version: sequence_number,
                    },
                );
            }
            ProductEventKind::PriceUpdated(payload) => {
                let view = Self::existing(views, aggregate_id)?;
                view.price = payload.price;
                view.version = sequence_number;
            }
            ProductEventKind::StockIncremented(payload) => {
                let view = Self::existing(views, aggregate_id)?;
                view.stock += payload.quantity;
                view.version = sequence_number;
            }
            ProductEventKind::StockDecremented(payload) => {
                let view = Self::existing(views, aggregate_id)?;
                view.stock -= payload.quantity;
                view.version = sequence_number;
            }
        }
        Ok(())
    }

    fn existing(
        views: &mut HashMap<Uuid, ProductView>,
        aggregate_id: Uuid,
    ) -> Result<&mut ProductView, DomainError> {
        views.get_mut(&aggregate_id).ok_or_else(|| {
            DomainError::Infrastructure(format!(
                "mutation event arrived for product {aggregate_id} with no view"
            ))
        })
    }

    fn read_state(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, ProjectionState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Infrastructure("product view lock poisoned".into()))
    }

    fn write_state(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, ProjectionState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Infrastructure("product view lock poisoned".into()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledgerkit_core::store::StoredEvent;
    use uuid::Uuid;

    use super::ProductReadModel;
    use crate::domain::events::{
        PRODUCT_ADDED_EVENT_TYPE, ProductAdded, ProductEventKind, STOCK_DECREMENTED_EVENT_TYPE,
        StockDecremented,
    };

    fn added_event(product_id: Uuid, stock: i64) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: product_id,
            event_type: PRODUCT_ADDED_EVENT_TYPE.to_owned(),
            payload: serde_json::to_value(ProductEventKind::ProductAdded(ProductAdded {
                product_id,
                name: "Laptop".to_owned(),
                price: 1200,
                stock,
            }))
            .unwrap(),
            sequence_number: 1,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    fn decremented_event(product_id: Uuid, quantity: i64, sequence_number: i64) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: product_id,
            event_type: STOCK_DECREMENTED_EVENT_TYPE.to_owned(),
            payload: serde_json::to_value(ProductEventKind::StockDecremented(StockDecremented {
                product_id,
                quantity,
            }))
            .unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 1).unwrap(),
        }
    }

    #[test]
    fn test_apply_event_builds_view() {
        let read_model = ProductReadModel::new();
        let product_id = Uuid::new_v4();

        read_model.apply_event(&added_event(product_id, 10)).unwrap();
        read_model
            .apply_event(&decremented_event(product_id, 3, 2))
            .unwrap();

        let view = read_model.get_by_id(product_id).unwrap();
        assert_eq!(view.name, "Laptop");
        assert_eq!(view.stock, 7);
        assert_eq!(view.version, 2);
    }

    #[test]
    fn test_reapplying_same_event_is_idempotent() {
        let read_model = ProductReadModel::new();
        let product_id = Uuid::new_v4();
        read_model.apply_event(&added_event(product_id, 10)).unwrap();
        let decrement = decremented_event(product_id, 3, 2);

        read_model.apply_event(&decrement).unwrap();
        read_model.apply_event(&decrement).unwrap();

        let view = read_model.get_by_id(product_id).unwrap();
        assert_eq!(view.stock, 7);
        assert_eq!(view.version, 2);
    }

    #[test]
    fn test_out_of_order_delivery_applies_all_events() {
        // Two committed decrements reach the projection in reverse order.
        let read_model = ProductReadModel::new();
        let product_id = Uuid::new_v4();
        read_model.apply_event(&added_event(product_id, 10)).unwrap();

        read_model
            .apply_event(&decremented_event(product_id, 2, 3))
            .unwrap();
        read_model
            .apply_event(&decremented_event(product_id, 3, 2))
            .unwrap();

        // Both decrements land once the gap closes.
        let view = read_model.get_by_id(product_id).unwrap();
        assert_eq!(view.stock, 5);
        assert_eq!(view.version, 3);
    }

    #[test]
    fn test_foreign_events_are_ignored() {
        let read_model = ProductReadModel::new();
        let mut event = added_event(Uuid::new_v4(), 10);
        event.event_type = "account.created".to_owned();
        event.payload = serde_json::json!({"unrelated": true});

        read_model.apply_event(&event).unwrap();
        assert!(read_model.list().unwrap().is_empty());
    }
}
