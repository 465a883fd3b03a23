//! Command handlers for the Product context.
//!
//! [`ProductService`] mirrors the Account service: load (or create) the
//! aggregate, execute the command, persist under the optimistic-concurrency
//! check, then project into the read model.

use std::sync::Arc;

use ledgerkit_core::aggregate::AggregateRoot;
use ledgerkit_core::clock::Clock;
use ledgerkit_core::error::DomainError;
use ledgerkit_core::event::{DomainEvent, EventMetadata};
use ledgerkit_core::store::{EventStore, StoredEvent};
use uuid::Uuid;

use crate::application::projections::ProductReadModel;
use crate::domain::aggregates::Product;
use crate::domain::commands::ProductCommand;
use crate::domain::events::{ProductEvent, ProductEventKind};

fn to_stored_event(event: &ProductEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a [`Product`] from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if a stored payload fails to
/// deserialize into a Product event.
pub fn reconstitute(product_id: Uuid, stored: &[StoredEvent]) -> Result<Product, DomainError> {
    let mut events = Vec::with_capacity(stored.len());
    for record in stored {
        let kind: ProductEventKind = serde_json::from_value(record.payload.clone())
            .map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to deserialize event {}: {e}",
                    record.event_id
                ))
            })?;
        events.push(ProductEvent {
            metadata: EventMetadata {
                event_id: record.event_id,
                aggregate_id: record.aggregate_id,
                sequence_number: record.sequence_number,
                correlation_id: record.correlation_id,
                causation_id: record.causation_id,
                occurred_at: record.occurred_at,
            },
            kind,
        });
    }
    Ok(Product::load_from_history(product_id, &events))
}

/// Application service for the Product context.
pub struct ProductService {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    read_model: Arc<ProductReadModel>,
}

impl ProductService {
    /// Creates a new service over the given store, clock, and read model.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        read_model: Arc<ProductReadModel>,
    ) -> Self {
        Self {
            store,
            clock,
            read_model,
        }
    }

    /// Handles a Product command end to end and returns the affected
    /// aggregate's identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a business rule rejects the
    /// command, `DomainError::AggregateNotFound` when a mutating command
    /// targets a product with no history, `DomainError::ConcurrencyConflict`
    /// when the expected version is stale, and
    /// `DomainError::Infrastructure` on storage or deserialization failures.
    pub async fn submit(&self, command: &ProductCommand) -> Result<Uuid, DomainError> {
        match command {
            ProductCommand::Add(cmd) => {
                let mut product = Product::add(cmd, self.clock.as_ref())?;
                self.persist_and_project(&mut product).await
            }
            ProductCommand::UpdatePrice(cmd) => {
                self.handle_mutation(cmd.product_id, |product| {
                    product.update_price(cmd.price, cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
            ProductCommand::IncrementStock(cmd) => {
                self.handle_mutation(cmd.product_id, |product| {
                    product.increment_stock(cmd.quantity, cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
            ProductCommand::DecrementStock(cmd) => {
                self.handle_mutation(cmd.product_id, |product| {
                    product.decrement_stock(cmd.quantity, cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
        }
    }

    async fn handle_mutation<F>(&self, product_id: Uuid, operation: F) -> Result<Uuid, DomainError>
    where
        F: FnOnce(&mut Product) -> Result<(), DomainError>,
    {
        let existing_events = self.store.load_events(product_id).await?;
        if existing_events.is_empty() {
            return Err(DomainError::AggregateNotFound(product_id));
        }

        let mut product = reconstitute(product_id, &existing_events)?;
        operation(&mut product)?;
        self.persist_and_project(&mut product).await
    }

    async fn persist_and_project(&self, product: &mut Product) -> Result<Uuid, DomainError> {
        let stored: Vec<StoredEvent> = product
            .uncommitted_events()
            .iter()
            .map(to_stored_event)
            .collect();
        #[allow(clippy::cast_possible_wrap)]
        let expected_version = product.version() - stored.len() as i64;

        self.store
            .append_events(product.aggregate_id(), expected_version, &stored)
            .await?;

        for event in &stored {
            self.read_model.apply_event(event)?;
        }
        product.clear_uncommitted_events();

        tracing::info!(
            aggregate_id = %product.aggregate_id(),
            new_version = product.version(),
            "product command committed"
        );
        Ok(product.aggregate_id())
    }
}
