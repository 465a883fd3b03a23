//! Aggregate roots for the Product context.

use ledgerkit_core::aggregate::AggregateRoot;
use ledgerkit_core::clock::Clock;
use ledgerkit_core::error::DomainError;
use ledgerkit_core::event::EventMetadata;
use uuid::Uuid;

use super::commands::AddProduct;
use super::events::{
    PriceUpdated, ProductAdded, ProductEvent, ProductEventKind, StockDecremented, StockIncremented,
};

/// The aggregate root for a catalog product.
///
/// Invariants: the price stays strictly positive after any update, and the
/// stock level never goes negative.
#[derive(Debug)]
pub struct Product {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub version: i64,
    /// The product name.
    pub name: String,
    /// Current unit price, in minor currency units.
    pub price: i64,
    /// Current stock level.
    pub stock: i64,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<ProductEvent>,
}

impl Product {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            name: String::new(),
            price: 0,
            stock: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a new product from an `AddProduct` command, producing exactly
    /// one `ProductAdded` event at version 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank, the price is
    /// not strictly positive, or the initial stock is negative.
    pub fn add(command: &AddProduct, clock: &dyn Clock) -> Result<Self, DomainError> {
        if command.name.trim().is_empty() {
            return Err(DomainError::Validation("product name must not be empty".into()));
        }
        if command.price <= 0 {
            return Err(DomainError::Validation("price must be positive".into()));
        }
        if command.stock < 0 {
            return Err(DomainError::Validation(
                "initial stock must not be negative".into(),
            ));
        }

        let mut product = Self::new(Uuid::new_v4());
        product.record(
            ProductEventKind::ProductAdded(ProductAdded {
                product_id: product.id,
                name: command.name.clone(),
                price: command.price,
                stock: command.stock,
            }),
            command.correlation_id,
            clock,
        );
        Ok(product)
    }

    /// Reconstitutes a product by replaying its ordered event history.
    #[must_use]
    pub fn load_from_history(id: Uuid, events: &[ProductEvent]) -> Self {
        let mut product = Self::new(id);
        product.replay(events);
        product
    }

    /// Changes the unit price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the new price is not strictly
    /// positive.
    pub fn update_price(
        &mut self,
        price: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if price <= 0 {
            return Err(DomainError::Validation("price must be positive".into()));
        }

        self.record(
            ProductEventKind::PriceUpdated(PriceUpdated {
                product_id: self.id,
                price,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Receives stock.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the quantity is not strictly
    /// positive.
    pub fn increment_stock(
        &mut self,
        quantity: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if quantity <= 0 {
            return Err(DomainError::Validation("quantity must be positive".into()));
        }

        self.record(
            ProductEventKind::StockIncremented(StockIncremented {
                product_id: self.id,
                quantity,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Consumes stock. Rejected when more than the available stock is asked
    /// for, so the level never goes negative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the quantity is not strictly
    /// positive or exceeds the available stock.
    pub fn decrement_stock(
        &mut self,
        quantity: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if quantity <= 0 {
            return Err(DomainError::Validation("quantity must be positive".into()));
        }
        if quantity > self.stock {
            return Err(DomainError::Validation("insufficient stock".into()));
        }

        self.record(
            ProductEventKind::StockDecremented(StockDecremented {
                product_id: self.id,
                quantity,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Buffers a new event and applies it, advancing the version by one.
    fn record(&mut self, kind: ProductEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = ProductEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                aggregate_id: self.id,
                sequence_number: self.version + 1,
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for Product {
    type Event = ProductEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            ProductEventKind::ProductAdded(payload) => {
                self.name.clone_from(&payload.name);
                self.price = payload.price;
                self.stock = payload.stock;
            }
            ProductEventKind::PriceUpdated(payload) => {
                self.price = payload.price;
            }
            ProductEventKind::StockIncremented(payload) => {
                self.stock += payload.quantity;
            }
            ProductEventKind::StockDecremented(payload) => {
                self.stock -= payload.quantity;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
