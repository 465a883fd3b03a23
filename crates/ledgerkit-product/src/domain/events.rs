//! Domain events for the Product context.

use ledgerkit_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a product is added to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAdded {
    /// The product identifier.
    pub product_id: Uuid,
    /// The product name.
    pub name: String,
    /// The unit price, in minor currency units.
    pub price: i64,
    /// The initial stock level.
    pub stock: i64,
}

/// Emitted when a product's price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdated {
    /// The product identifier.
    pub product_id: Uuid,
    /// The new unit price, in minor currency units.
    pub price: i64,
}

/// Emitted when stock is received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockIncremented {
    /// The product identifier.
    pub product_id: Uuid,
    /// The quantity added.
    pub quantity: i64,
}

/// Emitted when stock is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDecremented {
    /// The product identifier.
    pub product_id: Uuid,
    /// The quantity removed.
    pub quantity: i64,
}

/// Event type identifier for [`ProductAdded`].
pub const PRODUCT_ADDED_EVENT_TYPE: &str = "product.added";

/// Event type identifier for [`PriceUpdated`].
pub const PRICE_UPDATED_EVENT_TYPE: &str = "product.price_updated";

/// Event type identifier for [`StockIncremented`].
pub const STOCK_INCREMENTED_EVENT_TYPE: &str = "product.stock_incremented";

/// Event type identifier for [`StockDecremented`].
pub const STOCK_DECREMENTED_EVENT_TYPE: &str = "product.stock_decremented";

/// Event payload variants for the Product context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProductEventKind {
    /// A product has been added.
    ProductAdded(ProductAdded),
    /// A price has been updated.
    PriceUpdated(PriceUpdated),
    /// Stock has been incremented.
    StockIncremented(StockIncremented),
    /// Stock has been decremented.
    StockDecremented(StockDecremented),
}

/// Domain event envelope for the Product context.
#[derive(Debug, Clone)]
pub struct ProductEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ProductEventKind,
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ProductEventKind::ProductAdded(_) => PRODUCT_ADDED_EVENT_TYPE,
            ProductEventKind::PriceUpdated(_) => PRICE_UPDATED_EVENT_TYPE,
            ProductEventKind::StockIncremented(_) => STOCK_INCREMENTED_EVENT_TYPE,
            ProductEventKind::StockDecremented(_) => STOCK_DECREMENTED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProductEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
