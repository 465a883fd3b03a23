//! Commands for the Product context.

use ledgerkit_core::command::Command;
use uuid::Uuid;

/// Command to add a product to the catalog.
#[derive(Debug, Clone)]
pub struct AddProduct {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The product name.
    pub name: String,
    /// The unit price, in minor currency units.
    pub price: i64,
    /// The initial stock level.
    pub stock: i64,
}

impl Command for AddProduct {
    fn command_type(&self) -> &'static str {
        "product.add"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to change a product's price.
#[derive(Debug, Clone)]
pub struct UpdatePrice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target product identifier.
    pub product_id: Uuid,
    /// The new unit price, in minor currency units.
    pub price: i64,
}

impl Command for UpdatePrice {
    fn command_type(&self) -> &'static str {
        "product.update_price"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to receive stock.
#[derive(Debug, Clone)]
pub struct IncrementStock {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target product identifier.
    pub product_id: Uuid,
    /// The quantity to add.
    pub quantity: i64,
}

impl Command for IncrementStock {
    fn command_type(&self) -> &'static str {
        "product.increment_stock"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to consume stock.
#[derive(Debug, Clone)]
pub struct DecrementStock {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target product identifier.
    pub product_id: Uuid,
    /// The quantity to remove.
    pub quantity: i64,
}

impl Command for DecrementStock {
    fn command_type(&self) -> &'static str {
        "product.decrement_stock"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Closed set of Product commands, dispatched by tag in the service.
#[derive(Debug, Clone)]
pub enum ProductCommand {
    /// Add a product.
    Add(AddProduct),
    /// Update a price.
    UpdatePrice(UpdatePrice),
    /// Receive stock.
    IncrementStock(IncrementStock),
    /// Consume stock.
    DecrementStock(DecrementStock),
}
