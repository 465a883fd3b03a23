//! End-to-end tests for the Product context over a real in-memory store.

use std::sync::Arc;

use ledgerkit_core::clock::SystemClock;
use ledgerkit_core::error::DomainError;
use ledgerkit_core::store::EventStore;
use ledgerkit_event_store::InMemoryEventStore;
use ledgerkit_product::application::command_handlers::ProductService;
use ledgerkit_product::application::projections::ProductReadModel;
use ledgerkit_product::domain::commands::{
    AddProduct, DecrementStock, IncrementStock, ProductCommand, UpdatePrice,
};
use uuid::Uuid;

struct Fixture {
    store: Arc<InMemoryEventStore>,
    read_model: Arc<ProductReadModel>,
    service: ProductService,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryEventStore::new());
    let read_model = Arc::new(ProductReadModel::new());
    let service = ProductService::new(
        store.clone(),
        Arc::new(SystemClock),
        read_model.clone(),
    );
    Fixture {
        store,
        read_model,
        service,
    }
}

fn add(name: &str, price: i64, stock: i64) -> ProductCommand {
    ProductCommand::Add(AddProduct {
        correlation_id: Uuid::new_v4(),
        name: name.to_owned(),
        price,
        stock,
    })
}

#[tokio::test]
async fn test_decrement_beyond_stock_fails_and_stock_is_unchanged() {
    // Arrange
    let fx = fixture();
    let product_id = fx.service.submit(&add("Laptop", 1200, 10)).await.unwrap();

    // Act
    let result = fx
        .service
        .submit(&ProductCommand::DecrementStock(DecrementStock {
            correlation_id: Uuid::new_v4(),
            product_id,
            quantity: 12,
        }))
        .await;

    // Assert — "insufficient stock", view and store untouched.
    match result {
        Err(DomainError::Validation(msg)) => assert_eq!(msg, "insufficient stock"),
        other => panic!("expected Validation, got {other:?}"),
    }
    let view = fx.read_model.get_by_id(product_id).unwrap();
    assert_eq!(view.stock, 10);
    let history = fx.store.load_events(product_id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_price_and_stock_commands_build_consistent_view() {
    // Arrange
    let fx = fixture();
    let product_id = fx.service.submit(&add("Laptop", 1200, 10)).await.unwrap();

    // Act
    fx.service
        .submit(&ProductCommand::UpdatePrice(UpdatePrice {
            correlation_id: Uuid::new_v4(),
            product_id,
            price: 999,
        }))
        .await
        .unwrap();
    fx.service
        .submit(&ProductCommand::IncrementStock(IncrementStock {
            correlation_id: Uuid::new_v4(),
            product_id,
            quantity: 5,
        }))
        .await
        .unwrap();
    fx.service
        .submit(&ProductCommand::DecrementStock(DecrementStock {
            correlation_id: Uuid::new_v4(),
            product_id,
            quantity: 8,
        }))
        .await
        .unwrap();

    // Assert
    let view = fx.read_model.get_by_id(product_id).unwrap();
    assert_eq!(view.price, 999);
    assert_eq!(view.stock, 7);
    assert_eq!(view.version, 4);

    let history = fx.store.load_events(product_id).await.unwrap();
    let types: Vec<&str> = history.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "product.added",
            "product.price_updated",
            "product.stock_incremented",
            "product.stock_decremented"
        ]
    );
}

#[tokio::test]
async fn test_rebuild_matches_incrementally_built_read_model() {
    // Arrange
    let fx = fixture();
    let first = fx.service.submit(&add("Laptop", 1200, 10)).await.unwrap();
    let second = fx.service.submit(&add("Mouse", 40, 200)).await.unwrap();
    fx.service
        .submit(&ProductCommand::DecrementStock(DecrementStock {
            correlation_id: Uuid::new_v4(),
            product_id: first,
            quantity: 2,
        }))
        .await
        .unwrap();
    fx.service
        .submit(&ProductCommand::UpdatePrice(UpdatePrice {
            correlation_id: Uuid::new_v4(),
            product_id: second,
            price: 35,
        }))
        .await
        .unwrap();

    // Act
    let rebuilt = ProductReadModel::new();
    rebuilt.rebuild(fx.store.as_ref()).await.unwrap();

    // Assert
    let incremental = fx.read_model.list().unwrap();
    let replayed = rebuilt.list().unwrap();
    assert_eq!(incremental.len(), replayed.len());
    for (a, b) in incremental.iter().zip(replayed.iter()) {
        assert_eq!(a.product_id, b.product_id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.price, b.price);
        assert_eq!(a.stock, b.stock);
        assert_eq!(a.version, b.version);
    }
}
