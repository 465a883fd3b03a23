//! Query handlers for the Product context.

use ledgerkit_core::error::DomainError;
use uuid::Uuid;

use crate::application::projections::{ProductReadModel, ProductView};

/// Retrieves a product view by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no view exists for the ID.
pub fn get_product_by_id(
    product_id: Uuid,
    read_model: &ProductReadModel,
) -> Result<ProductView, DomainError> {
    read_model.get_by_id(product_id)
}

/// Lists all product views, ordered by product identifier.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the read model is unavailable.
pub fn list_products(read_model: &ProductReadModel) -> Result<Vec<ProductView>, DomainError> {
    read_model.list()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledgerkit_core::error::DomainError;
    use ledgerkit_core::store::StoredEvent;
    use uuid::Uuid;

    use super::{get_product_by_id, list_products};
    use crate::application::projections::ProductReadModel;
    use crate::domain::events::{PRODUCT_ADDED_EVENT_TYPE, ProductAdded, ProductEventKind};

    fn seeded_read_model(product_id: Uuid) -> ProductReadModel {
        let read_model = ProductReadModel::new();
        read_model
            .apply_event(&StoredEvent {
                event_id: Uuid::new_v4(),
                aggregate_id: product_id,
                event_type: PRODUCT_ADDED_EVENT_TYPE.to_owned(),
                payload: serde_json::to_value(ProductEventKind::ProductAdded(ProductAdded {
                    product_id,
                    name: "Laptop".to_owned(),
                    price: 1200,
                    stock: 10,
                }))
                .unwrap(),
                sequence_number: 1,
                correlation_id: Uuid::new_v4(),
                causation_id: Uuid::new_v4(),
                occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            })
            .unwrap();
        read_model
    }

    #[test]
    fn test_get_product_by_id_returns_view() {
        let product_id = Uuid::new_v4();
        let read_model = seeded_read_model(product_id);

        let view = get_product_by_id(product_id, &read_model).unwrap();

        assert_eq!(view.product_id, product_id);
        assert_eq!(view.name, "Laptop");
        assert_eq!(view.price, 1200);
    }

    #[test]
    fn test_get_product_by_id_unknown_is_not_found() {
        let read_model = ProductReadModel::new();
        let missing = Uuid::new_v4();

        match get_product_by_id(missing, &read_model) {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_list_products_returns_all_views() {
        let product_id = Uuid::new_v4();
        let read_model = seeded_read_model(product_id);

        let all = list_products(&read_model).unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].product_id, product_id);
    }
}
