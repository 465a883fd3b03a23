//! Query handlers for the Account context.
//!
//! The read side answers queries from the projection only; it never touches
//! the write path.

use ledgerkit_core::error::DomainError;
use uuid::Uuid;

use crate::application::projections::{AccountReadModel, AccountView};

/// Retrieves an account view by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no view exists for the ID.
pub fn get_account_by_id(
    account_id: Uuid,
    read_model: &AccountReadModel,
) -> Result<AccountView, DomainError> {
    read_model.get_by_id(account_id)
}

/// Lists all account views, ordered by account identifier.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the read model is unavailable.
pub fn list_accounts(read_model: &AccountReadModel) -> Result<Vec<AccountView>, DomainError> {
    read_model.list()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledgerkit_core::error::DomainError;
    use ledgerkit_core::store::StoredEvent;
    use uuid::Uuid;

    use super::{get_account_by_id, list_accounts};
    use crate::application::projections::AccountReadModel;
    use crate::domain::events::{ACCOUNT_CREATED_EVENT_TYPE, AccountCreated, AccountEventKind};

    fn seeded_read_model(account_id: Uuid) -> AccountReadModel {
        let read_model = AccountReadModel::new();
        read_model
            .apply_event(&StoredEvent {
                event_id: Uuid::new_v4(),
                aggregate_id: account_id,
                event_type: ACCOUNT_CREATED_EVENT_TYPE.to_owned(),
                payload: serde_json::to_value(AccountEventKind::AccountCreated(AccountCreated {
                    account_id,
                    owner: "alice".to_owned(),
                    initial_balance: 25,
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
    fn test_get_account_by_id_returns_view() {
        // Arrange
        let account_id = Uuid::new_v4();
        let read_model = seeded_read_model(account_id);

        // Act
        let view = get_account_by_id(account_id, &read_model).unwrap();

        // Assert
        assert_eq!(view.account_id, account_id);
        assert_eq!(view.owner, "alice");
        assert_eq!(view.balance, 25);
    }

    #[test]
    fn test_get_account_by_id_unknown_is_not_found() {
        let read_model = AccountReadModel::new();
        let missing = Uuid::new_v4();

        match get_account_by_id(missing, &read_model) {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_list_accounts_returns_all_views() {
        let account_id = Uuid::new_v4();
        let read_model = seeded_read_model(account_id);

        let all = list_accounts(&read_model).unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].account_id, account_id);
    }
}
