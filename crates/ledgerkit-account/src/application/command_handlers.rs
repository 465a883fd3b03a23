//! Command handlers for the Account context.
//!
//! [`AccountService`] is the single orchestration point tying a command to
//! the aggregate, the event store, and the read model: load (or create),
//! execute, persist under the optimistic-concurrency check, then project.

use std::sync::Arc;

use ledgerkit_core::aggregate::AggregateRoot;
use ledgerkit_core::clock::Clock;
use ledgerkit_core::error::DomainError;
use ledgerkit_core::event::{DomainEvent, EventMetadata};
use ledgerkit_core::store::{EventStore, StoredEvent};
use uuid::Uuid;

use crate::application::projections::AccountReadModel;
use crate::domain::aggregates::Account;
use crate::domain::commands::AccountCommand;
use crate::domain::events::{AccountEvent, AccountEventKind};

fn to_stored_event(event: &AccountEvent) -> StoredEvent {
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

/// Reconstitutes an [`Account`] from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if a stored payload fails to
/// deserialize into an Account event.
pub fn reconstitute(account_id: Uuid, stored: &[StoredEvent]) -> Result<Account, DomainError> {
    let mut events = Vec::with_capacity(stored.len());
    for record in stored {
        let kind: AccountEventKind = serde_json::from_value(record.payload.clone())
            .map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to deserialize event {}: {e}",
                    record.event_id
                ))
            })?;
        events.push(AccountEvent {
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
    Ok(Account::load_from_history(account_id, &events))
}

/// Application service for the Account context.
///
/// The event store is constructed once at process start and passed in; the
/// service holds it behind the [`EventStore`] trait so tests and production
/// can substitute backends.
pub struct AccountService {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    read_model: Arc<AccountReadModel>,
}

impl AccountService {
    /// Creates a new service over the given store, clock, and read model.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        read_model: Arc<AccountReadModel>,
    ) -> Self {
        Self {
            store,
            clock,
            read_model,
        }
    }

    /// Handles an Account command end to end and returns the affected
    /// aggregate's identifier.
    ///
    /// A `ConcurrencyConflict` means another handler committed first; the
    /// caller must reload and re-validate before retrying — the service
    /// never retries internally.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a business rule rejects the
    /// command, `DomainError::AggregateNotFound` when a mutating command
    /// targets an account with no history, `DomainError::ConcurrencyConflict`
    /// when the expected version is stale, and
    /// `DomainError::Infrastructure` on storage or deserialization failures.
    pub async fn submit(&self, command: &AccountCommand) -> Result<Uuid, DomainError> {
        match command {
            AccountCommand::Create(cmd) => {
                let mut account = Account::create(cmd, self.clock.as_ref())?;
                self.persist_and_project(&mut account).await
            }
            AccountCommand::Deposit(cmd) => {
                self.handle_mutation(cmd.account_id, |account| {
                    account.deposit(cmd.amount, cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
            AccountCommand::Withdraw(cmd) => {
                self.handle_mutation(cmd.account_id, |account| {
                    account.withdraw(cmd.amount, cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
            AccountCommand::Close(cmd) => {
                self.handle_mutation(cmd.account_id, |account| {
                    account.close(cmd.correlation_id, self.clock.as_ref())
                })
                .await
            }
        }
    }

    /// Loads an existing account, runs one operation on it, and persists
    /// the outcome.
    async fn handle_mutation<F>(&self, account_id: Uuid, operation: F) -> Result<Uuid, DomainError>
    where
        F: FnOnce(&mut Account) -> Result<(), DomainError>,
    {
        let existing_events = self.store.load_events(account_id).await?;
        if existing_events.is_empty() {
            return Err(DomainError::AggregateNotFound(account_id));
        }

        let mut account = reconstitute(account_id, &existing_events)?;
        operation(&mut account)?;
        self.persist_and_project(&mut account).await
    }

    /// Persists the aggregate's uncommitted events at the version it
    /// believed was current, then feeds them to the read model in order.
    async fn persist_and_project(&self, account: &mut Account) -> Result<Uuid, DomainError> {
        let stored: Vec<StoredEvent> = account
            .uncommitted_events()
            .iter()
            .map(to_stored_event)
            .collect();
        #[allow(clippy::cast_possible_wrap)]
        let expected_version = account.version() - stored.len() as i64;

        self.store
            .append_events(account.aggregate_id(), expected_version, &stored)
            .await?;

        for event in &stored {
            self.read_model.apply_event(event)?;
        }
        account.clear_uncommitted_events();

        tracing::info!(
            aggregate_id = %account.aggregate_id(),
            new_version = account.version(),
            "account command committed"
        );
        Ok(account.aggregate_id())
    }
}
