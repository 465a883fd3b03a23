//! Read-model projection for the Account context.
//!
//! A denormalized snapshot per account, derived only from events — command
//! handling never writes a view directly. The projection is updated
//! synchronously in the command path after a successful append, but two
//! handlers that both commit can reach the projection in either order.
//! Each account therefore tracks the sequence number it last applied:
//! duplicates are skipped, and events that arrive ahead of a gap are
//! buffered until the intervening events land.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use ledgerkit_core::error::DomainError;
use ledgerkit_core::store::{EventStore, StoredEvent};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::events::AccountEventKind;

/// Read-only view of an account aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    /// The account identifier.
    pub account_id: Uuid,
    /// The account owner's name.
    pub owner: String,
    /// Current balance, in minor currency units.
    pub balance: i64,
    /// Whether the account has been closed.
    pub closed: bool,
    /// Sequence number of the last event applied to this view.
    pub version: i64,
}

#[derive(Debug, Default)]
struct ProjectionState {
    views: HashMap<Uuid, AccountView>,
    /// Events delivered ahead of a sequence gap, keyed by aggregate and
    /// ordered by sequence number, waiting for the gap to close.
    pending: HashMap<Uuid, BTreeMap<i64, AccountEventKind>>,
}

/// In-memory read model keyed by account identifier.
#[derive(Debug, Default)]
pub struct AccountReadModel {
    state: RwLock<ProjectionState>,
}

impl AccountReadModel {
    /// Creates an empty read model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one stored event to the view map.
    ///
    /// Events from other contexts are ignored. Events at or below a view's
    /// last applied sequence number are duplicates and are skipped; events
    /// past the next expected sequence number are buffered and applied once
    /// the gap closes, so out-of-order delivery never loses an event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if an Account event payload
    /// fails to deserialize or a mutation event opens a stream that has no
    /// view.
    pub fn apply_event(&self, event: &StoredEvent) -> Result<(), DomainError> {
        if !event.event_type.starts_with("account.") {
            return Ok(());
        }

        let kind: AccountEventKind = serde_json::from_value(event.payload.clone())
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
        tracing::info!(replayed = events.len(), "account read model rebuilt");
        Ok(())
    }

    /// Retrieves the view for one account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if no view exists.
    pub fn get_by_id(&self, account_id: Uuid) -> Result<AccountView, DomainError> {
        self.read_state()?
            .views
            .get(&account_id)
            .cloned()
            .ok_or(DomainError::AggregateNotFound(account_id))
    }

    /// Returns all views, ordered by account identifier for determinism.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the view lock is poisoned.
    pub fn list(&self) -> Result<Vec<AccountView>, DomainError> {
        let mut all: Vec<AccountView> = self.read_state()?.views.values().cloned().collect();
        all.sort_by_key(|v| v.account_id);
        Ok(all)
    }

    /// Applies buffered events for one account while they continue the
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
        views: &mut HashMap<Uuid, AccountView>,
        aggregate_id: Uuid,
        sequence_number: i64,
        kind: AccountEventKind,
    ) -> Result<(), DomainError> {
        match kind {
            AccountEventKind::AccountCreated(payload) => {
                views.insert(
                    aggregate_id,
                    AccountView {
                        account_id: aggregate_id,
                        owner: payload.owner,
                        balance: payload.initial_balance,
                        closed: false,
                        version: sequence_number,
                    },
                );
            }
            AccountEventKind::MoneyDeposited(payload) => {
                let view = Self::existing(views, aggregate_id)?;
                view.balance += payload.amount;
                view.version = sequence_number;
            }
            AccountEventKind::MoneyWithdrawn(payload) => {
                let view = Self::existing(views, aggregate_id)?;
                view.balance -= payload.amount;
                view.version = sequence_number;
            }
            AccountEventKind::AccountClosed(_) => {
                let view = Self::existing(views, aggregate_id)?;
                view.closed = true;
                view.version = sequence_number;
            }
        }
        Ok(())
    }

    fn existing(
        views: &mut HashMap<Uuid, AccountView>,
        aggregate_id: Uuid,
    ) -> Result<&mut AccountView, DomainError> {
        views.get_mut(&aggregate_id).ok_or_else(|| {
            DomainError::Infrastructure(format!(
                "mutation event arrived for account {aggregate_id} with no view"
            ))
        })
    }

    fn read_state(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, ProjectionState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Infrastructure("account view lock poisoned".into()))
    }

    fn write_state(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, ProjectionState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Infrastructure("account view lock poisoned".into()))
    }
}
