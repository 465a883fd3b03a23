//! Domain events for the Account context.

use ledgerkit_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when an account is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreated {
    /// The account identifier.
    pub account_id: Uuid,
    /// The account owner's name.
    pub owner: String,
    /// The opening balance, in minor currency units.
    pub initial_balance: i64,
}

/// Emitted when money is deposited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyDeposited {
    /// The account identifier.
    pub account_id: Uuid,
    /// The deposited amount, in minor currency units.
    pub amount: i64,
}

/// Emitted when money is withdrawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyWithdrawn {
    /// The account identifier.
    pub account_id: Uuid,
    /// The withdrawn amount, in minor currency units.
    pub amount: i64,
}

/// Emitted when an account is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountClosed {
    /// The account identifier.
    pub account_id: Uuid,
}

/// Event type identifier for [`AccountCreated`].
pub const ACCOUNT_CREATED_EVENT_TYPE: &str = "account.created";

/// Event type identifier for [`MoneyDeposited`].
pub const MONEY_DEPOSITED_EVENT_TYPE: &str = "account.money_deposited";

/// Event type identifier for [`MoneyWithdrawn`].
pub const MONEY_WITHDRAWN_EVENT_TYPE: &str = "account.money_withdrawn";

/// Event type identifier for [`AccountClosed`].
pub const ACCOUNT_CLOSED_EVENT_TYPE: &str = "account.closed";

/// Event payload variants for the Account context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountEventKind {
    /// An account has been created.
    AccountCreated(AccountCreated),
    /// Money has been deposited.
    MoneyDeposited(MoneyDeposited),
    /// Money has been withdrawn.
    MoneyWithdrawn(MoneyWithdrawn),
    /// An account has been closed.
    AccountClosed(AccountClosed),
}

/// Domain event envelope for the Account context.
#[derive(Debug, Clone)]
pub struct AccountEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AccountEventKind,
}

impl DomainEvent for AccountEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            AccountEventKind::AccountCreated(_) => ACCOUNT_CREATED_EVENT_TYPE,
            AccountEventKind::MoneyDeposited(_) => MONEY_DEPOSITED_EVENT_TYPE,
            AccountEventKind::MoneyWithdrawn(_) => MONEY_WITHDRAWN_EVENT_TYPE,
            AccountEventKind::AccountClosed(_) => ACCOUNT_CLOSED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("AccountEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
