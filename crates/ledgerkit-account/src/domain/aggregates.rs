//! Aggregate roots for the Account context.

use ledgerkit_core::aggregate::AggregateRoot;
use ledgerkit_core::clock::Clock;
use ledgerkit_core::error::DomainError;
use ledgerkit_core::event::EventMetadata;
use uuid::Uuid;

use super::commands::CreateAccount;
use super::events::{
    AccountClosed, AccountCreated, AccountEvent, AccountEventKind, MoneyDeposited, MoneyWithdrawn,
};

/// Lifecycle state of an account. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// The account accepts deposits, withdrawals, and closing.
    Open,
    /// The account rejects every further operation.
    Closed,
}

/// The aggregate root for a bank account.
///
/// State is derived exclusively from the account's own event history; every
/// accepted operation appends exactly one event and advances the version.
#[derive(Debug)]
pub struct Account {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub version: i64,
    /// The account owner's name.
    pub owner: String,
    /// Current balance, in minor currency units. Never negative.
    pub balance: i64,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<AccountEvent>,
}

impl Account {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            owner: String::new(),
            balance: 0,
            status: AccountStatus::Open,
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a new account from a `CreateAccount` command, producing
    /// exactly one `AccountCreated` event at version 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the owner name is blank or the
    /// initial balance is negative.
    pub fn create(command: &CreateAccount, clock: &dyn Clock) -> Result<Self, DomainError> {
        if command.owner.trim().is_empty() {
            return Err(DomainError::Validation("owner must not be empty".into()));
        }
        if command.initial_balance < 0 {
            return Err(DomainError::Validation(
                "initial balance must not be negative".into(),
            ));
        }

        let mut account = Self::new(Uuid::new_v4());
        account.record(
            AccountEventKind::AccountCreated(AccountCreated {
                account_id: account.id,
                owner: command.owner.clone(),
                initial_balance: command.initial_balance,
            }),
            command.correlation_id,
            clock,
        );
        Ok(account)
    }

    /// Reconstitutes an account by replaying its ordered event history.
    ///
    /// Replay leaves the uncommitted buffer empty: loading from history has
    /// no side effect on the store.
    #[must_use]
    pub fn load_from_history(id: Uuid, events: &[AccountEvent]) -> Self {
        let mut account = Self::new(id);
        account.replay(events);
        account
    }

    /// Deposits money into the account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the account is closed or the
    /// amount is not strictly positive.
    pub fn deposit(
        &mut self,
        amount: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        if amount <= 0 {
            return Err(DomainError::Validation(
                "deposit amount must be positive".into(),
            ));
        }

        self.record(
            AccountEventKind::MoneyDeposited(MoneyDeposited {
                account_id: self.id,
                amount,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Withdraws money from the account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the account is closed, the
    /// amount is not strictly positive, or the balance would go negative.
    pub fn withdraw(
        &mut self,
        amount: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        if amount <= 0 {
            return Err(DomainError::Validation(
                "withdrawal amount must be positive".into(),
            ));
        }
        if amount > self.balance {
            return Err(DomainError::Validation("insufficient funds".into()));
        }

        self.record(
            AccountEventKind::MoneyWithdrawn(MoneyWithdrawn {
                account_id: self.id,
                amount,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Closes the account. Only permitted at zero balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the account is already closed
    /// or still carries a balance.
    pub fn close(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.balance != 0 {
            return Err(DomainError::Validation(
                "account balance must be zero to close".into(),
            ));
        }

        self.record(
            AccountEventKind::AccountClosed(AccountClosed { account_id: self.id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status == AccountStatus::Closed {
            return Err(DomainError::Validation("account is closed".into()));
        }
        Ok(())
    }

    /// Buffers a new event and applies it, advancing the version by one.
    fn record(&mut self, kind: AccountEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = AccountEvent {
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

impl AggregateRoot for Account {
    type Event = AccountEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            AccountEventKind::AccountCreated(payload) => {
                self.owner.clone_from(&payload.owner);
                self.balance = payload.initial_balance;
                self.status = AccountStatus::Open;
            }
            AccountEventKind::MoneyDeposited(payload) => {
                self.balance += payload.amount;
            }
            AccountEventKind::MoneyWithdrawn(payload) => {
                self.balance -= payload.amount;
            }
            AccountEventKind::AccountClosed(_) => {
                self.status = AccountStatus::Closed;
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

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledgerkit_core::aggregate::AggregateRoot;
    use ledgerkit_core::error::DomainError;
    use ledgerkit_test_support::FixedClock;
    use uuid::Uuid;

    use super::{Account, AccountStatus};
    use crate::domain::commands::CreateAccount;

    fn test_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn create_account(initial_balance: i64) -> Account {
        let command = CreateAccount {
            correlation_id: Uuid::new_v4(),
            owner: "alice".to_owned(),
            initial_balance,
        };
        Account::create(&command, &test_clock()).unwrap()
    }

    #[test]
    fn test_create_produces_one_event_at_version_one() {
        // Arrange / Act
        let account = create_account(100);

        // Assert
        assert_eq!(account.version, 1);
        assert_eq!(account.balance, 100);
        assert_eq!(account.owner, "alice");
        assert_eq!(account.status, AccountStatus::Open);
        assert_eq!(account.uncommitted_events().len(), 1);
        assert_eq!(account.uncommitted_events()[0].metadata.sequence_number, 1);
    }

    #[test]
    fn test_create_rejects_blank_owner() {
        let command = CreateAccount {
            correlation_id: Uuid::new_v4(),
            owner: "  ".to_owned(),
            initial_balance: 0,
        };

        let result = Account::create(&command, &test_clock());

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "owner must not be empty"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_create_rejects_negative_initial_balance() {
        let command = CreateAccount {
            correlation_id: Uuid::new_v4(),
            owner: "alice".to_owned(),
            initial_balance: -1,
        };

        assert!(matches!(
            Account::create(&command, &test_clock()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_deposit_and_withdraw_advance_version() {
        // Arrange
        let mut account = create_account(100);
        let clock = test_clock();

        // Act
        account.deposit(50, Uuid::new_v4(), &clock).unwrap();
        account.withdraw(30, Uuid::new_v4(), &clock).unwrap();

        // Assert
        assert_eq!(account.balance, 120);
        assert_eq!(account.version, 3);
        assert_eq!(account.uncommitted_events().len(), 3);
    }

    #[test]
    fn test_deposit_rejects_non_positive_amount() {
        let mut account = create_account(100);
        let clock = test_clock();

        for amount in [0, -5] {
            let result = account.deposit(amount, Uuid::new_v4(), &clock);
            match result {
                Err(DomainError::Validation(msg)) => {
                    assert_eq!(msg, "deposit amount must be positive");
                }
                other => panic!("expected Validation, got {other:?}"),
            }
        }

        // Rejections mutate nothing.
        assert_eq!(account.version, 1);
        assert_eq!(account.balance, 100);
        assert_eq!(account.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_withdraw_rejects_insufficient_funds() {
        let mut account = create_account(0);
        let clock = test_clock();

        let result = account.withdraw(10, Uuid::new_v4(), &clock);

        match result {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "insufficient funds"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(account.version, 1);
        assert_eq!(account.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_close_requires_zero_balance() {
        let mut account = create_account(100);
        let clock = test_clock();

        let result = account.close(Uuid::new_v4(), &clock);

        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "account balance must be zero to close");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(account.status, AccountStatus::Open);
    }

    #[test]
    fn test_closed_account_is_terminal() {
        // Arrange
        let mut account = create_account(0);
        let clock = test_clock();
        account.close(Uuid::new_v4(), &clock).unwrap();
        assert_eq!(account.status, AccountStatus::Closed);
        let version_after_close = account.version;

        // Act / Assert — every further operation fails and produces no event.
        assert!(matches!(
            account.deposit(10, Uuid::new_v4(), &clock),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            account.withdraw(10, Uuid::new_v4(), &clock),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            account.close(Uuid::new_v4(), &clock),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(account.version, version_after_close);
    }

    #[test]
    fn test_replay_matches_live_path_and_buffers_nothing() {
        // Arrange — build history through the live command path.
        let mut live = create_account(100);
        let clock = test_clock();
        live.deposit(50, Uuid::new_v4(), &clock).unwrap();
        live.withdraw(30, Uuid::new_v4(), &clock).unwrap();
        let history: Vec<_> = live.uncommitted_events().to_vec();

        // Act — replay the same events from scratch.
        let replayed = Account::load_from_history(live.id, &history);

        // Assert — same state, empty uncommitted buffer.
        assert_eq!(replayed.version, live.version);
        assert_eq!(replayed.balance, live.balance);
        assert_eq!(replayed.owner, live.owner);
        assert_eq!(replayed.status, live.status);
        assert!(replayed.uncommitted_events().is_empty());
    }
}
