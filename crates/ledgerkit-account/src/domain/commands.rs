//! Commands for the Account context.

use ledgerkit_core::command::Command;
use uuid::Uuid;

/// Command to create a new account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The account owner's name.
    pub owner: String,
    /// The opening balance, in minor currency units.
    pub initial_balance: i64,
}

impl Command for CreateAccount {
    fn command_type(&self) -> &'static str {
        "account.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to deposit money into an account.
#[derive(Debug, Clone)]
pub struct DepositMoney {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target account identifier.
    pub account_id: Uuid,
    /// The amount to deposit, in minor currency units.
    pub amount: i64,
}

impl Command for DepositMoney {
    fn command_type(&self) -> &'static str {
        "account.deposit_money"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to withdraw money from an account.
#[derive(Debug, Clone)]
pub struct WithdrawMoney {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target account identifier.
    pub account_id: Uuid,
    /// The amount to withdraw, in minor currency units.
    pub amount: i64,
}

impl Command for WithdrawMoney {
    fn command_type(&self) -> &'static str {
        "account.withdraw_money"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to close an account.
#[derive(Debug, Clone)]
pub struct CloseAccount {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target account identifier.
    pub account_id: Uuid,
}

impl Command for CloseAccount {
    fn command_type(&self) -> &'static str {
        "account.close"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Closed set of Account commands, dispatched by tag in the service.
#[derive(Debug, Clone)]
pub enum AccountCommand {
    /// Create a new account.
    Create(CreateAccount),
    /// Deposit money.
    Deposit(DepositMoney),
    /// Withdraw money.
    Withdraw(WithdrawMoney),
    /// Close an account.
    Close(CloseAccount),
}
