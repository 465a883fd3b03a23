//! Ledgerkit — Account bounded context.
//!
//! Write side: `CreateAccount`, `DepositMoney`, `WithdrawMoney` and
//! `CloseAccount` commands handled by [`application::command_handlers::AccountService`].
//! Read side: [`application::projections::AccountReadModel`], a denormalized
//! view derived only from the event stream.

pub mod application;
pub mod domain;
