//! Application layer for the Account context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
