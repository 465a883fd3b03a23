//! Application layer for the Product context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
