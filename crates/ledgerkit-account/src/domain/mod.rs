//! Domain layer for the Account context.

pub mod aggregates;
pub mod commands;
pub mod events;
