//! Domain layer for the Product context.

pub mod aggregates;
pub mod commands;
pub mod events;
