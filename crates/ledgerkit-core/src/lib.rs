//! Ledgerkit Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: aggregate roots, domain events, commands, the event
//! store contract, and the domain error taxonomy. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod store;
