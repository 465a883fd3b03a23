//! Ledgerkit Event Store — concrete [`EventStore`] implementations.
//!
//! The store object is constructed once at process start and passed into
//! every application service, so tests and production can substitute a
//! different backend behind the same trait.
//!
//! [`EventStore`]: ledgerkit_core::store::EventStore

pub mod in_memory;

pub use in_memory::InMemoryEventStore;
