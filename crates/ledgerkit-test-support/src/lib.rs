//! Shared test mocks and utilities for the Ledgerkit event-sourcing engine.

mod clock;
mod store;

pub use clock::FixedClock;
pub use store::{EmptyEventStore, FailingEventStore, RecordingEventStore};
