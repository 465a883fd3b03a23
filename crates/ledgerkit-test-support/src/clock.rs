//! Test clock — a `Clock` pinned to a fixed instant.

use chrono::{DateTime, Utc};
use ledgerkit_core::clock::Clock;

/// A clock that always returns the instant it was constructed with.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
