//! Millisecond identifiers for saved schedules and reminder intents.

use chrono::Utc;

/// Hands out strictly increasing wall-clock millisecond readings.
///
/// Schedule ids and reminder intent ids are derived from these readings.
/// Two calls inside the same millisecond still get distinct values; an id
/// collision in the persisted collection is a correctness bug, not a case
/// to tolerate.
#[derive(Debug, Default)]
pub struct MillisIdSource {
    last: i64,
}

impl MillisIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique reading: the current millisecond, or one past the
    /// previous reading when the clock has not advanced.
    pub fn next_millis(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last
    }

    pub fn next_id(&mut self) -> String {
        self.next_millis().to_string()
    }
}
