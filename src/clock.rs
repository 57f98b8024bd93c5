use chrono::{NaiveDateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time source for the session engine.
///
/// `now` is monotonic and only meaningful as a difference between two reads.
/// `wall` is the calendar time used to stamp score records.
pub trait Clock {
    fn now(&self) -> Duration;
    fn wall(&self) -> NaiveDateTime;
}

/// Production clock backed by `Instant` and UTC wall time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Hand-driven clock for tests and replays.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    offset: Rc<Cell<Duration>>,
    base: NaiveDateTime,
}

impl ManualClock {
    pub fn new(base: NaiveDateTime) -> Self {
        Self {
            offset: Rc::new(Cell::new(Duration::ZERO)),
            base,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Moves the clock to `to`; earlier values are ignored to keep `now` monotonic.
    pub fn set(&self, to: Duration) {
        if to > self.offset.get() {
            self.offset.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.offset.get()
    }

    fn wall(&self) -> NaiveDateTime {
        self.base + chrono::Duration::milliseconds(self.offset.get().as_millis() as i64)
    }
}
