use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

/// Default interval between ticks while a session runs
pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum DriverEvent {
    Key(KeyEvent),
    /// Left mouse button pressed at a terminal cell
    Click { column: u16, row: u16 },
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DriverEvent, RecvTimeoutError>;
}

/// Production event source using crossterm. Mouse capture must be enabled
/// on the terminal for clicks to arrive.
pub struct CrosstermEventSource {
    rx: Receiver<DriverEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => Some(DriverEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(DriverEvent::Click {
                        column: mouse.column,
                        row: mouse.row,
                    }),
                    _ => None,
                },
                Ok(CtEvent::Resize(_, _)) => Some(DriverEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DriverEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DriverEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DriverEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DriverEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks keep their fixed schedule however busy the input is: once a tick is
/// due it is returned before any pending event.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Returns the next event, or Tick once the tick deadline has passed
    pub fn step(&self) -> DriverEvent {
        let now = Instant::now();
        let due = self.next_tick.get();
        if now >= due {
            self.schedule_after(due, now);
            return DriverEvent::Tick;
        }

        match self.event_source.recv_timeout(due - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_after(due, Instant::now());
                DriverEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                let now = Instant::now();
                self.schedule_after(now, now);
                DriverEvent::Tick
            }
        }
    }

    // Missed ticks are dropped rather than delivered in a burst.
    fn schedule_after(&self, due: Instant, now: Instant) {
        let interval = self.ticker.interval();
        let mut next = due + interval;
        if next <= now {
            next = now + interval;
        }
        self.next_tick.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            DriverEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_clicks() {
        let (tx, rx) = mpsc::channel();
        tx.send(DriverEvent::Click { column: 4, row: 9 }).unwrap();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        match runner.step() {
            DriverEvent::Click { column: 4, row: 9 } => {}
            other => panic!("expected Click event, got {other:?}"),
        }
    }

    #[test]
    fn ticks_keep_their_rate_under_steady_clicks() {
        let (tx, rx) = mpsc::channel();
        let clicker = std::thread::spawn(move || {
            for _ in 0..40 {
                if tx.send(DriverEvent::Click { column: 1, row: 1 }).is_err() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        });

        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(100)),
        );
        let started = Instant::now();
        let (mut ticks, mut clicks) = (0, 0);
        while started.elapsed() < Duration::from_millis(1500) {
            match runner.step() {
                DriverEvent::Tick => ticks += 1,
                DriverEvent::Click { .. } => clicks += 1,
                other => panic!("unexpected event {other:?}"),
            }
        }
        drop(runner);
        clicker.join().unwrap();

        assert!((10..=20).contains(&ticks), "got {ticks} ticks in 1.5 s");
        assert!(clicks >= 20, "got {clicks} clicks in 1.5 s");
    }

    #[test]
    fn overdue_tick_comes_before_pending_click() {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(50)),
        );
        std::thread::sleep(Duration::from_millis(60));
        tx.send(DriverEvent::Click { column: 2, row: 3 }).unwrap();

        assert!(matches!(runner.step(), DriverEvent::Tick));
        assert!(matches!(runner.step(), DriverEvent::Click { column: 2, row: 3 }));
    }

    #[test]
    fn default_ticker_uses_tick_rate() {
        assert_eq!(
            FixedTicker::default().interval(),
            Duration::from_millis(TICK_RATE_MS)
        );
    }
}
