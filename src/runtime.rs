use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the frame loop
#[derive(Clone, Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait InputSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermInputSource {
    rx: Receiver<InputEvent>,
}

impl CrosstermInputSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // key release events would double every strike on some terminals
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(InputEvent::Key(key))
                }
                Ok(CtEvent::Resize(w, h)) => tx.send(InputEvent::Resize(w, h)),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInputSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
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

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestInputSource {
    rx: Receiver<InputEvent>,
}

impl TestInputSource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for TestInputSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: InputSource, T: Ticker> {
    input: E,
    ticker: T,
    next_frame: Instant,
}

impl<E: InputSource, T: Ticker> Runner<E, T> {
    pub fn new(input: E, ticker: T) -> Self {
        let next_frame = Instant::now() + ticker.interval();
        Self {
            input,
            ticker,
            next_frame,
        }
    }

    /// Blocks until the next input event or the next frame deadline,
    /// whichever comes first. Input does not postpone frames.
    pub fn step(&mut self) -> InputEvent {
        let now = Instant::now();
        if now >= self.next_frame {
            self.next_frame = now + self.ticker.interval();
            return InputEvent::Tick;
        }

        match self.input.recv_timeout(self.next_frame - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.next_frame = Instant::now() + self.ticker.interval();
                InputEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(self.next_frame.saturating_duration_since(Instant::now()));
                self.next_frame = Instant::now() + self.ticker.interval();
                InputEvent::Tick
            }
        }
    }
}

/// Measures wall time between frames in whole milliseconds, carrying the
/// sub-millisecond remainder so no time is lost across frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    carry: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }

    pub fn elapsed_ms(&mut self) -> u64 {
        let now = Instant::now();
        let total = self.carry + now.duration_since(self.last);
        self.last = now;
        let ms = total.as_millis() as u64;
        self.carry = total - Duration::from_millis(ms);
        ms
    }

    /// Forget time spent while frames were not being produced
    pub fn restart(&mut self) {
        self.last = Instant::now();
        self.carry = Duration::ZERO;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestInputSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        match runner.step() {
            InputEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(InputEvent::Resize(100, 40)).unwrap();
        let es = TestInputSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(200));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            InputEvent::Resize(100, 40) => {}
            other => panic!("expected Resize event, got {other:?}"),
        }
    }

    #[test]
    fn disconnected_source_still_ticks() {
        let (tx, rx) = mpsc::channel::<InputEvent>();
        drop(tx);
        let mut runner = Runner::new(TestInputSource::new(rx), FixedTicker::new(Duration::from_millis(1)));
        assert!(matches!(runner.step(), InputEvent::Tick));
    }

    #[test]
    fn frame_clock_accumulates() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(15));
        let ms = clock.elapsed_ms();
        assert!(ms >= 15, "elapsed {ms}");
        clock.restart();
        assert!(clock.elapsed_ms() < 15);
    }
}
