use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

pub const DEFAULT_AFTER_ACTIVATION: Duration = Duration::from_millis(1000);
pub const DEFAULT_RENDER: Duration = Duration::from_millis(2000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when slept on.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
    slept: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
            slept: RefCell::new(Vec::new()),
        }
    }

    pub fn total_slept(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
        self.slept.borrow_mut().push(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleMode {
    Poll,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub mode: SettleMode,
    pub after_activation: Duration,
    pub render: Duration,
    pub poll_interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            mode: SettleMode::Poll,
            after_activation: DEFAULT_AFTER_ACTIVATION,
            render: DEFAULT_RENDER,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WaitOutcome {
    Ready { waited_ms: u64 },
    TimedOut { waited_ms: u64 },
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }
}

/// The condition is checked once before any sleep, so an already-ready
/// condition returns without waiting.
pub fn wait_until<C, F>(
    clock: &C,
    timeout: Duration,
    poll_interval: Duration,
    mut ready: F,
) -> WaitOutcome
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let started = clock.now();
    loop {
        let elapsed = clock.now().saturating_duration_since(started);
        if ready() {
            return WaitOutcome::Ready {
                waited_ms: millis(elapsed),
            };
        }
        if elapsed >= timeout {
            return WaitOutcome::TimedOut {
                waited_ms: millis(elapsed),
            };
        }
        let remaining = timeout - elapsed;
        let step = if poll_interval.is_zero() {
            remaining
        } else {
            poll_interval.min(remaining)
        };
        clock.sleep(step);
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_condition_returns_without_sleeping() {
        let clock = ManualClock::new();
        let outcome = wait_until(
            &clock,
            Duration::from_secs(2),
            DEFAULT_POLL_INTERVAL,
            || true,
        );
        assert_eq!(outcome, WaitOutcome::Ready { waited_ms: 0 });
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn never_ready_times_out_after_full_duration() {
        let clock = ManualClock::new();
        let outcome = wait_until(
            &clock,
            Duration::from_millis(1000),
            Duration::from_millis(300),
            || false,
        );
        assert_eq!(outcome, WaitOutcome::TimedOut { waited_ms: 1000 });
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(300),
                Duration::from_millis(300),
                Duration::from_millis(300),
                Duration::from_millis(100),
            ]
        );
    }

    #[test]
    fn becomes_ready_on_later_poll() {
        let clock = ManualClock::new();
        let mut polls = 0;
        let outcome = wait_until(
            &clock,
            Duration::from_secs(2),
            Duration::from_millis(250),
            || {
                polls += 1;
                polls == 3
            },
        );
        assert_eq!(outcome, WaitOutcome::Ready { waited_ms: 500 });
    }

    #[test]
    fn zero_poll_interval_sleeps_out_the_remainder() {
        let clock = ManualClock::new();
        let outcome = wait_until(&clock, Duration::from_millis(700), Duration::ZERO, || false);
        assert_eq!(outcome, WaitOutcome::TimedOut { waited_ms: 700 });
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(700)]);
    }
}
