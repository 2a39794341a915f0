use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_POLL: Duration = Duration::from_millis(50);
const MIN_POLL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Elapsed,
    Cancelled,
}

/// The wait between the two reads of a rate-based metric.
pub trait Pause {
    fn pause(&mut self, interval: Duration) -> Wait;
}

/// Sleeps in `poll`-sized slices, checking `cancelled` before each slice, so
/// a cancellation is noticed within one poll rather than one full interval.
pub struct PollingPause<F> {
    poll: Duration,
    cancelled: F,
}

impl<F: FnMut() -> bool> PollingPause<F> {
    pub fn new(poll: Duration, cancelled: F) -> Self {
        PollingPause {
            poll: poll.max(MIN_POLL),
            cancelled,
        }
    }
}

impl PollingPause<fn() -> bool> {
    pub fn uninterruptible(poll: Duration) -> Self {
        PollingPause::new(poll, never as fn() -> bool)
    }
}

impl<F: FnMut() -> bool> Pause for PollingPause<F> {
    fn pause(&mut self, interval: Duration) -> Wait {
        let deadline = Instant::now() + interval;
        loop {
            if (self.cancelled)() {
                return Wait::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                return Wait::Elapsed;
            }
            thread::sleep(self.poll.min(deadline - now));
        }
    }
}

fn never() -> bool {
    false
}
