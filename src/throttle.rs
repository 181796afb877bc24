//! Fixed-delay pacing for outbound store calls.
//!
//! Every remote call is preceded by [`Throttler::wait_turn`], and every failed
//! call is followed by [`Throttler::cool_down`]. There is no burst allowance
//! and no adaptive backoff: both delays are constant for the whole run.

use std::thread;
use std::time::Duration;

pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_FAILURE_COOLDOWN: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttler {
    interval: Duration,
    cooldown: Duration,
}

impl Throttler {
    pub fn new(interval: Duration, cooldown: Duration) -> Self {
        Self { interval, cooldown }
    }

    /// Blocks for the request interval, regardless of how the last call went.
    pub fn wait_turn(&self) {
        pause(self.interval);
    }

    /// Blocks for the failure cooldown.
    pub fn cool_down(&self) {
        pause(self.cooldown);
    }
}

impl Default for Throttler {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL, DEFAULT_FAILURE_COOLDOWN)
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn default_intervals() {
        assert_eq!(
            Throttler::default(),
            Throttler::new(Duration::from_secs(1), Duration::from_secs(10))
        );
    }

    #[test]
    fn wait_turn_blocks_for_interval() {
        let throttler = Throttler::new(Duration::from_millis(20), Duration::ZERO);
        let start = Instant::now();
        throttler.wait_turn();
        throttler.wait_turn();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn cool_down_blocks_for_cooldown() {
        let throttler = Throttler::new(Duration::ZERO, Duration::from_millis(25));
        let start = Instant::now();
        throttler.cool_down();
        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
