// Client-side rate limiting for card creation.
//
// The service allows fewer than 40 requests every 5 seconds, so the
// importer pauses for a fixed 125ms after each request. The importer only
// sees the `Throttle` trait; a smarter strategy can slot in behind it.

use std::thread;
use std::time::Duration;

use tracing::trace;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(125);

pub trait Throttle {
    /// Called once after every create request, whatever its outcome.
    fn wait(&mut self);
}

/// Sleeps for the same duration every time. Ignores latency and any rate
/// limit headers the server sends back.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        FixedDelay { delay }
    }
}

impl Throttle for FixedDelay {
    fn wait(&mut self) {
        trace!(delay_ms = self.delay.as_millis() as u64, "throttling");
        thread::sleep(self.delay);
    }
}
