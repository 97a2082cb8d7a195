use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Running statistics for one route, updated lock-free.
///
/// All durations are kept as nanoseconds. Concurrent samples may race on the extremes; the compare-and-swap
/// loops retry until the stored value is no longer beaten, so `max` and `min` stay true extremes of the
/// samples seen.
#[derive(Debug)]
pub struct Counter {
    count: AtomicU64,
    tot: AtomicU64,
    max: AtomicU64,
    min: AtomicU64,
    before_tot: AtomicU64,
    after_tot: AtomicU64,
}

impl Counter {
    pub(crate) fn new() -> Counter {
        Counter {
            count: AtomicU64::new(0),
            tot: AtomicU64::new(0),
            max: AtomicU64::new(0),
            // The first sample always lowers it.
            min: AtomicU64::new(u64::MAX),
            before_tot: AtomicU64::new(0),
            after_tot: AtomicU64::new(0),
        }
    }

    /// Records one request.
    ///
    /// * `started` - the request entered the router.
    /// * `routing_done` - the pre middlewares ran and the route was resolved.
    /// * `handler_start` - the post middlewares handed over to the route handler.
    /// * `finished` - the response was produced.
    pub fn accumulate(&self, started: Instant, routing_done: Instant, handler_start: Instant, finished: Instant) {
        let d = nanos(finished.saturating_duration_since(started));
        let before = nanos(routing_done.saturating_duration_since(started));
        let after = nanos(finished.saturating_duration_since(handler_start));

        self.tot.fetch_add(d, Ordering::Relaxed);
        self.before_tot.fetch_add(before, Ordering::Relaxed);
        self.after_tot.fetch_add(after, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let mut max = self.max.load(Ordering::Relaxed);
        while d > max {
            match self.max.compare_exchange_weak(max, d, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(current) => max = current,
            }
        }

        let mut min = self.min.load(Ordering::Relaxed);
        while d < min {
            match self.min.compare_exchange_weak(min, d, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(current) => min = current,
            }
        }
    }

    /// Number of recorded requests.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Accumulated total time.
    pub fn tot(&self) -> Duration {
        Duration::from_nanos(self.tot.load(Ordering::Relaxed))
    }

    /// Worst time of all requests.
    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max.load(Ordering::Relaxed))
    }

    /// Best time of all requests, `Duration::ZERO` before the first sample.
    pub fn min(&self) -> Duration {
        match self.min.load(Ordering::Relaxed) {
            u64::MAX => Duration::ZERO,
            min => Duration::from_nanos(min),
        }
    }

    /// Accumulated time spent before the route was resolved.
    pub fn before_tot(&self) -> Duration {
        Duration::from_nanos(self.before_tot.load(Ordering::Relaxed))
    }

    /// Accumulated time spent in the route handlers.
    pub fn after_tot(&self) -> Duration {
        Duration::from_nanos(self.after_tot.load(Ordering::Relaxed))
    }
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
