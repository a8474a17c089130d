use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// Sweep stale entries once every this many checks
const SWEEP_EVERY: u64 = 256;

// Rate limit entry - one counting window per client key
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Deny { retry_after: Duration },
}

// Fixed-window rate limiter keyed by client.
//
// Windows are replaced lazily: an expired window is reset on the next
// request from that key, there is no background timer. Near a window
// boundary a client can get up to 2x max_count requests through (the
// tail of one window plus the head of the next) - accepted limitation
// of the fixed-window scheme.
pub struct RateLimiter {
    max_count: u32,
    window: Duration,
    entries: DashMap<String, RateLimitEntry>,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(max_count: u32, window: Duration) -> Self {
        Self {
            max_count,
            window,
            entries: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // Number of client keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    // Admit or deny one request from `key` observed at `now`.
    //
    // The read-modify-write on the entry happens under the DashMap shard
    // lock, so two simultaneous requests from the same key cannot both
    // take the last slot or race the window reset. The lock is only held
    // for this decision, never across the protected operation.
    pub fn check(&self, key: &str, now: Instant) -> Verdict {
        self.maybe_sweep(now);

        match self.entries.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry {
                    count: 1,
                    window_start: now,
                });
                Verdict::Admit
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                let elapsed = now.duration_since(entry.window_start);

                // Window expired? Reset it (boundary inclusive)
                if elapsed >= self.window {
                    entry.count = 1;
                    entry.window_start = now;
                    return Verdict::Admit;
                }

                // Over limit? Deny and leave the entry untouched, so a
                // denied request never extends the window or the count
                if entry.count >= self.max_count {
                    return Verdict::Deny {
                        retry_after: self.window - elapsed,
                    };
                }

                entry.count += 1;
                Verdict::Admit
            }
        }
    }

    // Drop entries whose window already expired. They would be reset on
    // their next request anyway, so removal cannot change any verdict;
    // this only keeps the map from growing with one-off client keys.
    fn maybe_sweep(&self, now: Instant) {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY != SWEEP_EVERY - 1 {
            return;
        }
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < self.window);
    }
}

// Whole seconds for the Retry-After header, rounded up
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    retry_after.as_millis().div_ceil(1000) as u64
}
