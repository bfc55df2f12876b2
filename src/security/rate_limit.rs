//! Sliding-log rate limiting.
//!
//! Each client identifier maps to the timestamps of its recently admitted
//! requests. A check drops timestamps older than the window, rejects when
//! the remaining count has reached the limit, and otherwise records `now`.
//!
//! Idle identifiers are purged by an inline sweep that runs on a small,
//! configurable fraction of checks instead of on a background timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use rand::Rng;

/// Source of wall-clock time in milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Clock backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Timestamps for one client, plus the window its last check used.
#[derive(Debug, Default)]
struct ClientWindow {
    timestamps: Vec<u64>,
    window_ms: u64,
}

/// In-memory sliding-log limiter shared by every handler.
pub struct SlidingWindowLimiter {
    windows: DashMap<String, ClientWindow>,
    clock: Box<dyn Clock>,
    sweep_probability: f64,
}

impl SlidingWindowLimiter {
    /// Create a limiter on the system clock.
    pub fn new(sweep_probability: f64) -> Self {
        Self::with_clock(SystemClock, sweep_probability)
    }

    /// Create a limiter with an explicit clock.
    pub fn with_clock(clock: impl Clock + 'static, sweep_probability: f64) -> Self {
        Self {
            windows: DashMap::new(),
            clock: Box::new(clock),
            sweep_probability: sweep_probability.clamp(0.0, 1.0),
        }
    }

    /// Admit or reject one request from `client`.
    ///
    /// Rejected requests are not recorded.
    pub fn admit(&self, client: &str, limit: usize, window: Duration) -> bool {
        let now = self.clock.now_millis();
        let window_ms = window.as_millis() as u64;

        let admitted = {
            let mut entry = self.windows.entry(client.to_string()).or_default();
            entry.window_ms = window_ms;
            entry.timestamps.retain(|&t| now.saturating_sub(t) < window_ms);

            if entry.timestamps.len() >= limit {
                false
            } else {
                entry.timestamps.push(now);
                true
            }
        };

        // The entry guard above must be released before sweeping
        if self.sweep_probability > 0.0 && rand::thread_rng().gen_bool(self.sweep_probability) {
            self.sweep(window);
        }

        admitted
    }

    /// Remove every client whose timestamps have all aged out.
    ///
    /// Each client is pruned with the longer of `window` and the window its
    /// own last check used, so a sweep triggered by a short-window route
    /// never drops history a longer-window route still needs.
    pub fn sweep(&self, window: Duration) {
        let now = self.clock.now_millis();
        let window_ms = window.as_millis() as u64;
        let before = self.windows.len();

        self.windows.retain(|_, entry| {
            let keep_ms = window_ms.max(entry.window_ms);
            entry.timestamps.retain(|&t| now.saturating_sub(t) < keep_ms);
            !entry.timestamps.is_empty()
        });

        let purged = before.saturating_sub(self.windows.len());
        if purged > 0 {
            tracing::debug!(purged, remaining = self.windows.len(), "Swept idle rate-limit windows");
        }
    }

    /// Number of identifiers currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Number of timestamps recorded for `client` (unpruned).
    pub fn tracked_requests(&self, client: &str) -> usize {
        self.windows
            .get(client)
            .map(|entry| entry.timestamps.len())
            .unwrap_or(0)
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(0.01)
    }
}
