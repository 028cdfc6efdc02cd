//! Fixed-window request limiter.
//!
//! An explicit, injected component rather than ambient global state: the
//! server builds one [`RateLimiter`] from configuration and threads it
//! through [`crate::AppState`]. Eviction policy is fixed-window per key;
//! expired windows are swept on every check, so the map never outgrows the
//! set of keys active within one window.

use std::{
  collections::HashMap,
  sync::Mutex,
  time::{Duration, Instant},
};

struct Entry {
  count:    u32,
  reset_at: Instant,
}

/// Outcome of one [`RateLimiter::check`].
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
  pub allowed:   bool,
  /// Requests left in the current window.
  pub remaining: u32,
  /// Time until the current window resets.
  pub reset_in:  Duration,
}

pub struct RateLimiter {
  max_requests: u32,
  window:       Duration,
  entries:      Mutex<HashMap<String, Entry>>,
}

impl RateLimiter {
  pub fn new(max_requests: u32, window: Duration) -> Self {
    Self {
      max_requests,
      window,
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Count one request against `key` and decide whether it may proceed.
  pub fn check(&self, key: &str) -> RateDecision {
    let now = Instant::now();
    let mut entries = self
      .entries
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());

    // Sweep expired windows before looking at the current key.
    entries.retain(|_, entry| entry.reset_at > now);

    let entry = entries.entry(key.to_owned()).or_insert(Entry {
      count:    0,
      reset_at: now + self.window,
    });

    let reset_in = entry.reset_at.saturating_duration_since(now);

    if entry.count >= self.max_requests {
      return RateDecision { allowed: false, remaining: 0, reset_in };
    }

    entry.count += 1;
    RateDecision {
      allowed: true,
      remaining: self.max_requests - entry.count,
      reset_in,
    }
  }

  #[cfg(test)]
  fn tracked_keys(&self) -> usize {
    self
      .entries
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .len()
  }
}
