use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window admission control in front of summarization.
///
/// One instance is built at startup and shared by every request; a single
/// process-wide budget protects the shared upstream AI quota. The prune,
/// check, and insert all happen under one lock acquisition so concurrent
/// checks cannot both observe a free slot and over-admit.
pub struct RateLimiter {
    max_per_window: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_per_window: usize) -> Self {
        RateLimiter {
            max_per_window,
            window: Duration::from_secs(60),
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    /// Admit or reject a request. Rejected requests are not recorded.
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    fn admit_at(&self, now: Instant) -> bool {
        let mut admitted = self.admitted.lock().unwrap();
        while let Some(&oldest) = admitted.front() {
            if now.duration_since(oldest) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }
        if admitted.len() >= self.max_per_window {
            return false;
        }
        admitted.push_back(now);
        true
    }
}
