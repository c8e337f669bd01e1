/// Bounded exponential backoff.
///
/// `attempt` is 1-based: the delay before the first retry is
/// `delay_for(1) == initial_delay_ms`. Once `max_attempts` retries have been
/// handed out, `delay_for` returns `None` and the caller gives up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay_ms: u32,
    pub factor: f64,
    pub max_delay_ms: u32,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            factor: 2.0,
            max_delay_ms: 2_000,
            max_attempts: Some(20),
        }
    }
}

impl RetryPolicy {
    /// Fixed-interval polling with no cap.
    pub fn unbounded_fixed(delay_ms: u32) -> Self {
        Self {
            initial_delay_ms: delay_ms,
            factor: 1.0,
            max_delay_ms: delay_ms,
            max_attempts: None,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Option<u32> {
        if attempt == 0 {
            return Some(0);
        }
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }
        let exp = self.factor.max(1.0).powi(attempt.saturating_sub(1) as i32);
        let delay = f64::from(self.initial_delay_ms) * exp;
        Some(delay.min(f64::from(self.max_delay_ms)) as u32)
    }
}
