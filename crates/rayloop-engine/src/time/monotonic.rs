use std::time::Instant;

/// Millisecond timestamp source anchored at construction.
///
/// Values are fractional milliseconds since the clock was created and never decrease.
#[derive(Debug, Copy, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created.
    pub fn now_ms(&self) -> f64 {
        Instant::now()
            .saturating_duration_since(self.origin)
            .as_secs_f64()
            * 1000.0
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_never_decrease() {
        let clock = MonotonicClock::new();
        let mut prev = clock.now_ms();
        assert!(prev >= 0.0);
        for _ in 0..100 {
            let now = clock.now_ms();
            assert!(now >= prev);
            prev = now;
        }
    }
}
