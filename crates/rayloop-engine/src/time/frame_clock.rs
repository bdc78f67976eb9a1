use std::fmt;

/// Default minimum time between two frame-rate publications, in milliseconds.
pub const DEFAULT_NOTIFY_INTERVAL_MS: f64 = 250.0;

/// Scale of the per-tick rate hint (`RATE_HINT_SCALE / ms since last publication`).
const RATE_HINT_SCALE: f64 = 3.0;

/// Smoothed frame rate produced by a publication.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRate {
    /// Frames per second averaged over the publication window.
    pub hz: f64,
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}fps", self.hz)
    }
}

/// Frame clock with a publication-gated frame-rate estimator.
///
/// Timestamps are plain milliseconds on a monotonic timeline supplied by the caller
/// (see [`MonotonicClock`](super::MonotonicClock)); the clock never samples time itself,
/// which keeps it deterministic under test.
///
/// Every `tick` adds the inter-tick delta to a running window. Once more than
/// `interval` milliseconds have passed since the previous publication, the window is
/// averaged into a [`FrameRate`] and reset. Between publications the window only grows.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: f64,
    last_notify: f64,
    interval: f64,

    running_sum: f64,
    running_samples: u32,

    rate_hint: f64,
    now: f64,
    last_published: Option<FrameRate>,
}

impl FrameClock {
    /// Creates a clock whose first delta is measured from `start`.
    pub fn new(interval: f64, start: f64) -> Self {
        Self {
            last_tick: start,
            last_notify: start,
            interval,
            running_sum: 0.0,
            running_samples: 0,
            rate_hint: 1.0,
            now: start,
            last_published: None,
        }
    }

    /// Rebaselines both timestamps at `now` and drops the running window.
    ///
    /// Useful when resuming from suspension, where the first delta would otherwise
    /// swallow the whole pause.
    pub fn reset(&mut self, now: f64) {
        self.last_tick = now;
        self.last_notify = now;
        self.now = now;
        self.running_sum = 0.0;
        self.running_samples = 0;
    }

    /// Advances the clock to `now`.
    ///
    /// Returns the published rate when this tick crossed the publication interval.
    /// Zero or negative deltas are accumulated as-is.
    pub fn tick(&mut self, now: f64) -> Option<FrameRate> {
        self.now = now;
        self.running_sum += now - self.last_tick;
        self.running_samples += 1;
        self.last_tick = now;

        let since_notify = now - self.last_notify;
        self.rate_hint = RATE_HINT_SCALE / since_notify;

        if since_notify > self.interval {
            self.publish(now)
        } else {
            None
        }
    }

    /// Averages the running window into a rate and starts a new window at `now`.
    ///
    /// With an empty window nothing is published and no state changes.
    pub fn publish(&mut self, now: f64) -> Option<FrameRate> {
        if self.running_samples == 0 {
            return None;
        }

        let avg_frame = self.running_sum / f64::from(self.running_samples);
        let rate = FrameRate {
            hz: 1000.0 / avg_frame,
        };

        self.last_notify = now;
        self.running_sum = 0.0;
        self.running_samples = 0;
        self.last_published = Some(rate);

        Some(rate)
    }

    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    pub fn last_notify(&self) -> f64 {
        self.last_notify
    }

    /// Timestamp of the latest tick.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn running_sum(&self) -> f64 {
        self.running_sum
    }

    pub fn running_samples(&self) -> u32 {
        self.running_samples
    }

    /// Cheap per-tick rate hint, overwritten on every tick.
    pub fn rate_hint(&self) -> f64 {
        self.rate_hint
    }

    pub fn last_published(&self) -> Option<FrameRate> {
        self.last_published
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_INTERVAL_MS, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_tick_follows_each_timestamp() {
        let mut clock = FrameClock::new(250.0, 0.0);
        for now in [16.0, 33.0, 50.5, 67.0, 84.25] {
            clock.tick(now);
            assert_eq!(clock.last_tick(), now);
            assert_eq!(clock.now(), now);
        }
    }

    #[test]
    fn window_accumulates_until_interval_is_exceeded() {
        let mut clock = FrameClock::new(250.0, 0.0);

        let mut expected_sum = 0.0;
        for (i, now) in [50.0, 100.0, 150.0, 200.0, 250.0].into_iter().enumerate() {
            assert!(clock.tick(now).is_none());
            expected_sum += 50.0;
            assert_eq!(clock.running_samples(), i as u32 + 1);
            assert_eq!(clock.running_sum(), expected_sum);
            assert_eq!(clock.last_notify(), 0.0);
        }

        // Exactly at the interval is not enough; strictly greater publishes.
        let rate = clock.tick(251.0).expect("published");
        assert!((rate.hz - 1000.0 / (251.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn publication_resets_the_window() {
        let mut clock = FrameClock::new(250.0, 0.0);
        clock.tick(100.0);
        clock.tick(200.0);
        assert!(clock.tick(300.0).is_some());

        assert_eq!(clock.running_samples(), 0);
        assert_eq!(clock.running_sum(), 0.0);
        assert_eq!(clock.last_notify(), 300.0);
        assert_eq!(clock.last_tick(), 300.0);
    }

    #[test]
    fn four_ten_ms_frames_publish_one_hundred_fps() {
        let mut clock = FrameClock::new(35.0, 0.0);
        for now in [10.0, 20.0, 30.0] {
            assert!(clock.tick(now).is_none());
        }
        let rate = clock.tick(40.0).expect("published");
        assert_eq!(rate.hz, 100.0);
        assert_eq!(rate.to_string(), "100.00fps");
        assert_eq!(clock.last_published(), Some(rate));
    }

    #[test]
    fn publish_with_empty_window_is_skipped() {
        let mut clock = FrameClock::new(250.0, 0.0);
        assert!(clock.publish(500.0).is_none());
        assert_eq!(clock.last_notify(), 0.0);
        assert!(clock.last_published().is_none());

        clock.tick(300.0);
        assert!(clock.publish(301.0).is_none());
    }

    #[test]
    fn rate_hint_tracks_time_since_last_publication() {
        let mut clock = FrameClock::new(250.0, 0.0);
        clock.tick(30.0);
        assert!((clock.rate_hint() - 0.1).abs() < 1e-12);
        clock.tick(60.0);
        assert!((clock.rate_hint() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn non_increasing_timestamps_are_accumulated() {
        let mut clock = FrameClock::new(250.0, 100.0);
        clock.tick(100.0);
        clock.tick(90.0);
        assert_eq!(clock.running_samples(), 2);
        assert_eq!(clock.running_sum(), -10.0);
        assert_eq!(clock.last_tick(), 90.0);
    }

    #[test]
    fn reset_rebaselines_timestamps() {
        let mut clock = FrameClock::new(250.0, 0.0);
        clock.tick(16.0);
        clock.reset(5_000.0);
        assert_eq!(clock.running_samples(), 0);
        assert!(clock.tick(5_016.0).is_none());
        assert_eq!(clock.running_sum(), 16.0);
    }

    #[test]
    fn rate_formats_with_two_decimals() {
        assert_eq!(FrameRate { hz: 59.9401 }.to_string(), "59.94fps");
        assert_eq!(FrameRate { hz: 60.0 }.to_string(), "60.00fps");
    }
}
