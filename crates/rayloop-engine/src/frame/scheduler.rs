/// "Run the loop once more" primitive.
///
/// A render loop re-arms itself by calling `schedule_next` once at construction and
/// once at the end of every successful tick; it never loops synchronously. The host
/// decides when an armed tick actually runs (usually on the next display refresh).
pub trait Scheduler {
    /// Requests one more tick.
    fn schedule_next(&mut self);

    /// Drops any armed tick and refuses further ones.
    fn cancel(&mut self);
}

/// Deterministic scheduler driven by the caller.
///
/// Armed ticks are counted; the driver pops them with [`take_pending`](Self::take_pending)
/// and runs the loop itself. Used by tests and the headless driver.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: u32,
    requested: u64,
    cancelled: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops one armed tick, if any.
    pub fn take_pending(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    /// Ticks currently armed and not yet taken.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Total `schedule_next` calls accepted so far.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        if self.cancelled {
            return;
        }
        self.pending += 1;
        self.requested += 1;
    }

    fn cancel(&mut self) {
        self.pending = 0;
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_ticks_are_popped_in_order() {
        let mut s = ManualScheduler::new();
        assert!(!s.take_pending());

        s.schedule_next();
        s.schedule_next();
        assert_eq!(s.pending(), 2);
        assert!(s.take_pending());
        assert!(s.take_pending());
        assert!(!s.take_pending());
        assert_eq!(s.requested(), 2);
    }

    #[test]
    fn cancel_drops_armed_ticks_and_ignores_new_ones() {
        let mut s = ManualScheduler::new();
        s.schedule_next();
        s.cancel();
        assert!(s.is_cancelled());
        assert!(!s.take_pending());

        s.schedule_next();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.requested(), 1);
    }
}
