use std::time::{Duration, Instant};

/// Adds the wall time of a region to a caller-owned accumulator.
///
/// The measurement is taken when the guard drops, so it runs on every exit path
/// of the enclosing block, including `?` and early `return`. The slot is added to,
/// never overwritten; resetting it once per frame is the caller's job.
///
/// Scopes nest freely: an inner scope's time is part of the outer scope's elapsed
/// time, not subtracted from it.
#[must_use = "the region is measured until this guard is dropped"]
pub struct TimeScope<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> TimeScope<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for TimeScope<'_> {
    fn drop(&mut self) {
        *self.slot = self.slot.saturating_add(self.start.elapsed());
    }
}

/// Runs `f` inside a [`TimeScope`] on `slot` and returns its result.
pub fn timed<R>(slot: &mut Duration, f: impl FnOnce() -> R) -> R {
    let _scope = TimeScope::new(slot);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const NAP: Duration = Duration::from_millis(15);

    #[test]
    fn accumulates_instead_of_overwriting() {
        let mut slot = Duration::from_secs(3);
        timed(&mut slot, || thread::sleep(NAP));
        assert!(slot >= Duration::from_secs(3) + NAP);
    }

    #[test]
    fn nested_inner_time_counts_toward_outer() {
        let mut outer = Duration::ZERO;
        let mut inner = Duration::ZERO;
        {
            let _outer = TimeScope::new(&mut outer);
            timed(&mut inner, || thread::sleep(NAP));
        }
        assert!(inner >= NAP);
        assert!(outer >= NAP);
        assert!(outer >= inner);
    }

    #[test]
    fn early_exit_still_records() {
        fn parse_after_nap(slot: &mut Duration, text: &str) -> Result<u32, std::num::ParseIntError> {
            let _scope = TimeScope::new(slot);
            thread::sleep(NAP);
            let value = text.parse::<u32>()?;
            Ok(value * 2)
        }

        let mut slot = Duration::ZERO;
        assert!(parse_after_nap(&mut slot, "not a number").is_err());
        assert!(slot >= NAP);
    }

    #[test]
    fn timed_passes_through_the_result() {
        let mut slot = Duration::ZERO;
        assert_eq!(timed(&mut slot, || 7), 7);
    }
}
