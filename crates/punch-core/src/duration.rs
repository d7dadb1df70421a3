//! Pausable stopwatches

use punch_api::{ElapsedMetrics, TimerSelector};
use punch_util::{format_span, MonotonicInstant};
use std::time::Duration;

/// Stopwatch that can be paused and resumed without losing elapsed time.
///
/// Time is never advanced in the background: elapsed time is computed from
/// the monotonic instant passed in at query time.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<MonotonicInstant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or resume. No-op when already running.
    pub fn start(&mut self, now: MonotonicInstant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Pause, folding the running stretch into the accumulated total
    pub fn stop(&mut self, now: MonotonicInstant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.duration_since(since);
        }
    }

    /// Zero and start running
    pub fn restart(&mut self, now: MonotonicInstant) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self, now: MonotonicInstant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.duration_since(since),
            None => self.accumulated,
        }
    }
}

/// Segment and cumulative stopwatches of a session
#[derive(Debug, Clone, Default)]
pub struct DurationTracker {
    segment: Stopwatch,
    cumulative: Stopwatch,
}

impl DurationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// New active stretch: segment from zero, cumulative continues
    pub fn begin_segment(&mut self, now: MonotonicInstant) {
        self.segment.restart(now);
        self.cumulative.start(now);
    }

    /// Pause both stopwatches
    pub fn pause(&mut self, now: MonotonicInstant) {
        self.segment.stop(now);
        self.cumulative.stop(now);
    }

    pub fn stopwatch(&self, which: TimerSelector) -> &Stopwatch {
        match which {
            TimerSelector::Segment => &self.segment,
            TimerSelector::Cumulative => &self.cumulative,
        }
    }

    pub fn duration(&self, which: TimerSelector, now: MonotonicInstant) -> Duration {
        self.stopwatch(which).elapsed(now)
    }

    pub fn elapsed(&self, which: TimerSelector, now: MonotonicInstant) -> ElapsedMetrics {
        ElapsedMetrics::from_duration(self.duration(which, now))
    }

    /// Elapsed time rendered as `HH:MM:SS.cc`
    pub fn formatted(&self, which: TimerSelector, now: MonotonicInstant) -> String {
        format_span(self.duration(which, now))
    }

    /// Both runtimes on one line, as written into punch entries
    pub fn summary(&self, now: MonotonicInstant) -> String {
        format!(
            "SESSION RUNTIME: {} | CUMULATIVE SESSION RUNTIME: {}",
            self.formatted(TimerSelector::Segment, now),
            self.formatted(TimerSelector::Cumulative, now)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn stopwatch_pause_preserves_elapsed() {
        let t0 = MonotonicInstant::now();
        let mut sw = Stopwatch::new();

        sw.start(t0);
        sw.stop(t0 + secs(10));
        assert_eq!(sw.elapsed(t0 + secs(100)), secs(10));

        sw.start(t0 + secs(100));
        assert_eq!(sw.elapsed(t0 + secs(105)), secs(15));
    }

    #[test]
    fn stopwatch_start_is_idempotent() {
        let t0 = MonotonicInstant::now();
        let mut sw = Stopwatch::new();

        sw.start(t0);
        sw.start(t0 + secs(5));
        assert_eq!(sw.elapsed(t0 + secs(10)), secs(10));
    }

    #[test]
    fn stopwatch_restart_zeroes() {
        let t0 = MonotonicInstant::now();
        let mut sw = Stopwatch::new();

        sw.start(t0);
        sw.restart(t0 + secs(30));
        assert_eq!(sw.elapsed(t0 + secs(30)), Duration::ZERO);
        assert!(sw.is_running());
    }

    #[test]
    fn segment_restarts_while_cumulative_continues() {
        let t0 = MonotonicInstant::now();
        let mut tracker = DurationTracker::new();

        tracker.begin_segment(t0);
        tracker.pause(t0 + secs(60));
        tracker.begin_segment(t0 + secs(90));

        let now = t0 + secs(90);
        assert_eq!(tracker.duration(TimerSelector::Segment, now), Duration::ZERO);
        assert_eq!(tracker.duration(TimerSelector::Cumulative, now), secs(60));

        let later = t0 + secs(120);
        assert_eq!(tracker.duration(TimerSelector::Segment, later), secs(30));
        assert_eq!(tracker.duration(TimerSelector::Cumulative, later), secs(90));
    }

    #[test]
    fn fresh_tracker_is_idle() {
        let tracker = DurationTracker::new();
        let now = MonotonicInstant::now();
        assert_eq!(tracker.formatted(TimerSelector::Cumulative, now), "00:00:00.00");
        assert!(!tracker.stopwatch(TimerSelector::Segment).is_running());
    }

    #[test]
    fn summary_shows_both_runtimes() {
        let t0 = MonotonicInstant::now();
        let mut tracker = DurationTracker::new();
        tracker.begin_segment(t0);

        assert_eq!(
            tracker.summary(t0 + secs(61)),
            "SESSION RUNTIME: 00:01:01.00 | CUMULATIVE SESSION RUNTIME: 00:01:01.00"
        );
    }
}
