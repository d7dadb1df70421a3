//! Session state machine

use chrono::{DateTime, Local};
use punch_api::{DisplayHint, EntryKind, LogEntry, SessionStatus, TimerSelector};
use punch_util::Moment;
use tracing::{debug, info};

use crate::DurationTracker;

/// Message written when the session is ended
pub const END_OF_SESSION: &str = "End of Time Logging Session!";

/// Status of the session plus the stopwatches it drives.
///
/// Every transition returns the log entry it produced; the caller decides
/// where it goes. Transitions never fail.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    status: SessionStatus,
    tracker: DurationTracker,
    last_punch_in: Option<DateTime<Local>>,
    last_punch_out: Option<DateTime<Local>>,
    finished: bool,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn tracker(&self) -> &DurationTracker {
        &self.tracker
    }

    pub fn last_punch_in(&self) -> Option<DateTime<Local>> {
        self.last_punch_in
    }

    pub fn last_punch_out(&self) -> Option<DateTime<Local>> {
        self.last_punch_out
    }

    /// Whether END has been processed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn punch_in(&mut self, now: Moment) -> LogEntry {
        self.tracker.begin_segment(now.mono);
        self.last_punch_in = Some(now.wall);
        self.set_status(SessionStatus::Active);

        LogEntry::bare(EntryKind::PunchIn)
            .with_hint(DisplayHint::Green)
            .at(now.wall)
    }

    pub fn rest(&mut self, now: Moment) -> LogEntry {
        let summary = self.tracker.summary(now.mono);
        self.tracker.pause(now.mono);
        self.last_punch_out = Some(now.wall);
        self.set_status(SessionStatus::OnRest);

        LogEntry::new(EntryKind::PunchOut, summary)
            .with_hint(DisplayHint::Green)
            .at(now.wall)
    }

    pub fn resume(&mut self, now: Moment) -> LogEntry {
        let summary = self.tracker.summary(now.mono);
        self.tracker.begin_segment(now.mono);
        self.last_punch_in = Some(now.wall);
        self.set_status(SessionStatus::Active);

        LogEntry::new(EntryKind::PunchIn, summary)
            .with_hint(DisplayHint::Green)
            .at(now.wall)
    }

    pub fn punch_out(&mut self, now: Moment) -> LogEntry {
        let summary = self.tracker.summary(now.mono);
        self.tracker.pause(now.mono);
        self.last_punch_out = Some(now.wall);
        self.set_status(SessionStatus::Inactive);

        LogEntry::new(EntryKind::PunchOut, summary)
            .with_hint(DisplayHint::Green)
            .at(now.wall)
    }

    /// Tear the session down. Punching in again afterwards is allowed.
    pub fn end(&mut self, now: Moment) -> LogEntry {
        // Both timers freeze so the END totals stay fixed; a later IN resumes them
        self.tracker.pause(now.mono);
        self.set_status(SessionStatus::Inactive);
        self.finished = true;

        info!(
            cumulative = %self.tracker.formatted(TimerSelector::Cumulative, now.mono),
            "Session ended"
        );

        LogEntry::new(EntryKind::PunchOut, END_OF_SESSION)
            .with_hint(DisplayHint::Green)
            .at(now.wall)
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "Session status changed");
        }
        self.status = status;
    }
}
