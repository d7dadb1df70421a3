//! Session status and elapsed-time types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Status of the user within the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not punched in (initial state, and after punch-out or end)
    #[default]
    Inactive,
    /// Punched in, time is accruing
    Active,
    /// On a break; the session stays open but timers are paused
    OnRest,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Inactive => "INACTIVE",
            SessionStatus::Active => "ACTIVE",
            SessionStatus::OnRest => "ONREST",
        };
        f.write_str(s)
    }
}

/// Which of the two session stopwatches a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSelector {
    /// Time since the most recent punch-in or resume
    Segment,
    /// Total active time of the session, rests excluded
    Cumulative,
}

impl TimerSelector {
    /// Interpret the optional numeric argument of a duration query.
    ///
    /// `1` selects the segment timer. Anything else, including a missing
    /// or unparsable argument, selects the cumulative timer.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(|a| a.trim().parse::<i64>()) {
            Some(Ok(1)) => TimerSelector::Segment,
            _ => TimerSelector::Cumulative,
        }
    }
}

/// Unit a duration query reports in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub fn label(&self) -> &'static str {
        match self {
            DurationUnit::Hours => "Hours",
            DurationUnit::Minutes => "Minutes",
            DurationUnit::Seconds => "Seconds",
        }
    }
}

/// Elapsed time expressed as three independent totals.
///
/// Each field is the whole duration in that unit: 90 seconds is
/// `{ hours: 0.025, minutes: 1.5, seconds: 90.0 }`, not a broken-down clock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElapsedMetrics {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl ElapsedMetrics {
    pub fn from_duration(d: Duration) -> Self {
        let seconds = d.as_secs_f64();
        Self {
            hours: seconds / 3600.0,
            minutes: seconds / 60.0,
            seconds,
        }
    }

    pub fn in_unit(&self, unit: DurationUnit) -> f64 {
        match unit {
            DurationUnit::Hours => self.hours,
            DurationUnit::Minutes => self.minutes,
            DurationUnit::Seconds => self.seconds,
        }
    }
}
