//! Time utilities for punchclock
//!
//! Provides both monotonic time (for the pausable stopwatches) and
//! wall-clock time (for punch-in/out timestamps and log entries).
//!
//! # Mock Time for Development
//!
//! In debug builds, the `PUNCHCLOCK_MOCK_TIME` environment variable can be set
//! to override the wall clock used for timestamps. Mock time advances at the
//! same rate as real time.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{DateTime, Local};
#[cfg(debug_assertions)]
use chrono::{NaiveDateTime, TimeZone};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "PUNCHCLOCK_MOCK_TIME";

/// Format accepted by `PUNCHCLOCK_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached mock time offset from the real time when the process started.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT)
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = MOCK_TIME_FORMAT,
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(chrono::Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a DateTime as a long time of day, used for punch-in/out marks.
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Format a DateTime with full date and time, used as the log entry prefix.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render an elapsed span as `HH:MM:SS.cc`.
///
/// Hours are total hours (they do not wrap at 24), the fraction is
/// hundredths of a second.
pub fn format_span(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let hundredths = d.subsec_millis() / 10;

    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, hundredths)
}

/// Represents a point in monotonic time for the session stopwatches.
/// This is immune to wall-clock changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonotonicInstant(Instant);

impl MonotonicInstant {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Duration since `earlier`, or zero if `earlier` is actually later
    pub fn duration_since(&self, earlier: MonotonicInstant) -> Duration {
        self.0.saturating_duration_since(earlier.0)
    }
}

impl std::ops::Add<Duration> for MonotonicInstant {
    type Output = MonotonicInstant;

    fn add(self, rhs: Duration) -> Self::Output {
        MonotonicInstant(self.0 + rhs)
    }
}

/// A monotonic instant paired with the wall-clock time it was taken at.
///
/// Stopwatches read the monotonic half; log entries and punch marks use
/// the wall-clock half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub mono: MonotonicInstant,
    pub wall: DateTime<Local>,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            mono: MonotonicInstant::now(),
            wall: now(),
        }
    }

    /// The same moment shifted forward by `d` on both clocks
    pub fn after(&self, d: Duration) -> Self {
        Self {
            mono: self.mono + d,
            wall: self.wall + chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero()),
        }
    }
}
