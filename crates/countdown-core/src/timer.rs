//! Countdown timer derivation.
//!
//! Nothing ticks on the server. The display state is recomputed from
//! `started_at + duration_minutes` every time it is observed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use countdown_shared::constants::WARNING_THRESHOLD_SECONDS;

use crate::domain::SessionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Running { remaining_seconds: i64 },
    Overtime { overtime_seconds: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Warning,
    Overtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerSnapshot {
    #[serde(flatten)]
    pub state: TimerState,
    pub total_seconds: i64,
    pub observed_at: DateTime<Utc>,
}

impl TimerSnapshot {
    /// Running while any time is left (rounded up to whole seconds),
    /// overtime from the instant it runs out (rounded down).
    pub fn derive(started_at: DateTime<Utc>, duration_minutes: i32, now: DateTime<Utc>) -> Self {
        let total_seconds = i64::from(duration_minutes) * 60;
        let elapsed_ms = (now - started_at).num_milliseconds();
        let remaining_ms = total_seconds * 1000 - elapsed_ms;

        let state = if remaining_ms > 0 {
            TimerState::Running { remaining_seconds: ceil_div(remaining_ms, 1000) }
        } else {
            TimerState::Overtime { overtime_seconds: (-remaining_ms) / 1000 }
        };

        Self { state, total_seconds, observed_at: now }
    }

    pub fn remaining_seconds(&self) -> i64 {
        match self.state {
            TimerState::Running { remaining_seconds } => remaining_seconds,
            TimerState::Overtime { .. } => 0,
        }
    }

    pub fn overtime_seconds(&self) -> i64 {
        match self.state {
            TimerState::Running { .. } => 0,
            TimerState::Overtime { overtime_seconds } => overtime_seconds,
        }
    }

    /// Share of the duration still left, 0 once overtime.
    pub fn progress_percent(&self) -> f64 {
        if self.total_seconds <= 0 {
            return 0.0;
        }
        self.remaining_seconds() as f64 / self.total_seconds as f64 * 100.0
    }

    pub fn urgency(&self) -> Urgency {
        match self.state {
            TimerState::Overtime { .. } => Urgency::Overtime,
            TimerState::Running { remaining_seconds } if remaining_seconds <= WARNING_THRESHOLD_SECONDS => {
                Urgency::Warning
            }
            TimerState::Running { .. } => Urgency::Normal,
        }
    }

    /// What a client stopping the session at this instant reports.
    pub fn outcome(&self) -> SessionOutcome {
        match self.state {
            TimerState::Running { .. } => SessionOutcome::completed(),
            TimerState::Overtime { overtime_seconds } => {
                SessionOutcome::overtime(i32::try_from(overtime_seconds).unwrap_or(i32::MAX))
            }
        }
    }

    pub fn display(&self) -> String {
        match self.state {
            TimerState::Running { remaining_seconds } => format_clock(remaining_seconds),
            TimerState::Overtime { overtime_seconds } => format!("+{}", format_clock(overtime_seconds)),
        }
    }
}

/// `MM:SS`, or `HH:MM:SS` from one hour up. Negative input clamps to zero.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 18, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_running_rounds_up() {
        let snapshot = TimerSnapshot::derive(start(), 5, start() + Duration::milliseconds(1500));
        assert_eq!(snapshot.state, TimerState::Running { remaining_seconds: 299 });
        assert_eq!(snapshot.total_seconds, 300);

        let snapshot = TimerSnapshot::derive(start(), 5, start());
        assert_eq!(snapshot.remaining_seconds(), 300);
        assert_eq!(snapshot.urgency(), Urgency::Normal);
    }

    #[test]
    fn test_boundary_is_overtime() {
        let snapshot = TimerSnapshot::derive(start(), 1, start() + Duration::seconds(60));
        assert_eq!(snapshot.state, TimerState::Overtime { overtime_seconds: 0 });

        let snapshot = TimerSnapshot::derive(start(), 1, start() + Duration::milliseconds(59_999));
        assert_eq!(snapshot.state, TimerState::Running { remaining_seconds: 1 });
    }

    #[test]
    fn test_overtime_rounds_down() {
        let now = start() + Duration::minutes(10) + Duration::milliseconds(42_900);
        let snapshot = TimerSnapshot::derive(start(), 10, now);
        assert_eq!(snapshot.overtime_seconds(), 42);
        assert_eq!(snapshot.remaining_seconds(), 0);
        assert_eq!(snapshot.progress_percent(), 0.0);
        assert_eq!(snapshot.urgency(), Urgency::Overtime);
        assert_eq!(snapshot.outcome(), SessionOutcome::overtime(42));
        assert_eq!(snapshot.display(), "+00:42");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let now = start() + Duration::seconds(250);
        let a = TimerSnapshot::derive(start(), 5, now);
        let b = TimerSnapshot::derive(start(), 5, now);
        assert_eq!(a, b);
        assert_eq!(a.urgency(), Urgency::Warning);
        assert_eq!(a.outcome(), SessionOutcome::completed());
    }

    #[test]
    fn test_progress_percent() {
        let snapshot = TimerSnapshot::derive(start(), 10, start() + Duration::minutes(5));
        assert!((snapshot.progress_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3600), "01:00:00");
        assert_eq!(format_clock(3725), "01:02:05");
        assert_eq!(format_clock(-3), "00:00");
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let snapshot = TimerSnapshot::derive(start(), 1, start() + Duration::seconds(90));
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["state"], "overtime");
        assert_eq!(json["overtime_seconds"], 30);
        assert_eq!(json["total_seconds"], 60);
    }
}
