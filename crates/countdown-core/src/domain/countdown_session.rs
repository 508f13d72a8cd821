// ============================================================================
// Countdown Core - Countdown Session Entity
// File: crates/countdown-core/src/domain/countdown_session.rs
// Description: Session entity, lifecycle status, and start/stop inputs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use countdown_shared::constants::{
    MAX_DURATION_MINUTES, MAX_PARTICIPANT_NAME_LENGTH, MIN_DURATION_MINUTES,
};

use crate::domain::IntegerInput;
use crate::error::{DomainError, FieldErrors};
use crate::timer::TimerSnapshot;

/// Session status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Overtime,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Overtime => "overtime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            "overtime" => Some(SessionStatus::Overtime),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Active
    }
}

/// Countdown session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSession {
    pub id: i64,
    pub participant_name: String,
    pub duration_minutes: i32,
    pub status: SessionStatus,
    pub overtime_seconds: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CountdownSession {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn timer_at(&self, now: DateTime<Utc>) -> TimerSnapshot {
        TimerSnapshot::derive(self.started_at, self.duration_minutes, now)
    }
}

/// Validated input for opening a session.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewSession {
    #[validate(length(
        min = 1,
        max = MAX_PARTICIPANT_NAME_LENGTH,
        message = "Participant name is required and may not exceed 255 characters"
    ))]
    pub participant_name: String,

    #[validate(range(
        min = MIN_DURATION_MINUTES,
        max = MAX_DURATION_MINUTES,
        message = "Duration must be between 1 and 60 minutes"
    ))]
    pub duration_minutes: i32,
}

impl NewSession {
    pub fn new(
        participant_name: &str,
        duration_minutes: impl Into<IntegerInput>,
    ) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();

        // Type errors stand alone; the range rule only judges real integers.
        let duration_minutes = match duration_minutes.into() {
            IntegerInput::Value(minutes) => saturate_i32(minutes),
            IntegerInput::Missing => {
                errors.add("duration_minutes", "Duration is required");
                MIN_DURATION_MINUTES
            }
            IntegerInput::Invalid => {
                errors.add("duration_minutes", "Duration must be an integer");
                MIN_DURATION_MINUTES
            }
        };

        let session = Self {
            participant_name: participant_name.trim().to_string(),
            duration_minutes,
        };

        if let Err(e) = session.validate() {
            errors.merge(e.into());
        }
        errors.into_result()?;
        Ok(session)
    }
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Raw stop request, as received from a client.
#[derive(Debug, Clone)]
pub struct CloseSession {
    pub status: String,
    pub overtime_seconds: IntegerInput,
}

impl CloseSession {
    pub fn new(status: impl Into<String>, overtime_seconds: Option<i64>) -> Self {
        Self { status: status.into(), overtime_seconds: overtime_seconds.into() }
    }

    /// Checks both fields and resolves the terminal outcome to persist.
    pub fn into_outcome(self) -> Result<SessionOutcome, DomainError> {
        let mut errors = FieldErrors::new();

        let overtime_seconds = match self.overtime_seconds {
            IntegerInput::Missing => 0,
            IntegerInput::Value(seconds) => match i32::try_from(seconds) {
                Ok(seconds) if seconds >= 0 => seconds,
                _ => {
                    errors.add("overtime_seconds", "Overtime seconds must be a non-negative integer");
                    0
                }
            },
            IntegerInput::Invalid => {
                errors.add("overtime_seconds", "Overtime seconds must be an integer");
                0
            }
        };

        let status = match SessionStatus::from_str(self.status.trim()) {
            Some(status) if status.is_terminal() => Some(status),
            _ => {
                errors.add("status", "Status must be either completed or overtime");
                None
            }
        };

        errors.into_result()?;

        let status = status.ok_or_else(|| {
            DomainError::InternalError("terminal status missing after validation".to_string())
        })?;

        Ok(SessionOutcome { status, overtime_seconds })
    }
}

/// Terminal state a session is closed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    pub overtime_seconds: i32,
}

impl SessionOutcome {
    pub fn completed() -> Self {
        Self { status: SessionStatus::Completed, overtime_seconds: 0 }
    }

    pub fn overtime(overtime_seconds: i32) -> Self {
        Self { status: SessionStatus::Overtime, overtime_seconds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_and_terminality() {
        for status in [SessionStatus::Active, SessionStatus::Completed, SessionStatus::Overtime] {
            assert_eq!(SessionStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::from_str("paused"), None);
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Overtime.is_terminal());
    }

    #[test]
    fn test_new_session_trims_name() {
        let session = NewSession::new("  Alice  ", 5).unwrap();
        assert_eq!(session.participant_name, "Alice");
        assert_eq!(session.duration_minutes, 5);
    }

    #[test]
    fn test_new_session_rejects_out_of_range_duration() {
        for duration in [0, 61, -5] {
            match NewSession::new("Alice", duration) {
                Err(DomainError::Validation(fields)) => {
                    assert!(fields.contains("duration_minutes"));
                    assert!(!fields.contains("participant_name"));
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
        assert!(NewSession::new("Alice", 1).is_ok());
        assert!(NewSession::new("Alice", 60).is_ok());
        assert!(NewSession::new("Alice", IntegerInput::Value(i64::MAX)).is_err());
    }

    #[test]
    fn test_new_session_reports_type_errors_per_field() {
        let session = NewSession::new("Alice", IntegerInput::Value(5)).unwrap();
        assert_eq!(session.duration_minutes, 5);

        for (input, message) in [
            (IntegerInput::Invalid, "Duration must be an integer"),
            (IntegerInput::Missing, "Duration is required"),
        ] {
            match NewSession::new("", input) {
                Err(DomainError::Validation(fields)) => {
                    assert_eq!(fields.get("duration_minutes"), Some(&[message.to_string()][..]));
                    assert!(fields.contains("participant_name"));
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_new_session_rejects_blank_and_long_names() {
        for name in ["", "   "] {
            match NewSession::new(name, 0) {
                Err(DomainError::Validation(fields)) => {
                    assert!(fields.contains("participant_name"));
                    assert!(fields.contains("duration_minutes"));
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        let long = "x".repeat(256);
        assert!(NewSession::new(&long, 5).is_err());
        assert!(NewSession::new(&"x".repeat(255), 5).is_ok());
    }

    #[test]
    fn test_close_session_defaults_overtime_to_zero() {
        let outcome = CloseSession::new("completed", None).into_outcome().unwrap();
        assert_eq!(outcome, SessionOutcome::completed());

        // A supplied value is kept as given, even for completed.
        let outcome = CloseSession::new("completed", Some(7)).into_outcome().unwrap();
        assert_eq!(outcome.status, SessionStatus::Completed);
        assert_eq!(outcome.overtime_seconds, 7);

        let outcome = CloseSession::new("overtime", Some(120)).into_outcome().unwrap();
        assert_eq!(outcome, SessionOutcome::overtime(120));
    }

    #[test]
    fn test_close_session_rejects_bad_input() {
        match CloseSession::new("active", Some(-1)).into_outcome() {
            Err(DomainError::Validation(fields)) => {
                assert!(fields.contains("status"));
                assert!(fields.contains("overtime_seconds"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        assert!(CloseSession::new("finished", None).into_outcome().is_err());

        let request = CloseSession {
            status: "overtime".to_string(),
            overtime_seconds: IntegerInput::Invalid,
        };
        match request.into_outcome() {
            Err(DomainError::Validation(fields)) => {
                assert!(!fields.contains("status"));
                assert_eq!(
                    fields.get("overtime_seconds"),
                    Some(&["Overtime seconds must be an integer".to_string()][..])
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(CloseSession::new("overtime", Some(i64::from(i32::MAX) + 1)).into_outcome().is_err());
    }
}
